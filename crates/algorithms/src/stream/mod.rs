//! The authenticated stream-cipher engine
//!
//! A [`CipherStream`] binds one keystream variant to an optional MAC
//! generator: the permutation produces counter-mode keystream, cSHAKE
//! expands the caller's key into the cipher key and the MAC key under a
//! customization that ties them to the cipher's name and the running MAC
//! counter, and every finalization re-derives the MAC key so each tag is
//! bound to the total byte offset of the stream.

mod auth;
pub mod cipher;
mod generator;

pub use cipher::CipherStream;

use kestrel_api::SymmetricKeySize;

use crate::mac::kmac::KmacMode;
use crate::xof::ShakeMode;

/// The keystream variant a [`CipherStream`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCipherVariant {
    /// Threefish-256, 72 rounds, 32-byte block
    Tsx256,
    /// Threefish-512, 96 rounds, 64-byte block
    Tsx512,
    /// Threefish-1024, 120 rounds, 128-byte block
    Tsx1024,
    /// ChaCha-derived, 32-bit words, 20 rounds, 64-byte block
    Csx256,
    /// ChaCha-derived, 64-bit words, 80 rounds, 128-byte block
    Csx512,
    /// Wide-block Rijndael, 14/22/30 rounds by key length, 32-byte block
    Rcs,
}

impl StreamCipherVariant {
    /// Variant name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tsx256 => "TSX256",
            Self::Tsx512 => "TSX512",
            Self::Tsx1024 => "TSX1024",
            Self::Csx256 => "CSX256",
            Self::Csx512 => "CSX512",
            Self::Rcs => "RCS",
        }
    }

    /// Keystream block width in bytes
    pub fn block_size(self) -> usize {
        match self {
            Self::Tsx256 | Self::Rcs => 32,
            Self::Tsx512 | Self::Csx256 => 64,
            Self::Tsx1024 | Self::Csx512 => 128,
        }
    }

    /// Accepted key geometries
    pub fn legal_key_sizes(self) -> &'static [SymmetricKeySize] {
        const TSX256: [SymmetricKeySize; 1] = [SymmetricKeySize::new(32, 16, 16)];
        const TSX512: [SymmetricKeySize; 1] = [SymmetricKeySize::new(64, 16, 16)];
        const TSX1024: [SymmetricKeySize; 1] = [SymmetricKeySize::new(128, 16, 16)];
        const CSX256: [SymmetricKeySize; 1] = [SymmetricKeySize::new(32, 16, 16)];
        const CSX512: [SymmetricKeySize; 1] = [SymmetricKeySize::new(64, 16, 16)];
        const RCS: [SymmetricKeySize; 3] = [
            SymmetricKeySize::new(32, 32, 16),
            SymmetricKeySize::new(64, 32, 16),
            SymmetricKeySize::new(128, 32, 16),
        ];
        match self {
            Self::Tsx256 => &TSX256,
            Self::Tsx512 => &TSX512,
            Self::Tsx1024 => &TSX1024,
            Self::Csx256 => &CSX256,
            Self::Csx512 => &CSX512,
            Self::Rcs => &RCS,
        }
    }

    /// The cSHAKE function-name input for key expansion
    pub(crate) fn family_name(self) -> &'static [u8] {
        match self {
            Self::Tsx256 | Self::Tsx512 | Self::Tsx1024 => b"TSX",
            Self::Csx256 | Self::Csx512 => b"CSX",
            Self::Rcs => b"RCS",
        }
    }

    /// The default 16-byte tweak literal
    ///
    /// CSX-256 has no dedicated tweak words; its literal is the sigma
    /// constant block, which a caller-supplied info string replaces.
    pub(crate) fn default_tweak(self) -> [u8; 16] {
        match self {
            Self::Tsx256 => *b"Threefish256072\0",
            Self::Tsx512 => *b"Threefish512096\0",
            Self::Tsx1024 => *b"Threefish1024120",
            Self::Csx256 => {
                let mut tweak = [0u8; 16];
                for (i, word) in crate::permute::chacha::SIGMA_256.iter().enumerate() {
                    tweak[4 * i..4 * i + 4].copy_from_slice(&word.to_le_bytes());
                }
                tweak
            }
            Self::Csx512 => *b"CSX512080\0\0\0\0\0\0\0",
            Self::Rcs => *b"RijndaelWide256\0",
        }
    }

    /// The key-expansion XOF strength for a given key length
    pub(crate) fn shake_mode(self, key_len: usize) -> ShakeMode {
        match key_len {
            32 => ShakeMode::Shake256,
            64 => ShakeMode::Shake512,
            _ => ShakeMode::Shake1024,
        }
    }

    /// Rijndael round count for a key length (RCS only)
    pub(crate) fn rcs_rounds(key_len: usize) -> usize {
        match key_len {
            32 => 14,
            64 => 22,
            _ => 30,
        }
    }
}

/// The MAC generator bound to an authenticated stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamAuthenticator {
    /// HMAC over SHA-256, 32-byte tag
    HmacSha256,
    /// HMAC over SHA-512, 64-byte tag
    HmacSha512,
    /// KMAC-256, 32-byte tag
    Kmac256,
    /// KMAC-512, 64-byte tag
    Kmac512,
    /// KMAC-1024, 128-byte tag
    Kmac1024,
    /// Poly1305 with a per-cycle one-time key, 16-byte tag
    Poly1305,
    /// GMAC over AES-128, 16-byte tag
    Gmac,
}

/// How the engine frames data into the MAC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MacFraming {
    /// nonce ‖ aad ‖ ciphertext, no length encoding
    Raw,
    /// The generator's own AEAD padding and length conventions
    Aead,
}

impl StreamAuthenticator {
    /// Authenticator name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha256 => "HMACSHA256",
            Self::HmacSha512 => "HMACSHA512",
            Self::Kmac256 => "KMAC256",
            Self::Kmac512 => "KMAC512",
            Self::Kmac1024 => "KMAC1024",
            Self::Poly1305 => "Poly1305",
            Self::Gmac => "GMAC",
        }
    }

    /// Tag length in bytes
    pub fn tag_size(self) -> usize {
        match self {
            Self::Poly1305 | Self::Gmac => 16,
            Self::HmacSha256 | Self::Kmac256 => 32,
            Self::HmacSha512 | Self::Kmac512 => 64,
            Self::Kmac1024 => 128,
        }
    }

    /// Derived MAC key length in bytes
    pub(crate) fn key_size(self) -> usize {
        match self {
            Self::Gmac => 16,
            Self::HmacSha256 | Self::Kmac256 | Self::Poly1305 => 32,
            Self::HmacSha512 | Self::Kmac512 => 64,
            Self::Kmac1024 => 128,
        }
    }

    pub(crate) fn framing(self) -> MacFraming {
        match self {
            Self::Poly1305 | Self::Gmac => MacFraming::Aead,
            _ => MacFraming::Raw,
        }
    }

    pub(crate) fn kmac_mode(self) -> Option<KmacMode> {
        match self {
            Self::Kmac256 => Some(KmacMode::Kmac256),
            Self::Kmac512 => Some(KmacMode::Kmac512),
            Self::Kmac1024 => Some(KmacMode::Kmac1024),
            _ => None,
        }
    }
}

/// Which keystream implementation width the engine dispatches to
///
/// Chosen once at construction; every width emits identical bytes, so
/// this only affects throughput. Exposed mainly so equivalence tests can
/// pin the paths against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdProfile {
    /// One block at a time
    Scalar,
    /// Four-lane replication
    Lanes4,
    /// Eight-lane replication, the default
    Lanes8,
}

impl SimdProfile {
    /// The widest profile, the construction-time default
    pub fn auto() -> Self {
        Self::Lanes8
    }
}

#[cfg(test)]
mod tests;
