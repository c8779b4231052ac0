//! KMAC per NIST SP 800-185
//!
//! cSHAKE with function name `"KMAC"`, the key absorbed as
//! `bytepad(encode_string(K), rate)`, and the output length appended as
//! `right_encode` before the squeeze. Four strengths, matching the four
//! sponge rates; tag and recommended key lengths scale with the
//! strength.

use kestrel_api::{Error, Result, SymmetricKeySize};

use crate::xof::{absorb_bytepad, encode_string, right_encode, ShakeMode, Sponge};

/// KMAC strength selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KmacMode {
    /// KMAC-128: 16-byte key and tag
    Kmac128,
    /// KMAC-256: 32-byte key and tag
    Kmac256,
    /// KMAC-512: 64-byte key and tag
    Kmac512,
    /// KMAC-1024: 128-byte key and tag
    Kmac1024,
}

impl KmacMode {
    fn shake_mode(self) -> ShakeMode {
        match self {
            Self::Kmac128 => ShakeMode::Shake128,
            Self::Kmac256 => ShakeMode::Shake256,
            Self::Kmac512 => ShakeMode::Shake512,
            Self::Kmac1024 => ShakeMode::Shake1024,
        }
    }

    /// Tag and recommended key length in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Kmac128 => 16,
            Self::Kmac256 => 32,
            Self::Kmac512 => 64,
            Self::Kmac1024 => 128,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Kmac128 => "KMAC128",
            Self::Kmac256 => "KMAC256",
            Self::Kmac512 => "KMAC512",
            Self::Kmac1024 => "KMAC1024",
        }
    }

    fn legal_key_sizes(self) -> &'static [SymmetricKeySize] {
        const SIZES_128: [SymmetricKeySize; 3] = [
            SymmetricKeySize::new(16, 0, 0),
            SymmetricKeySize::new(32, 0, 0),
            SymmetricKeySize::new(64, 0, 0),
        ];
        const SIZES_256: [SymmetricKeySize; 3] = [
            SymmetricKeySize::new(16, 0, 0),
            SymmetricKeySize::new(32, 0, 0),
            SymmetricKeySize::new(64, 0, 0),
        ];
        const SIZES_512: [SymmetricKeySize; 3] = [
            SymmetricKeySize::new(32, 0, 0),
            SymmetricKeySize::new(64, 0, 0),
            SymmetricKeySize::new(128, 0, 0),
        ];
        const SIZES_1024: [SymmetricKeySize; 3] = [
            SymmetricKeySize::new(64, 0, 0),
            SymmetricKeySize::new(128, 0, 0),
            SymmetricKeySize::new(256, 0, 0),
        ];
        match self {
            Self::Kmac128 => &SIZES_128,
            Self::Kmac256 => &SIZES_256,
            Self::Kmac512 => &SIZES_512,
            Self::Kmac1024 => &SIZES_1024,
        }
    }
}

/// Keccak-based MAC generator
#[derive(Clone)]
pub struct Kmac {
    sponge: Option<Sponge>,
    mode: KmacMode,
    custom: Vec<u8>,
}

impl Kmac {
    const DOMAIN: u8 = 0x04;

    /// Create a keyed instance with an optional customization string
    pub fn new(mode: KmacMode, key: &[u8], custom: &[u8]) -> Result<Self> {
        let mut mac = Self {
            sponge: None,
            mode,
            custom: custom.to_vec(),
        };
        mac.arm(key)?;
        Ok(mac)
    }

    fn arm(&mut self, key: &[u8]) -> Result<()> {
        if !self
            .mode
            .legal_key_sizes()
            .iter()
            .any(|size| size.key_size == key.len())
        {
            return Err(Error::InvalidKey {
                context: self.mode.as_str(),
                actual: key.len(),
            });
        }

        let rate = self.mode.shake_mode().rate();
        let mut sponge = Sponge::new(rate, Self::DOMAIN);

        let encoded_name = encode_string(b"KMAC");
        let encoded_custom = encode_string(&self.custom);
        absorb_bytepad(&mut sponge, &[encoded_name.as_slice(), encoded_custom.as_slice()]);

        let encoded_key = encode_string(key);
        absorb_bytepad(&mut sponge, &[encoded_key.as_slice()]);

        self.sponge = Some(sponge);
        Ok(())
    }

    /// One-shot MAC helper
    pub fn mac_into(mode: KmacMode, key: &[u8], data: &[u8], tag: &mut [u8]) -> Result<()> {
        let mut mac = Self::new(mode, key, b"")?;
        kestrel_api::MacEngine::update(&mut mac, data)?;
        kestrel_api::MacEngine::finalize_into(&mut mac, tag)
    }
}

impl kestrel_api::MacEngine for Kmac {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        let sponge = self.sponge.as_mut().ok_or(Error::IllegalOperation {
            context: "KMAC",
            reason: "update before keying",
        })?;
        sponge.absorb(data);
        Ok(())
    }

    fn finalize_into(&mut self, tag: &mut [u8]) -> Result<()> {
        if tag.len() != self.mode.size() {
            return Err(Error::InvalidSize {
                context: "KMAC tag",
                expected: self.mode.size(),
                actual: tag.len(),
            });
        }

        let mut sponge = self.sponge.take().ok_or(Error::IllegalOperation {
            context: "KMAC",
            reason: "finalize before keying",
        })?;

        sponge.absorb(&right_encode(tag.len() as u64 * 8));
        sponge.pad_and_switch();
        sponge.squeeze(tag);
        Ok(())
    }

    fn rekey(&mut self, key: &[u8]) -> Result<()> {
        self.arm(key)
    }

    fn tag_size(&self) -> usize {
        self.mode.size()
    }

    fn legal_key_sizes(&self) -> &'static [SymmetricKeySize] {
        self.mode.legal_key_sizes()
    }

    fn name(&self) -> &'static str {
        self.mode.as_str()
    }

    fn is_initialized(&self) -> bool {
        self.sponge.is_some()
    }
}

#[cfg(test)]
mod tests;
