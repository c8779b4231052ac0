//! Cryptographic primitives with constant-time implementations
//!
//! This crate implements the symmetric core of the kestrel workspace: the
//! forward-only permutation kernels (Threefish, Serpent, wide-block
//! Rijndael, the ChaCha-derived CSX cores), the SHAKE/cSHAKE extendable
//! output functions used for domain-separated key expansion, the MAC
//! generators (HMAC-SHA2, KMAC, GMAC, Poly1305), and the authenticated
//! counter-mode stream-cipher engine that binds them together.
//!
//! # Security posture
//!
//! - secret material lives in wipe-on-drop containers; working states are
//!   zeroized on drop
//! - tag comparison and the decrypt gate are branch-free
//!   (`subtle`-backed)
//! - every permutation family has scalar and lane-replicated forms that
//!   produce bit-identical keystream, so the SIMD profile never changes
//!   observable output

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod block;
pub mod hash;
pub mod mac;
pub mod permute;
pub(crate) mod simd;
pub mod stream;
pub mod xof;

pub use block::aes::Aes128;
pub use hash::sha2::{Sha256, Sha512};
pub use mac::gmac::Gmac;
pub use mac::hmac::Hmac;
pub use mac::kmac::Kmac;
pub use mac::poly1305::Poly1305;
pub use stream::{CipherStream, SimdProfile, StreamAuthenticator, StreamCipherVariant};
pub use xof::cshake::CShake;
pub use xof::shake::Shake;
pub use xof::ShakeMode;
