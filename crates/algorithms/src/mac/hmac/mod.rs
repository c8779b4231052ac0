//! HMAC per RFC 2104 / FIPS 198-1, constant-time
//!
//! Generic over the SHA-2 pair. The derived key `K'` is selected
//! branch-free between the raw key and its hash, so running time depends
//! only on the public key length, and pad material lives in wipe-on-drop
//! buffers.

use kestrel_api::{Error, Result, SymmetricKeySize};
use kestrel_common::SecureBuffer;
use zeroize::Zeroize;

use crate::hash::{sha2::Sha256, sha2::Sha512, Digest};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC over a SHA-2 digest
#[derive(Clone)]
pub struct Hmac<D: Digest> {
    inner: Option<D>,
    ipad: SecureBuffer,
    opad: SecureBuffer,
}

/// HMAC-SHA2-256
pub type HmacSha256 = Hmac<Sha256>;
/// HMAC-SHA2-512
pub type HmacSha512 = Hmac<Sha512>;

impl<D: Digest> Hmac<D> {
    /// Create a keyed instance
    pub fn new(key: &[u8]) -> Result<Self> {
        let mut mac = Self {
            inner: None,
            ipad: SecureBuffer::zeroed(D::BLOCK_SIZE),
            opad: SecureBuffer::zeroed(D::BLOCK_SIZE),
        };
        mac.key_schedule(key);
        Ok(mac)
    }

    fn key_schedule(&mut self, key: &[u8]) {
        let bs = D::BLOCK_SIZE;

        // hash the key unconditionally so timing tracks only the public
        // key length
        let mut hasher = D::new();
        hasher.update(key);
        let mut hashed = vec![0u8; D::OUTPUT_SIZE];
        hasher.finalize_into(&mut hashed);

        let long = (key.len() > bs) as u8;
        let mask = long.wrapping_neg();

        let mut k_prime = vec![0u8; bs];
        for i in 0..bs {
            let raw = key.get(i).copied().unwrap_or(0);
            let red = hashed.get(i).copied().unwrap_or(0);
            k_prime[i] = (red & mask) | (raw & !mask);
        }

        for i in 0..bs {
            self.ipad.as_mut_slice()[i] = k_prime[i] ^ IPAD;
            self.opad.as_mut_slice()[i] = k_prime[i] ^ OPAD;
        }
        k_prime.zeroize();
        hashed.zeroize();

        let mut inner = D::new();
        inner.update(self.ipad.as_slice());
        self.inner = Some(inner);
    }

    /// One-shot MAC helper
    pub fn mac_into(key: &[u8], data: &[u8], tag: &mut [u8]) -> Result<()> {
        let mut mac = Self::new(key)?;
        kestrel_api::MacEngine::update(&mut mac, data)?;
        kestrel_api::MacEngine::finalize_into(&mut mac, tag)
    }
}

impl<D: Digest> kestrel_api::MacEngine for Hmac<D> {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        match self.inner.as_mut() {
            Some(hasher) => {
                hasher.update(data);
                Ok(())
            }
            None => {
                // equal-cost burn so the error path costs what success does
                let mut dummy = D::new();
                dummy.update(data);
                Err(Error::IllegalOperation {
                    context: "HMAC",
                    reason: "update after finalize",
                })
            }
        }
    }

    fn finalize_into(&mut self, tag: &mut [u8]) -> Result<()> {
        if tag.len() != D::OUTPUT_SIZE {
            return Err(Error::InvalidSize {
                context: "HMAC tag",
                expected: D::OUTPUT_SIZE,
                actual: tag.len(),
            });
        }

        let inner = self.inner.take().ok_or(Error::IllegalOperation {
            context: "HMAC",
            reason: "finalize before keying",
        })?;

        let mut inner_digest = vec![0u8; D::OUTPUT_SIZE];
        inner.finalize_into(&mut inner_digest);

        let mut outer = D::new();
        outer.update(self.opad.as_slice());
        outer.update(&inner_digest);
        outer.finalize_into(tag);

        inner_digest.zeroize();
        self.ipad.wipe();
        self.opad.wipe();
        Ok(())
    }

    fn rekey(&mut self, key: &[u8]) -> Result<()> {
        self.key_schedule(key);
        Ok(())
    }

    fn tag_size(&self) -> usize {
        D::OUTPUT_SIZE
    }

    fn legal_key_sizes(&self) -> &'static [SymmetricKeySize] {
        // any key length is legal for HMAC; these are the recommended
        // geometries
        const SIZES_256: [SymmetricKeySize; 1] = [SymmetricKeySize::new(32, 0, 0)];
        const SIZES_512: [SymmetricKeySize; 1] = [SymmetricKeySize::new(64, 0, 0)];
        if D::OUTPUT_SIZE == 64 {
            &SIZES_512
        } else {
            &SIZES_256
        }
    }

    fn name(&self) -> &'static str {
        match D::OUTPUT_SIZE {
            64 => "HMACSHA512",
            _ => "HMACSHA256",
        }
    }

    fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }
}
