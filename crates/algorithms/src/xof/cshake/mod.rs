//! cSHAKE per NIST SP 800-185
//!
//! The customizable SHAKE variant behind every key expansion in the
//! stream engine: the function name `N` separates algorithm families,
//! the customization `S` binds the MAC counter and cipher name. With
//! both strings empty the construction degrades to plain SHAKE, as the
//! standard requires.

use kestrel_api::{Error, Result, Xof};

use super::{absorb_bytepad, encode_string, ShakeMode, Sponge};

/// A cSHAKE sponge instance
#[derive(Clone)]
pub struct CShake {
    sponge: Sponge,
    mode: ShakeMode,
}

impl CShake {
    /// cSHAKE domain-separation byte
    const DOMAIN: u8 = 0x04;
    /// Plain-SHAKE fallback domain byte
    const SHAKE_DOMAIN: u8 = 0x1F;

    /// Create an instance with function name `name` and customization `custom`
    pub fn new(mode: ShakeMode, name: &[u8], custom: &[u8]) -> Self {
        if name.is_empty() && custom.is_empty() {
            return Self {
                sponge: Sponge::new(mode.rate(), Self::SHAKE_DOMAIN),
                mode,
            };
        }

        let mut sponge = Sponge::new(mode.rate(), Self::DOMAIN);
        let encoded_name = encode_string(name);
        let encoded_custom = encode_string(custom);
        absorb_bytepad(&mut sponge, &[encoded_name.as_slice(), encoded_custom.as_slice()]);

        Self { sponge, mode }
    }

    /// Mode selected at construction
    pub fn mode(&self) -> ShakeMode {
        self.mode
    }

    /// One-shot key derivation: absorb `key`, squeeze `out.len()` bytes
    pub fn derive_into(
        mode: ShakeMode,
        name: &[u8],
        custom: &[u8],
        key: &[u8],
        out: &mut [u8],
    ) {
        let mut xof = Self::new(mode, name, custom);
        xof.sponge.absorb(key);
        xof.sponge.pad_and_switch();
        xof.sponge.squeeze(out);
    }
}

impl Xof for CShake {
    fn absorb(&mut self, data: &[u8]) -> Result<()> {
        if self.sponge.is_squeezing() {
            return Err(Error::IllegalOperation {
                context: "cSHAKE",
                reason: "absorb after squeeze has begun",
            });
        }
        self.sponge.absorb(data);
        Ok(())
    }

    fn squeeze(&mut self, out: &mut [u8]) -> Result<()> {
        if !self.sponge.is_squeezing() {
            self.sponge.pad_and_switch();
        }
        self.sponge.squeeze(out);
        Ok(())
    }

    fn reset(&mut self) {
        // a reset cSHAKE forgets N and S along with the input
        self.sponge = Sponge::new(self.mode.rate(), Self::SHAKE_DOMAIN);
    }
}
