//! The SHAKE extendable-output family
//!
//! FIPS 202 semantics at the 128/256 rates, and the extended 512/1024
//! rates used by the large-key stream ciphers. Output length is decided
//! by the caller: squeeze as much as needed, in any split.

use kestrel_api::{Error, Result, Xof};

use super::{ShakeMode, Sponge};

/// A SHAKE sponge instance
#[derive(Clone)]
pub struct Shake {
    sponge: Sponge,
    mode: ShakeMode,
}

impl Shake {
    /// SHAKE domain-separation byte
    const DOMAIN: u8 = 0x1F;

    /// Create an instance of the given mode
    pub fn new(mode: ShakeMode) -> Self {
        Self {
            sponge: Sponge::new(mode.rate(), Self::DOMAIN),
            mode,
        }
    }

    /// Mode selected at construction
    pub fn mode(&self) -> ShakeMode {
        self.mode
    }

    /// One-shot convenience: absorb `input`, squeeze `out.len()` bytes
    pub fn hash_into(mode: ShakeMode, input: &[u8], out: &mut [u8]) {
        let mut xof = Self::new(mode);
        xof.sponge.absorb(input);
        xof.sponge.pad_and_switch();
        xof.sponge.squeeze(out);
    }
}

impl Xof for Shake {
    fn absorb(&mut self, data: &[u8]) -> Result<()> {
        if self.sponge.is_squeezing() {
            return Err(Error::IllegalOperation {
                context: "SHAKE",
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
        self.sponge = Sponge::new(self.mode.rate(), Self::DOMAIN);
    }
}
