//! The authenticator slot and its framing state
//!
//! One enum holds whichever MAC generator the stream was constructed
//! with. HMAC and KMAC absorb the raw nonce ‖ aad ‖ ciphertext stream;
//! GMAC and Poly1305 get their own AEAD framing (distinct aad phase,
//! block padding, trailing length words), driven from here so the
//! generators stay plain MACs.

use kestrel_api::{MacEngine, Result};
use kestrel_common::SecureBuffer;

use crate::mac::gmac::Gmac;
use crate::mac::hmac::{HmacSha256, HmacSha512};
use crate::mac::kmac::Kmac;
use crate::mac::poly1305::Poly1305;

use super::{MacFraming, StreamAuthenticator};

pub(crate) enum MacSlot {
    HmacSha256(HmacSha256),
    HmacSha512(HmacSha512),
    Kmac(Kmac),
    Poly1305(Poly1305),
    Gmac(Gmac),
}

impl MacSlot {
    pub(crate) fn build(kind: StreamAuthenticator, key: &[u8], nonce: &[u8]) -> Result<Self> {
        Ok(match kind {
            StreamAuthenticator::HmacSha256 => Self::HmacSha256(HmacSha256::new(key)?),
            StreamAuthenticator::HmacSha512 => Self::HmacSha512(HmacSha512::new(key)?),
            StreamAuthenticator::Kmac256
            | StreamAuthenticator::Kmac512
            | StreamAuthenticator::Kmac1024 => {
                let mode = kind.kmac_mode().expect("kmac kinds carry a mode");
                Self::Kmac(Kmac::new(mode, key, b"")?)
            }
            StreamAuthenticator::Poly1305 => Self::Poly1305(Poly1305::new(key)?),
            StreamAuthenticator::Gmac => Self::Gmac(Gmac::new(key, nonce)?),
        })
    }

    fn engine(&mut self) -> &mut dyn MacEngine {
        match self {
            Self::HmacSha256(mac) => mac,
            Self::HmacSha512(mac) => mac,
            Self::Kmac(mac) => mac,
            Self::Poly1305(mac) => mac,
            Self::Gmac(mac) => mac,
        }
    }

    pub(crate) fn update(&mut self, data: &[u8]) -> Result<()> {
        self.engine().update(data)
    }

    pub(crate) fn finalize_into(&mut self, tag: &mut [u8]) -> Result<()> {
        self.engine().finalize_into(tag)
    }

    pub(crate) fn rekey(&mut self, key: &[u8]) -> Result<()> {
        self.engine().rekey(key)
    }
}

/// Per-instance authentication state across finalization cycles
pub(crate) struct AuthState {
    pub(crate) kind: StreamAuthenticator,
    pub(crate) mac: MacSlot,
    /// Stored for the cross-finalization re-derivation
    pub(crate) mac_key: SecureBuffer,
    /// Bytes of associated data absorbed this cycle
    pub(crate) aad_bytes: u64,
    /// Ciphertext bytes absorbed this cycle
    pub(crate) ct_bytes: u64,
    /// True until the first ciphertext absorb of the cycle
    pub(crate) aad_open: bool,
    /// True once `set_associated_data` has run this cycle
    pub(crate) aad_done: bool,
}

impl AuthState {
    pub(crate) fn new(kind: StreamAuthenticator, mac: MacSlot, mac_key: SecureBuffer) -> Self {
        Self {
            kind,
            mac,
            mac_key,
            aad_bytes: 0,
            ct_bytes: 0,
            aad_open: true,
            aad_done: false,
        }
    }

    /// Absorb associated data for the current cycle
    pub(crate) fn absorb_aad(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.mac {
            MacSlot::Gmac(mac) => mac.update_aad(data)?,
            other => other.update(data)?,
        }
        self.aad_bytes += data.len() as u64;
        self.aad_done = true;
        Ok(())
    }

    /// Absorb ciphertext, closing the aad phase on first use
    pub(crate) fn absorb_ciphertext(&mut self, data: &[u8]) -> Result<()> {
        if self.aad_open {
            self.close_aad_phase()?;
        }
        match &mut self.mac {
            MacSlot::Gmac(mac) => mac.update_ciphertext(data)?,
            other => other.update(data)?,
        }
        self.ct_bytes += data.len() as u64;
        Ok(())
    }

    fn close_aad_phase(&mut self) -> Result<()> {
        self.aad_open = false;
        if self.kind.framing() == MacFraming::Aead {
            if let MacSlot::Poly1305(mac) = &mut self.mac {
                // pad the aad run out to a Poly1305 block boundary
                let residue = (self.aad_bytes % 16) as usize;
                if residue != 0 {
                    mac.update(&[0u8; 16][..16 - residue])?;
                }
            }
            // GMAC pads internally when the ciphertext phase opens
        }
        Ok(())
    }

    /// Close the framing and emit the cycle's tag
    pub(crate) fn finalize(&mut self, tag: &mut [u8]) -> Result<()> {
        if self.aad_open {
            self.close_aad_phase()?;
        }

        if let MacSlot::Poly1305(mac) = &mut self.mac {
            let residue = (self.ct_bytes % 16) as usize;
            if residue != 0 {
                mac.update(&[0u8; 16][..16 - residue])?;
            }
            let mut lengths = [0u8; 16];
            lengths[..8].copy_from_slice(&self.aad_bytes.to_le_bytes());
            lengths[8..].copy_from_slice(&self.ct_bytes.to_le_bytes());
            mac.update(&lengths)?;
        }

        self.mac.finalize_into(tag)
    }

    /// Re-arm the MAC with `key` and open a fresh cycle
    pub(crate) fn open_cycle(&mut self, key: &[u8]) -> Result<()> {
        self.mac.rekey(key)?;
        self.mac_key = SecureBuffer::from_slice(key);
        self.aad_bytes = 0;
        self.ct_bytes = 0;
        self.aad_open = true;
        self.aad_done = false;
        Ok(())
    }
}
