//! GMAC: GHASH-based authentication per NIST SP 800-38D
//!
//! The GCM authentication half without the encryption half. The hash
//! subkey is `H = E_K(0^128)`; a 12-byte nonce forms `J0` directly and
//! any other length is run through GHASH. The GF(2^128) multiply is
//! bit-serial with mask selection, never table-driven, so no
//! secret-indexed lookups occur.
//!
//! Standalone use authenticates associated data only. The stream engine
//! additionally feeds ciphertext through the second GHASH phase.

use kestrel_api::{Error, Result, SymmetricKeySize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::aes::{Aes128, AES128_KEY_SIZE};

/// GMAC tag size in bytes
pub const GMAC_TAG_SIZE: usize = 16;

const BLOCK_SIZE: usize = 16;

/// Multiply two GF(2^128) elements in GCM bit order
fn gf_multiply(x: &[u8; 16], y: &[u8; 16]) -> [u8; 16] {
    let mut z = [0u8; 16];
    let mut v = *y;

    for i in 0..128 {
        let bit = (x[i / 8] >> (7 - (i % 8))) & 1;
        let mask = bit.wrapping_neg();
        for j in 0..16 {
            z[j] ^= v[j] & mask;
        }

        let lsb = v[15] & 1;
        let reduce = lsb.wrapping_neg();
        for j in (1..16).rev() {
            v[j] = (v[j] >> 1) | (v[j - 1] << 7);
        }
        v[0] >>= 1;
        v[0] ^= reduce & 0xe1;
    }
    z
}

/// GMAC generator
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Gmac {
    #[zeroize(skip)]
    cipher: Option<Aes128>,
    h: [u8; 16],
    j0: [u8; 16],
    y: [u8; 16],
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    aad_bytes: u64,
    msg_bytes: u64,
    in_aad_phase: bool,
    nonce: Vec<u8>,
}

impl Gmac {
    /// Create a keyed instance bound to `nonce`
    pub fn new(key: &[u8], nonce: &[u8]) -> Result<Self> {
        if nonce.is_empty() {
            return Err(Error::InvalidNonce {
                context: "GMAC",
                actual: 0,
            });
        }

        let mut mac = Self {
            cipher: None,
            h: [0; 16],
            j0: [0; 16],
            y: [0; 16],
            buffer: [0; BLOCK_SIZE],
            buffer_len: 0,
            aad_bytes: 0,
            msg_bytes: 0,
            in_aad_phase: true,
            nonce: nonce.to_vec(),
        };
        mac.arm(key)?;
        Ok(mac)
    }

    fn arm(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != AES128_KEY_SIZE {
            return Err(Error::InvalidKey {
                context: "GMAC",
                actual: key.len(),
            });
        }

        let cipher = Aes128::new(key)?;
        self.h = cipher.encrypt_block(&[0u8; 16]);
        self.j0 = Self::derive_j0(&self.h, &self.nonce);
        self.cipher = Some(cipher);

        self.y = [0; 16];
        self.buffer = [0; BLOCK_SIZE];
        self.buffer_len = 0;
        self.aad_bytes = 0;
        self.msg_bytes = 0;
        self.in_aad_phase = true;
        Ok(())
    }

    fn derive_j0(h: &[u8; 16], nonce: &[u8]) -> [u8; 16] {
        if nonce.len() == 12 {
            let mut j0 = [0u8; 16];
            j0[..12].copy_from_slice(nonce);
            j0[15] = 1;
            return j0;
        }

        let mut y = [0u8; 16];
        for chunk in nonce.chunks(BLOCK_SIZE) {
            let mut block = [0u8; 16];
            block[..chunk.len()].copy_from_slice(chunk);
            for j in 0..16 {
                y[j] ^= block[j];
            }
            y = gf_multiply(&y, h);
        }

        let mut len_block = [0u8; 16];
        len_block[8..].copy_from_slice(&(nonce.len() as u64 * 8).to_be_bytes());
        for j in 0..16 {
            y[j] ^= len_block[j];
        }
        gf_multiply(&y, h)
    }

    fn absorb_block(&mut self, block: &[u8; 16]) {
        for j in 0..16 {
            self.y[j] ^= block[j];
        }
        self.y = gf_multiply(&self.y, &self.h);
    }

    fn absorb_bytes(&mut self, data: &[u8]) {
        let mut input = data;

        if self.buffer_len > 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];

            if self.buffer_len == BLOCK_SIZE {
                let block = self.buffer;
                self.absorb_block(&block);
                self.buffer_len = 0;
            }
        }

        while input.len() >= BLOCK_SIZE {
            let block: [u8; 16] = input[..BLOCK_SIZE].try_into().expect("chunk is a block");
            self.absorb_block(&block);
            input = &input[BLOCK_SIZE..];
        }

        if !input.is_empty() {
            self.buffer[..input.len()].copy_from_slice(input);
            self.buffer_len = input.len();
        }
    }

    /// Flush a partial block, zero-padded
    fn flush_padded(&mut self) {
        if self.buffer_len > 0 {
            let mut block = [0u8; 16];
            block[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
            self.absorb_block(&block);
            self.buffer_len = 0;
        }
    }

    /// Absorb associated data; must precede any ciphertext
    pub fn update_aad(&mut self, data: &[u8]) -> Result<()> {
        if self.cipher.is_none() {
            return Err(Error::IllegalOperation {
                context: "GMAC",
                reason: "update before keying",
            });
        }
        if !self.in_aad_phase {
            return Err(Error::IllegalOperation {
                context: "GMAC",
                reason: "associated data after ciphertext",
            });
        }
        self.aad_bytes += data.len() as u64;
        self.absorb_bytes(data);
        Ok(())
    }

    /// Absorb ciphertext, closing the AAD phase on first use
    pub fn update_ciphertext(&mut self, data: &[u8]) -> Result<()> {
        if self.cipher.is_none() {
            return Err(Error::IllegalOperation {
                context: "GMAC",
                reason: "update before keying",
            });
        }
        if self.in_aad_phase {
            self.flush_padded();
            self.in_aad_phase = false;
        }
        self.msg_bytes += data.len() as u64;
        self.absorb_bytes(data);
        Ok(())
    }
}

impl kestrel_api::MacEngine for Gmac {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        // standalone GMAC authenticates associated data only
        self.update_aad(data)
    }

    fn finalize_into(&mut self, tag: &mut [u8]) -> Result<()> {
        if tag.len() != GMAC_TAG_SIZE {
            return Err(Error::InvalidSize {
                context: "GMAC tag",
                expected: GMAC_TAG_SIZE,
                actual: tag.len(),
            });
        }
        let cipher = self.cipher.take().ok_or(Error::IllegalOperation {
            context: "GMAC",
            reason: "finalize before keying",
        })?;

        self.flush_padded();

        let mut len_block = [0u8; 16];
        len_block[..8].copy_from_slice(&(self.aad_bytes * 8).to_be_bytes());
        len_block[8..].copy_from_slice(&(self.msg_bytes * 8).to_be_bytes());
        self.absorb_block(&len_block);

        let ek_j0 = cipher.encrypt_block(&self.j0);
        for (slot, (s, e)) in tag.iter_mut().zip(self.y.iter().zip(ek_j0.iter())) {
            *slot = s ^ e;
        }

        self.h.zeroize();
        self.j0.zeroize();
        self.y.zeroize();
        self.buffer.zeroize();
        self.buffer_len = 0;
        Ok(())
    }

    fn rekey(&mut self, key: &[u8]) -> Result<()> {
        self.arm(key)
    }

    fn tag_size(&self) -> usize {
        GMAC_TAG_SIZE
    }

    fn legal_key_sizes(&self) -> &'static [SymmetricKeySize] {
        const SIZES: [SymmetricKeySize; 1] = [SymmetricKeySize::new(AES128_KEY_SIZE, 12, 0)];
        &SIZES
    }

    fn name(&self) -> &'static str {
        "GMAC"
    }

    fn is_initialized(&self) -> bool {
        self.cipher.is_some()
    }
}
