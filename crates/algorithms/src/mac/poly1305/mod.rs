//! Poly1305 one-time authenticator
//!
//! 26-bit limb arithmetic over 2^130 - 5. The 32-byte key splits into
//! the clamped polynomial key `r` and the final pad `s`; the key must
//! never authenticate two different messages, which the stream engine
//! guarantees by re-deriving it every finalization cycle.

use kestrel_api::{Error, Result, SymmetricKeySize};
use kestrel_internal::endian::le_bytes_to_u32;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Poly1305 key size in bytes
pub const POLY1305_KEY_SIZE: usize = 32;
/// Poly1305 tag size in bytes
pub const POLY1305_TAG_SIZE: usize = 16;

const BLOCK_SIZE: usize = 16;
const LIMB_MASK: u32 = 0x03ff_ffff;

/// Poly1305 MAC generator
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Poly1305 {
    r: [u32; 5],
    s: [u32; 4],
    h: [u32; 5],
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    initialized: bool,
}

impl Poly1305 {
    /// Create a keyed instance from a 32-byte one-time key
    pub fn new(key: &[u8]) -> Result<Self> {
        let mut mac = Self {
            r: [0; 5],
            s: [0; 4],
            h: [0; 5],
            buffer: [0; BLOCK_SIZE],
            buffer_len: 0,
            initialized: false,
        };
        mac.arm(key)?;
        Ok(mac)
    }

    fn arm(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != POLY1305_KEY_SIZE {
            return Err(Error::InvalidKey {
                context: "Poly1305",
                actual: key.len(),
            });
        }

        // clamp r per RFC 8439
        self.r[0] = le_bytes_to_u32(key, 0) & 0x03ff_ffff;
        self.r[1] = (le_bytes_to_u32(key, 3) >> 2) & 0x03ff_ff03;
        self.r[2] = (le_bytes_to_u32(key, 6) >> 4) & 0x03ff_c0ff;
        self.r[3] = (le_bytes_to_u32(key, 9) >> 6) & 0x03f0_3fff;
        self.r[4] = (le_bytes_to_u32(key, 12) >> 8) & 0x000f_ffff;

        for i in 0..4 {
            self.s[i] = le_bytes_to_u32(key, 16 + 4 * i);
        }

        self.h = [0; 5];
        self.buffer = [0; BLOCK_SIZE];
        self.buffer_len = 0;
        self.initialized = true;
        Ok(())
    }

    fn process_block(&mut self, block: &[u8], hibit: u32) {
        let [r0, r1, r2, r3, r4] = self.r;
        let [mut h0, mut h1, mut h2, mut h3, mut h4] = self.h;

        h0 = h0.wrapping_add(le_bytes_to_u32(block, 0) & LIMB_MASK);
        h1 = h1.wrapping_add((le_bytes_to_u32(block, 3) >> 2) & LIMB_MASK);
        h2 = h2.wrapping_add((le_bytes_to_u32(block, 6) >> 4) & LIMB_MASK);
        h3 = h3.wrapping_add((le_bytes_to_u32(block, 9) >> 6) & LIMB_MASK);
        h4 = h4.wrapping_add((le_bytes_to_u32(block, 12) >> 8) | hibit);

        let s1 = 5 * r1;
        let s2 = 5 * r2;
        let s3 = 5 * r3;
        let s4 = 5 * r4;

        let d0 = h0 as u64 * r0 as u64
            + h1 as u64 * s4 as u64
            + h2 as u64 * s3 as u64
            + h3 as u64 * s2 as u64
            + h4 as u64 * s1 as u64;
        let mut d1 = h0 as u64 * r1 as u64
            + h1 as u64 * r0 as u64
            + h2 as u64 * s4 as u64
            + h3 as u64 * s3 as u64
            + h4 as u64 * s2 as u64;
        let mut d2 = h0 as u64 * r2 as u64
            + h1 as u64 * r1 as u64
            + h2 as u64 * r0 as u64
            + h3 as u64 * s4 as u64
            + h4 as u64 * s3 as u64;
        let mut d3 = h0 as u64 * r3 as u64
            + h1 as u64 * r2 as u64
            + h2 as u64 * r1 as u64
            + h3 as u64 * r0 as u64
            + h4 as u64 * s4 as u64;
        let mut d4 = h0 as u64 * r4 as u64
            + h1 as u64 * r3 as u64
            + h2 as u64 * r2 as u64
            + h3 as u64 * r1 as u64
            + h4 as u64 * r0 as u64;

        let mut c = (d0 >> 26) as u32;
        h0 = d0 as u32 & LIMB_MASK;
        d1 += c as u64;
        c = (d1 >> 26) as u32;
        h1 = d1 as u32 & LIMB_MASK;
        d2 += c as u64;
        c = (d2 >> 26) as u32;
        h2 = d2 as u32 & LIMB_MASK;
        d3 += c as u64;
        c = (d3 >> 26) as u32;
        h3 = d3 as u32 & LIMB_MASK;
        d4 += c as u64;
        c = (d4 >> 26) as u32;
        h4 = d4 as u32 & LIMB_MASK;

        h0 = h0.wrapping_add(c.wrapping_mul(5));
        c = h0 >> 26;
        h0 &= LIMB_MASK;
        h1 = h1.wrapping_add(c);

        self.h = [h0, h1, h2, h3, h4];
    }

    fn finalize_tag(&mut self, tag: &mut [u8]) {
        if self.buffer_len > 0 {
            let mut last = [0u8; BLOCK_SIZE];
            last[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
            last[self.buffer_len] = 0x01;
            self.process_block(&last, 0);
            last.zeroize();
        }

        let [mut h0, mut h1, mut h2, mut h3, mut h4] = self.h;

        let mut c = h1 >> 26;
        h1 &= LIMB_MASK;
        h2 = h2.wrapping_add(c);
        c = h2 >> 26;
        h2 &= LIMB_MASK;
        h3 = h3.wrapping_add(c);
        c = h3 >> 26;
        h3 &= LIMB_MASK;
        h4 = h4.wrapping_add(c);
        c = h4 >> 26;
        h4 &= LIMB_MASK;
        h0 = h0.wrapping_add(c.wrapping_mul(5));
        c = h0 >> 26;
        h0 &= LIMB_MASK;
        h1 = h1.wrapping_add(c);

        // compare against the modulus: g = h + 5 - 2^130
        let mut g0 = h0.wrapping_add(5);
        c = g0 >> 26;
        g0 &= LIMB_MASK;
        let mut g1 = h1.wrapping_add(c);
        c = g1 >> 26;
        g1 &= LIMB_MASK;
        let mut g2 = h2.wrapping_add(c);
        c = g2 >> 26;
        g2 &= LIMB_MASK;
        let mut g3 = h3.wrapping_add(c);
        c = g3 >> 26;
        g3 &= LIMB_MASK;
        let g4 = h4.wrapping_add(c).wrapping_sub(1 << 26);

        // select h or g without branching on the borrow
        let mask = (g4 >> 31).wrapping_sub(1);
        h0 = (h0 & !mask) | (g0 & mask);
        h1 = (h1 & !mask) | (g1 & mask);
        h2 = (h2 & !mask) | (g2 & mask);
        h3 = (h3 & !mask) | (g3 & mask);
        h4 = (h4 & !mask) | (g4 & mask);

        let t0 = h0 | (h1 << 26);
        let t1 = (h1 >> 6) | (h2 << 20);
        let t2 = (h2 >> 12) | (h3 << 14);
        let t3 = (h3 >> 18) | (h4 << 8);

        let mut f = t0 as u64 + self.s[0] as u64;
        tag[0..4].copy_from_slice(&(f as u32).to_le_bytes());
        f = t1 as u64 + self.s[1] as u64 + (f >> 32);
        tag[4..8].copy_from_slice(&(f as u32).to_le_bytes());
        f = t2 as u64 + self.s[2] as u64 + (f >> 32);
        tag[8..12].copy_from_slice(&(f as u32).to_le_bytes());
        f = t3 as u64 + self.s[3] as u64 + (f >> 32);
        tag[12..16].copy_from_slice(&(f as u32).to_le_bytes());
    }

    /// One-shot MAC helper
    pub fn mac_into(key: &[u8], data: &[u8], tag: &mut [u8]) -> Result<()> {
        let mut mac = Self::new(key)?;
        kestrel_api::MacEngine::update(&mut mac, data)?;
        kestrel_api::MacEngine::finalize_into(&mut mac, tag)
    }
}

impl kestrel_api::MacEngine for Poly1305 {
    fn update(&mut self, data: &[u8]) -> Result<()> {
        if !self.initialized {
            return Err(Error::IllegalOperation {
                context: "Poly1305",
                reason: "update before keying",
            });
        }

        let mut input = data;
        if self.buffer_len > 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];

            if self.buffer_len == BLOCK_SIZE {
                let block = self.buffer;
                self.process_block(&block, 1 << 24);
                self.buffer_len = 0;
            }
        }

        while input.len() >= BLOCK_SIZE {
            let (block, rest) = input.split_at(BLOCK_SIZE);
            self.process_block(block, 1 << 24);
            input = rest;
        }

        if !input.is_empty() {
            self.buffer[..input.len()].copy_from_slice(input);
            self.buffer_len = input.len();
        }
        Ok(())
    }

    fn finalize_into(&mut self, tag: &mut [u8]) -> Result<()> {
        if tag.len() != POLY1305_TAG_SIZE {
            return Err(Error::InvalidSize {
                context: "Poly1305 tag",
                expected: POLY1305_TAG_SIZE,
                actual: tag.len(),
            });
        }
        if !self.initialized {
            return Err(Error::IllegalOperation {
                context: "Poly1305",
                reason: "finalize before keying",
            });
        }

        self.finalize_tag(tag);

        self.r.zeroize();
        self.s.zeroize();
        self.h.zeroize();
        self.buffer.zeroize();
        self.buffer_len = 0;
        self.initialized = false;
        Ok(())
    }

    fn rekey(&mut self, key: &[u8]) -> Result<()> {
        self.arm(key)
    }

    fn tag_size(&self) -> usize {
        POLY1305_TAG_SIZE
    }

    fn legal_key_sizes(&self) -> &'static [SymmetricKeySize] {
        const SIZES: [SymmetricKeySize; 1] = [SymmetricKeySize::new(POLY1305_KEY_SIZE, 0, 0)];
        &SIZES
    }

    fn name(&self) -> &'static str {
        "Poly1305"
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests;
