//! Counter-mode keystream generation
//!
//! A [`Generator`] owns a variant's expanded key material; the engine
//! owns the counter and hands it in by reference, which is what lets the
//! parallel path position thread-local counter copies at chunk offsets
//! without touching the master counter until the fan-out completes.
//!
//! All byte output is little-endian serialization of the permutation's
//! word output, in counter order, truncated at the tail. The counter
//! advances once per block even when the final block is partial.

use kestrel_internal::counter::{add_le, increment_le, offset_words_le};
use kestrel_internal::endian::{u32_to_le_bytes, u64_to_le_bytes};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::permute::chacha::{permute_csx256, permute_csx512};
use crate::permute::rijndael;
use crate::permute::threefish::{permute_1024, permute_256, permute_512};
use crate::simd::{Lane32, Lane64, U32x4, U32x8, U64x4, U64x8};

use super::SimdProfile;

/// Largest block width across the variants, for stack temporaries
pub(crate) const MAX_BLOCK_SIZE: usize = 128;

/// The per-variant nonce/counter representation
#[derive(Clone, Copy)]
pub(crate) enum StreamCounter {
    /// A 128-bit little-endian integer held as two u64 halves
    Words([u64; 2]),
    /// A full 256-bit counter block, little-endian byte order
    Block([u8; 32]),
}

impl StreamCounter {
    /// Advance by `blocks` positions
    pub(crate) fn advance(&mut self, blocks: u64) {
        match self {
            Self::Words(words) => *words = offset_words_le(words, blocks),
            Self::Block(bytes) => add_le(bytes, blocks),
        }
    }

    /// A copy positioned `blocks` ahead
    pub(crate) fn offset(&self, blocks: u64) -> Self {
        let mut copy = *self;
        copy.advance(blocks);
        copy
    }

    /// Serialized counter value, for the MAC nonce prefix
    pub(crate) fn to_bytes(self) -> ([u8; 32], usize) {
        let mut out = [0u8; 32];
        match self {
            Self::Words(words) => {
                u64_to_le_bytes(words[0], &mut out, 0);
                u64_to_le_bytes(words[1], &mut out, 8);
                (out, 16)
            }
            Self::Block(bytes) => {
                out.copy_from_slice(&bytes);
                (out, 32)
            }
        }
    }

    /// Overwrite with zeros
    pub(crate) fn wipe(&mut self) {
        match self {
            Self::Words(words) => words.zeroize(),
            Self::Block(bytes) => bytes.zeroize(),
        }
    }
}

/// Expanded key material for one variant
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) enum Generator {
    Tsx256 { key: [u64; 4] },
    Tsx512 { key: [u64; 8] },
    Tsx1024 { key: [u64; 16] },
    Csx256 { key: [u32; 8] },
    Csx512 { key: [u64; 8] },
    Rcs { round_keys: Vec<[u8; 32]> },
}

impl Generator {
    /// Fill `out` with keystream starting at `counter`, advancing it
    ///
    /// `tweak` is the variant's two tweak words; CSX-256 reads them as
    /// its four state constants.
    pub(crate) fn generate(
        &self,
        tweak: &[u64; 2],
        profile: SimdProfile,
        counter: &mut StreamCounter,
        out: &mut [u8],
    ) {
        match (self, counter) {
            (Self::Tsx256 { key }, StreamCounter::Words(ctr)) => generate_threefish(
                key,
                tweak,
                72,
                profile,
                permute_256::<u64>,
                permute_256::<U64x4>,
                permute_256::<U64x8>,
                ctr,
                out,
            ),
            (Self::Tsx512 { key }, StreamCounter::Words(ctr)) => generate_threefish(
                key,
                tweak,
                96,
                profile,
                permute_512::<u64>,
                permute_512::<U64x4>,
                permute_512::<U64x8>,
                ctr,
                out,
            ),
            (Self::Tsx1024 { key }, StreamCounter::Words(ctr)) => generate_threefish(
                key,
                tweak,
                120,
                profile,
                permute_1024::<u64>,
                permute_1024::<U64x4>,
                permute_1024::<U64x8>,
                ctr,
                out,
            ),
            (Self::Csx256 { key }, StreamCounter::Words(ctr)) => {
                generate_csx256(key, tweak, profile, ctr, out)
            }
            (Self::Csx512 { key }, StreamCounter::Words(ctr)) => {
                generate_csx512(key, tweak, profile, ctr, out)
            }
            (Self::Rcs { round_keys }, StreamCounter::Block(ctr)) => {
                generate_rcs(round_keys, ctr, out)
            }
            _ => unreachable!("counter representation does not match variant"),
        }
    }
}

/// XOR `input` over `output` byte-wise
pub(crate) fn xor_in_place(output: &mut [u8], input: &[u8]) {
    for (out, inp) in output.iter_mut().zip(input.iter()) {
        *out ^= inp;
    }
}

/// Generate `W::LANES` Threefish blocks into `out`
fn threefish_chunk<W: Lane64, const NW: usize>(
    permute: fn(&[u64; NW], &[u64; 2], [W; 2], usize) -> [W; NW],
    key: &[u64; NW],
    tweak: &[u64; 2],
    rounds: usize,
    counter: &mut [u64; 2],
    out: &mut [u8],
) {
    let c0 = W::from_fn(|lane| offset_words_le(counter, lane as u64)[0]);
    let c1 = W::from_fn(|lane| offset_words_le(counter, lane as u64)[1]);
    let state = permute(key, tweak, [c0, c1], rounds);

    for lane in 0..W::LANES {
        for (w, word) in state.iter().enumerate() {
            u64_to_le_bytes(word.extract(lane), out, lane * NW * 8 + w * 8);
        }
    }
    *counter = offset_words_le(counter, W::LANES as u64);
}

#[allow(clippy::too_many_arguments)]
fn generate_threefish<const NW: usize>(
    key: &[u64; NW],
    tweak: &[u64; 2],
    rounds: usize,
    profile: SimdProfile,
    permute1: fn(&[u64; NW], &[u64; 2], [u64; 2], usize) -> [u64; NW],
    permute4: fn(&[u64; NW], &[u64; 2], [U64x4; 2], usize) -> [U64x4; NW],
    permute8: fn(&[u64; NW], &[u64; 2], [U64x8; 2], usize) -> [U64x8; NW],
    counter: &mut [u64; 2],
    out: &mut [u8],
) {
    let block = NW * 8;
    let len = out.len();
    let mut pos = 0;

    if profile == SimdProfile::Lanes8 {
        while len - pos >= 8 * block {
            threefish_chunk::<U64x8, NW>(
                permute8,
                key,
                tweak,
                rounds,
                counter,
                &mut out[pos..pos + 8 * block],
            );
            pos += 8 * block;
        }
    }
    if profile != SimdProfile::Scalar {
        while len - pos >= 4 * block {
            threefish_chunk::<U64x4, NW>(
                permute4,
                key,
                tweak,
                rounds,
                counter,
                &mut out[pos..pos + 4 * block],
            );
            pos += 4 * block;
        }
    }
    while len - pos >= block {
        threefish_chunk::<u64, NW>(
            permute1,
            key,
            tweak,
            rounds,
            counter,
            &mut out[pos..pos + block],
        );
        pos += block;
    }
    if pos < len {
        let mut tail = [0u8; MAX_BLOCK_SIZE];
        threefish_chunk::<u64, NW>(permute1, key, tweak, rounds, counter, &mut tail[..block]);
        out[pos..].copy_from_slice(&tail[..len - pos]);
        tail.zeroize();
    }
}

/// Generate `W::LANES` CSX-256 blocks into `out`
fn csx256_chunk<W: Lane32>(
    key: &[u32; 8],
    constants: &[u32; 4],
    counter: &mut [u64; 2],
    out: &mut [u8],
) {
    let word = |lane: usize, index: usize| -> u32 {
        let positioned = offset_words_le(counter, lane as u64);
        let half = positioned[index / 2];
        if index % 2 == 0 {
            half as u32
        } else {
            (half >> 32) as u32
        }
    };

    let ctr = [
        W::from_fn(|lane| word(lane, 0)),
        W::from_fn(|lane| word(lane, 1)),
        W::from_fn(|lane| word(lane, 2)),
        W::from_fn(|lane| word(lane, 3)),
    ];
    let state = permute_csx256(key, constants, ctr);

    for lane in 0..W::LANES {
        for (w, word) in state.iter().enumerate() {
            u32_to_le_bytes(word.extract(lane), out, lane * 64 + w * 4);
        }
    }
    *counter = offset_words_le(counter, W::LANES as u64);
}

fn generate_csx256(
    key: &[u32; 8],
    tweak: &[u64; 2],
    profile: SimdProfile,
    counter: &mut [u64; 2],
    out: &mut [u8],
) {
    // the tweak words are the four state constants in disguise
    let constants = [
        tweak[0] as u32,
        (tweak[0] >> 32) as u32,
        tweak[1] as u32,
        (tweak[1] >> 32) as u32,
    ];

    const BLOCK: usize = 64;
    let len = out.len();
    let mut pos = 0;

    if profile == SimdProfile::Lanes8 {
        while len - pos >= 8 * BLOCK {
            csx256_chunk::<U32x8>(key, &constants, counter, &mut out[pos..pos + 8 * BLOCK]);
            pos += 8 * BLOCK;
        }
    }
    if profile != SimdProfile::Scalar {
        while len - pos >= 4 * BLOCK {
            csx256_chunk::<U32x4>(key, &constants, counter, &mut out[pos..pos + 4 * BLOCK]);
            pos += 4 * BLOCK;
        }
    }
    while len - pos >= BLOCK {
        csx256_chunk::<u32>(key, &constants, counter, &mut out[pos..pos + BLOCK]);
        pos += BLOCK;
    }
    if pos < len {
        let mut tail = [0u8; BLOCK];
        csx256_chunk::<u32>(key, &constants, counter, &mut tail);
        out[pos..].copy_from_slice(&tail[..len - pos]);
        tail.zeroize();
    }
}

/// Generate `W::LANES` CSX-512 blocks into `out`
fn csx512_chunk<W: Lane64>(
    key: &[u64; 8],
    tweak: &[u64; 2],
    counter: &mut [u64; 2],
    out: &mut [u8],
) {
    let c0 = W::from_fn(|lane| offset_words_le(counter, lane as u64)[0]);
    let c1 = W::from_fn(|lane| offset_words_le(counter, lane as u64)[1]);
    let state = permute_csx512(key, tweak, [c0, c1]);

    for lane in 0..W::LANES {
        for (w, word) in state.iter().enumerate() {
            u64_to_le_bytes(word.extract(lane), out, lane * 128 + w * 8);
        }
    }
    *counter = offset_words_le(counter, W::LANES as u64);
}

fn generate_csx512(
    key: &[u64; 8],
    tweak: &[u64; 2],
    profile: SimdProfile,
    counter: &mut [u64; 2],
    out: &mut [u8],
) {
    const BLOCK: usize = 128;
    let len = out.len();
    let mut pos = 0;

    if profile == SimdProfile::Lanes8 {
        while len - pos >= 8 * BLOCK {
            csx512_chunk::<U64x8>(key, tweak, counter, &mut out[pos..pos + 8 * BLOCK]);
            pos += 8 * BLOCK;
        }
    }
    if profile != SimdProfile::Scalar {
        while len - pos >= 4 * BLOCK {
            csx512_chunk::<U64x4>(key, tweak, counter, &mut out[pos..pos + 4 * BLOCK]);
            pos += 4 * BLOCK;
        }
    }
    while len - pos >= BLOCK {
        csx512_chunk::<u64>(key, tweak, counter, &mut out[pos..pos + BLOCK]);
        pos += BLOCK;
    }
    if pos < len {
        let mut tail = [0u8; BLOCK];
        csx512_chunk::<u64>(key, tweak, counter, &mut tail);
        out[pos..].copy_from_slice(&tail[..len - pos]);
        tail.zeroize();
    }
}

fn generate_rcs(round_keys: &[[u8; 32]], counter: &mut [u8; 32], out: &mut [u8]) {
    const BLOCK: usize = rijndael::WIDE_BLOCK_SIZE;
    let len = out.len();
    let mut pos = 0;

    while len - pos >= BLOCK {
        let block = rijndael::encrypt_block(round_keys, counter);
        out[pos..pos + BLOCK].copy_from_slice(&block);
        increment_le(counter);
        pos += BLOCK;
    }
    if pos < len {
        let mut block = rijndael::encrypt_block(round_keys, counter);
        out[pos..].copy_from_slice(&block[..len - pos]);
        block.zeroize();
        increment_le(counter);
    }
}
