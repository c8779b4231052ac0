//! ChaCha-derived CSX permutation cores
//!
//! CSX-256 is the RFC 8439 state: sixteen 32-bit words, the sigma
//! constants, eight key words, and a 128-bit counter in the last four
//! words, run for 20 rounds. CSX-512 doubles the word width: sixteen
//! 64-bit words holding four constants, eight key words, the two counter
//! halves, and two tweak words, run for 80 rounds with the 64-bit
//! rotation schedule (38, 19, 10, 55).
//!
//! Both cores end with the feed-forward addition of the input state, so
//! the permutation is one-way in the keystream direction.

use crate::simd::{Lane32, Lane64};

/// "expand 32-byte k", little-endian
pub(crate) const SIGMA_256: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

/// The sigma string doubled out to four 64-bit words
pub(crate) const SIGMA_512: [u64; 4] = [
    0x3320_646e_6170_7865,
    0x6b20_6574_7962_2d32,
    0x3320_646e_6170_7865,
    0x6b20_6574_7962_2d32,
];

/// CSX-256 double-round count (20 rounds total)
pub(crate) const CSX256_DOUBLE_ROUNDS: usize = 10;

/// CSX-512 double-round count (80 rounds total)
pub(crate) const CSX512_DOUBLE_ROUNDS: usize = 40;

#[inline(always)]
fn quarter_round_32<W: Lane32>(state: &mut [W; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].add(state[b]);
    state[d] = state[d].xor(state[a]).rotl(16);

    state[c] = state[c].add(state[d]);
    state[b] = state[b].xor(state[c]).rotl(12);

    state[a] = state[a].add(state[b]);
    state[d] = state[d].xor(state[a]).rotl(8);

    state[c] = state[c].add(state[d]);
    state[b] = state[b].xor(state[c]).rotl(7);
}

#[inline(always)]
fn quarter_round_64<W: Lane64>(state: &mut [W; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].add(state[b]);
    state[d] = state[d].xor(state[a]).rotl(38);

    state[c] = state[c].add(state[d]);
    state[b] = state[b].xor(state[c]).rotl(19);

    state[a] = state[a].add(state[b]);
    state[d] = state[d].xor(state[a]).rotl(10);

    state[c] = state[c].add(state[d]);
    state[b] = state[b].xor(state[c]).rotl(55);
}

/// CSX-256 core: permute one counter position into 16 output words
///
/// `constants` is the sigma block, or the caller's 16-byte info when the
/// cipher is tweaked. `counter` holds the 128-bit counter as four
/// little-endian 32-bit words.
pub(crate) fn permute_csx256<W: Lane32>(
    key: &[u32; 8],
    constants: &[u32; 4],
    counter: [W; 4],
) -> [W; 16] {
    let mut state = [W::splat(0); 16];
    for i in 0..4 {
        state[i] = W::splat(constants[i]);
    }
    for i in 0..8 {
        state[4 + i] = W::splat(key[i]);
    }
    state[12] = counter[0];
    state[13] = counter[1];
    state[14] = counter[2];
    state[15] = counter[3];

    let input = state;
    for _ in 0..CSX256_DOUBLE_ROUNDS {
        quarter_round_32(&mut state, 0, 4, 8, 12);
        quarter_round_32(&mut state, 1, 5, 9, 13);
        quarter_round_32(&mut state, 2, 6, 10, 14);
        quarter_round_32(&mut state, 3, 7, 11, 15);

        quarter_round_32(&mut state, 0, 5, 10, 15);
        quarter_round_32(&mut state, 1, 6, 11, 12);
        quarter_round_32(&mut state, 2, 7, 8, 13);
        quarter_round_32(&mut state, 3, 4, 9, 14);
    }

    for i in 0..16 {
        state[i] = state[i].add(input[i]);
    }
    state
}

/// CSX-512 core: permute one counter position into 16 output words
///
/// State layout: constants, key, the two 64-bit counter halves, the two
/// 64-bit tweak words.
pub(crate) fn permute_csx512<W: Lane64>(
    key: &[u64; 8],
    tweak: &[u64; 2],
    counter: [W; 2],
) -> [W; 16] {
    let mut state = [W::splat(0); 16];
    for i in 0..4 {
        state[i] = W::splat(SIGMA_512[i]);
    }
    for i in 0..8 {
        state[4 + i] = W::splat(key[i]);
    }
    state[12] = counter[0];
    state[13] = counter[1];
    state[14] = W::splat(tweak[0]);
    state[15] = W::splat(tweak[1]);

    let input = state;
    for _ in 0..CSX512_DOUBLE_ROUNDS {
        quarter_round_64(&mut state, 0, 4, 8, 12);
        quarter_round_64(&mut state, 1, 5, 9, 13);
        quarter_round_64(&mut state, 2, 6, 10, 14);
        quarter_round_64(&mut state, 3, 7, 11, 15);

        quarter_round_64(&mut state, 0, 5, 10, 15);
        quarter_round_64(&mut state, 1, 6, 11, 12);
        quarter_round_64(&mut state, 2, 7, 8, 13);
        quarter_round_64(&mut state, 3, 4, 9, 14);
    }

    for i in 0..16 {
        state[i] = state[i].add(input[i]);
    }
    state
}
