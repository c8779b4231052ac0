//! Serpent forward permutation (SHX kernel)
//!
//! 128-bit block, 32 rounds, bitsliced over four 32-bit words with X0
//! holding the least-significant bit of each nibble. The S-boxes are
//! applied through their truth tables as disjoint-minterm boolean
//! functions, which keeps one generic body correct for the scalar and
//! the four- and eight-block lane forms alike.
//!
//! Only the forward direction exists here; the block-mode scaffolding
//! that would use the inverse lives outside this library.

use kestrel_api::{Error, Result};

use crate::simd::{Lane32, U32x4, U32x8};

/// Golden-ratio constant of the key schedule
const PHI: u32 = 0x9e37_79b9;

/// Number of rounds
pub(crate) const SERPENT_ROUNDS: usize = 32;

/// The eight Serpent S-boxes as nibble tables
const SBOX: [[u8; 16]; 8] = [
    [3, 8, 15, 1, 10, 6, 5, 11, 14, 13, 4, 2, 7, 0, 9, 12],
    [15, 12, 2, 7, 9, 0, 5, 10, 1, 11, 14, 8, 6, 13, 3, 4],
    [8, 6, 7, 9, 3, 12, 10, 15, 13, 1, 14, 4, 0, 11, 5, 2],
    [0, 15, 11, 8, 12, 9, 6, 3, 13, 1, 2, 4, 10, 7, 5, 14],
    [1, 15, 8, 3, 12, 0, 11, 6, 2, 5, 4, 10, 9, 14, 7, 13],
    [15, 5, 2, 11, 4, 10, 9, 12, 0, 3, 14, 8, 13, 6, 7, 1],
    [7, 2, 12, 5, 8, 4, 6, 11, 14, 9, 1, 15, 13, 3, 10, 0],
    [1, 13, 15, 0, 14, 8, 2, 11, 7, 4, 12, 10, 9, 3, 5, 6],
];

/// Apply one S-box bitslice-wise
///
/// Builds the sixteen disjoint input minterms and ORs each into the
/// output bits its table entry sets. Branch-free in the data; the only
/// control flow depends on the public table.
fn apply_sbox<W: Lane32>(table: &[u8; 16], x: [W; 4]) -> [W; 4] {
    let nx = [x[0].not(), x[1].not(), x[2].not(), x[3].not()];
    let mut out = [W::splat(0); 4];

    for (entry, &value) in table.iter().enumerate() {
        let t0 = if entry & 1 != 0 { x[0] } else { nx[0] };
        let t1 = if entry & 2 != 0 { x[1] } else { nx[1] };
        let t2 = if entry & 4 != 0 { x[2] } else { nx[2] };
        let t3 = if entry & 8 != 0 { x[3] } else { nx[3] };
        let minterm = t0.and(t1).and(t2).and(t3);

        for (bit, slot) in out.iter_mut().enumerate() {
            if value >> bit & 1 != 0 {
                *slot = slot.or(minterm);
            }
        }
    }
    out
}

/// The Serpent linear transform
#[inline(always)]
fn linear_transform<W: Lane32>(x: &mut [W; 4]) {
    x[0] = x[0].rotl(13);
    x[2] = x[2].rotl(3);
    x[1] = x[1].xor(x[0]).xor(x[2]);
    x[3] = x[3].xor(x[2]).xor(x[0].shl(3));
    x[1] = x[1].rotl(1);
    x[3] = x[3].rotl(7);
    x[0] = x[0].xor(x[1]).xor(x[3]);
    x[2] = x[2].xor(x[3]).xor(x[1].shl(7));
    x[0] = x[0].rotl(5);
    x[2] = x[2].rotl(22);
}

/// Expand a 16/24/32-byte key into the 33 round keys
///
/// Short keys take the `0x01` marker byte and zero padding before the
/// PHI recurrence runs; the prekeys are then pushed through the S-boxes
/// in the 3, 2, 1, 0, 7, ... group order.
pub fn expand_key(key: &[u8]) -> Result<[[u32; 4]; 33]> {
    if !matches!(key.len(), 16 | 24 | 32) {
        return Err(Error::InvalidKey {
            context: "Serpent",
            actual: key.len(),
        });
    }

    let mut padded = [0u8; 32];
    padded[..key.len()].copy_from_slice(key);
    if key.len() < 32 {
        padded[key.len()] = 0x01;
    }

    let mut w = [0u32; 140];
    for (i, slot) in w.iter_mut().take(8).enumerate() {
        *slot = u32::from_le_bytes([
            padded[4 * i],
            padded[4 * i + 1],
            padded[4 * i + 2],
            padded[4 * i + 3],
        ]);
    }
    for i in 8..140 {
        let t = w[i - 8] ^ w[i - 5] ^ w[i - 3] ^ w[i - 1] ^ PHI ^ (i as u32 - 8);
        w[i] = t.rotate_left(11);
    }

    let mut round_keys = [[0u32; 4]; 33];
    for (g, rk) in round_keys.iter_mut().enumerate() {
        let sbox = &SBOX[(3usize.wrapping_sub(g)) % 8];
        let pre = [w[8 + 4 * g], w[9 + 4 * g], w[10 + 4 * g], w[11 + 4 * g]];
        *rk = apply_sbox::<u32>(sbox, pre);
    }
    Ok(round_keys)
}

/// Serpent forward permutation over one block per lane
fn permute<W: Lane32>(round_keys: &[[u32; 4]; 33], block: [W; 4]) -> [W; 4] {
    let mut x = block;

    for round in 0..SERPENT_ROUNDS {
        for i in 0..4 {
            x[i] = x[i].xor(W::splat(round_keys[round][i]));
        }
        x = apply_sbox(&SBOX[round % 8], x);

        if round < SERPENT_ROUNDS - 1 {
            linear_transform(&mut x);
        } else {
            for i in 0..4 {
                x[i] = x[i].xor(W::splat(round_keys[32][i]));
            }
        }
    }
    x
}

/// Forward-permute one 128-bit block, given as four little-endian words
pub fn permute_block(round_keys: &[[u32; 4]; 33], block: [u32; 4]) -> [u32; 4] {
    permute::<u32>(round_keys, block)
}

fn permute_lanes<W: Lane32, const N: usize>(
    round_keys: &[[u32; 4]; 33],
    blocks: [[u32; 4]; N],
) -> [[u32; 4]; N] {
    debug_assert_eq!(W::LANES, N);
    let bundled = [
        W::from_fn(|lane| blocks[lane][0]),
        W::from_fn(|lane| blocks[lane][1]),
        W::from_fn(|lane| blocks[lane][2]),
        W::from_fn(|lane| blocks[lane][3]),
    ];
    let out = permute(round_keys, bundled);

    let mut result = [[0u32; 4]; N];
    for (lane, block) in result.iter_mut().enumerate() {
        for (word, slot) in block.iter_mut().enumerate() {
            *slot = out[word].extract(lane);
        }
    }
    result
}

/// Forward-permute four blocks through 128-bit lane replication
pub fn permute_blocks_x4(round_keys: &[[u32; 4]; 33], blocks: [[u32; 4]; 4]) -> [[u32; 4]; 4] {
    permute_lanes::<U32x4, 4>(round_keys, blocks)
}

/// Forward-permute eight blocks through 256-bit lane replication
pub fn permute_blocks_x8(round_keys: &[[u32; 4]; 33], blocks: [[u32; 4]; 8]) -> [[u32; 4]; 8] {
    permute_lanes::<U32x8, 8>(round_keys, blocks)
}

#[cfg(test)]
mod tests;
