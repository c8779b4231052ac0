//! Threefish-256/512/1024 forward permutations
//!
//! The tweakable block permutation from the Skein family, used here as a
//! counter-mode keystream kernel: the two 64-bit counter words occupy
//! block words 0 and 1 and the remaining words are zero. Round counts are
//! raised above the Skein baseline (72/96/120) for the stream variants.
//!
//! Subkeys are injected every four rounds from the parity-extended key
//! (`C240` XOR of all key words) and the three-word tweak schedule.

use crate::simd::Lane64;

/// Key-schedule parity constant
const C240: u64 = 0x1BD1_1BDA_A9FC_1A22;

/// Threefish-256 rotation schedule
const R256: [[u32; 2]; 8] = [
    [14, 16],
    [52, 57],
    [23, 40],
    [5, 37],
    [25, 33],
    [46, 12],
    [58, 22],
    [32, 32],
];

/// Threefish-512 rotation schedule
const R512: [[u32; 4]; 8] = [
    [46, 36, 19, 37],
    [33, 27, 14, 42],
    [17, 49, 36, 39],
    [44, 9, 54, 56],
    [39, 30, 34, 24],
    [13, 50, 10, 17],
    [25, 29, 39, 43],
    [8, 35, 56, 22],
];

/// Threefish-1024 rotation schedule
const R1024: [[u32; 8]; 8] = [
    [24, 13, 8, 47, 8, 17, 22, 37],
    [38, 19, 10, 55, 49, 18, 23, 52],
    [33, 4, 51, 13, 34, 41, 59, 17],
    [5, 20, 48, 41, 47, 28, 16, 25],
    [41, 9, 37, 31, 12, 47, 44, 30],
    [16, 34, 56, 51, 4, 53, 42, 41],
    [31, 44, 47, 46, 19, 42, 44, 25],
    [9, 48, 35, 52, 23, 31, 37, 20],
];

const PERM256: [usize; 4] = [0, 3, 2, 1];
const PERM512: [usize; 8] = [2, 1, 4, 7, 6, 5, 0, 3];
const PERM1024: [usize; 16] = [0, 9, 2, 13, 6, 11, 4, 15, 10, 7, 12, 3, 14, 5, 8, 1];

/// Extend the key with its parity word
fn extend_key<const NW: usize, const NK: usize>(key: &[u64; NW]) -> [u64; NK] {
    debug_assert_eq!(NK, NW + 1);
    let mut ks = [C240; NK];
    for (i, &k) in key.iter().enumerate() {
        ks[i] = k;
        ks[NK - 1] ^= k;
    }
    ks
}

/// Add subkey `s` into the state
#[inline(always)]
fn inject<W: Lane64>(state: &mut [W], ks: &[u64], ts: &[u64; 3], s: usize) {
    let nw = state.len();
    for i in 0..nw {
        let mut word = ks[(s + i) % (nw + 1)];
        if i == nw - 3 {
            word = word.wrapping_add(ts[s % 3]);
        } else if i == nw - 2 {
            word = word.wrapping_add(ts[(s + 1) % 3]);
        } else if i == nw - 1 {
            word = word.wrapping_add(s as u64);
        }
        state[i] = state[i].add(W::splat(word));
    }
}

macro_rules! threefish_permute {
    ($(#[$meta:meta])* $name:ident, $nw:expr, $rot:ident, $perm:ident) => {
        $(#[$meta])*
        pub(crate) fn $name<W: Lane64>(
            key: &[u64; $nw],
            tweak: &[u64; 2],
            counter: [W; 2],
            rounds: usize,
        ) -> [W; $nw] {
            debug_assert_eq!(rounds % 8, 0);

            let ks: [u64; $nw + 1] = extend_key(key);
            let ts = [tweak[0], tweak[1], tweak[0] ^ tweak[1]];

            let mut state = [W::splat(0); $nw];
            state[0] = counter[0];
            state[1] = counter[1];

            let mut s = 0;
            for d in 0..rounds {
                if d % 4 == 0 {
                    inject(&mut state, &ks, &ts, s);
                    s += 1;
                }

                let rots = &$rot[d % 8];
                for j in 0..$nw / 2 {
                    let x0 = state[2 * j];
                    let x1 = state[2 * j + 1];
                    let y0 = x0.add(x1);
                    state[2 * j] = y0;
                    state[2 * j + 1] = x1.rotl(rots[j]).xor(y0);
                }

                let mixed = state;
                for i in 0..$nw {
                    state[i] = mixed[$perm[i]];
                }
            }
            inject(&mut state, &ks, &ts, s);

            state
        }
    };
}

threefish_permute!(
    /// Threefish-256 forward permutation over a counter block
    permute_256, 4, R256, PERM256
);
threefish_permute!(
    /// Threefish-512 forward permutation over a counter block
    permute_512, 8, R512, PERM512
);
threefish_permute!(
    /// Threefish-1024 forward permutation over a counter block
    permute_1024, 16, R1024, PERM1024
);

#[cfg(test)]
mod tests;
