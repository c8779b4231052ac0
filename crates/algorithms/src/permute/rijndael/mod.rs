//! Wide-block Rijndael round function (RCS kernel)
//!
//! A 256-bit Rijndael with the AES S-box, the eight-column ShiftRows
//! offsets {0, 1, 3, 4}, and the standard MixColumns MDS over each
//! 4-byte column. Round keys arrive pre-expanded — the stream cipher
//! derives its schedule through cSHAKE, never through the FIPS-197
//! recurrence — and the kernel runs 14, 22, or 30 rounds accordingly.

use crate::block::aes::{mix_column, sub_byte};

/// Block width in bytes
pub(crate) const WIDE_BLOCK_SIZE: usize = 32;

/// Columns in the 256-bit state
const COLS: usize = 8;

/// ShiftRows offsets for the 256-bit block
const ROW_OFFSETS: [usize; 4] = [0, 1, 3, 4];

#[inline(always)]
fn shift_rows_wide(state: &mut [u8; WIDE_BLOCK_SIZE]) {
    let old = *state;
    for r in 1..4 {
        for c in 0..COLS {
            state[4 * c + r] = old[4 * ((c + ROW_OFFSETS[r]) % COLS) + r];
        }
    }
}

#[inline(always)]
fn add_round_key(state: &mut [u8; WIDE_BLOCK_SIZE], rk: &[u8; WIDE_BLOCK_SIZE]) {
    for (s, k) in state.iter_mut().zip(rk.iter()) {
        *s ^= k;
    }
}

/// Encrypt one 32-byte counter block under the expanded schedule
///
/// `round_keys` holds rounds + 1 whitening/round keys.
pub(crate) fn encrypt_block(
    round_keys: &[[u8; WIDE_BLOCK_SIZE]],
    block: &[u8; WIDE_BLOCK_SIZE],
) -> [u8; WIDE_BLOCK_SIZE] {
    debug_assert!(round_keys.len() >= 2);
    let rounds = round_keys.len() - 1;

    let mut state = *block;
    add_round_key(&mut state, &round_keys[0]);

    for rk in round_keys.iter().take(rounds).skip(1) {
        for byte in state.iter_mut() {
            *byte = sub_byte(*byte);
        }
        shift_rows_wide(&mut state);
        for c in 0..COLS {
            mix_column(&mut state[4 * c..4 * c + 4]);
        }
        add_round_key(&mut state, rk);
    }

    for byte in state.iter_mut() {
        *byte = sub_byte(*byte);
    }
    shift_rows_wide(&mut state);
    add_round_key(&mut state, &round_keys[rounds]);

    state
}
