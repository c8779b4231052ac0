use super::*;

#[test]
fn test_rejects_bad_key_lengths() {
    assert!(expand_key(&[0u8; 15]).is_err());
    assert!(expand_key(&[0u8; 33]).is_err());
    assert!(expand_key(&[0u8; 16]).is_ok());
    assert!(expand_key(&[0u8; 24]).is_ok());
    assert!(expand_key(&[0u8; 32]).is_ok());
}

#[test]
fn test_short_key_padding_marker() {
    // a 16-byte key is the same schedule as that key with the 0x01
    // marker and zero fill spelled out
    let short = expand_key(&[0xab; 16]).unwrap();

    let mut long = [0u8; 32];
    long[..16].copy_from_slice(&[0xab; 16]);
    long[16] = 0x01;
    let explicit = expand_key(&long).unwrap();

    assert_eq!(short, explicit);

    // while the all-zero fill without the marker is a different key
    let mut no_marker = long;
    no_marker[16] = 0x00;
    assert_ne!(short, expand_key(&no_marker).unwrap());
}

#[test]
fn test_deterministic_and_key_sensitive() {
    let rk_a = expand_key(&[1u8; 32]).unwrap();
    let rk_b = expand_key(&[2u8; 32]).unwrap();

    let block = [0x0123_4567u32, 0x89ab_cdef, 0x0f1e_2d3c, 0x4b5a_6978];
    let a1 = permute::<u32>(&rk_a, block);
    let a2 = permute::<u32>(&rk_a, block);
    let b = permute::<u32>(&rk_b, block);

    assert_eq!(a1, a2);
    assert_ne!(a1, b);
}

#[test]
fn test_block_sensitivity() {
    let rk = expand_key(&[9u8; 32]).unwrap();
    let a = permute::<u32>(&rk, [0, 0, 0, 0]);
    let b = permute::<u32>(&rk, [1, 0, 0, 0]);
    assert_ne!(a, b);
    assert_ne!(a, [0u32; 4]);
}

#[test]
fn test_sbox_tables_are_permutations() {
    // every S-box must hit each nibble exactly once or the minterm
    // construction would not be invertible
    for table in SBOX.iter() {
        let mut seen = [false; 16];
        for &v in table.iter() {
            assert!(!seen[v as usize]);
            seen[v as usize] = true;
        }
    }
}

#[test]
fn test_sbox_bitsliced_matches_table() {
    // drive the bitsliced form with one nibble per bit position
    for table in SBOX.iter() {
        for nibble in 0u32..16 {
            let x = [
                if nibble & 1 != 0 { u32::MAX } else { 0 },
                if nibble & 2 != 0 { u32::MAX } else { 0 },
                if nibble & 4 != 0 { u32::MAX } else { 0 },
                if nibble & 8 != 0 { u32::MAX } else { 0 },
            ];
            let y = apply_sbox::<u32>(table, x);
            let got = (y[0] & 1) | (y[1] & 1) << 1 | (y[2] & 1) << 2 | (y[3] & 1) << 3;
            assert_eq!(got, table[nibble as usize] as u32);
        }
    }
}

#[test]
fn test_wide_lanes_match_scalar() {
    let rk = expand_key(&[0x5a; 32]).unwrap();

    let mut blocks4 = [[0u32; 4]; 4];
    let mut blocks8 = [[0u32; 4]; 8];
    for (lane, block) in blocks8.iter_mut().enumerate() {
        *block = [lane as u32, 0xffff_0000, 0, 0x8000_0001];
    }
    blocks4.copy_from_slice(&blocks8[..4]);

    let wide4 = permute_blocks_x4(&rk, blocks4);
    let wide8 = permute_blocks_x8(&rk, blocks8);

    for lane in 0..8 {
        let scalar = permute_block(&rk, [lane as u32, 0xffff_0000, 0, 0x8000_0001]);
        assert_eq!(wide8[lane], scalar);
        if lane < 4 {
            assert_eq!(wide4[lane], scalar);
        }
    }
}
