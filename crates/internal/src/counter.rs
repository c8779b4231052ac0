//! Segmented counter arithmetic
//!
//! Counter-mode keystream generation treats a nonce as one large integer
//! and steps it per block. Two representations are used: raw byte strings
//! in a declared byte order (the wide-block ciphers), and a pair of
//! little-endian u64 words forming a 128-bit integer (the ARX ciphers).

/// Increment `buf` as one big little-endian integer
///
/// The carry propagates from `buf[0]` toward the end; wrapping at the
/// maximum value rolls over to zero.
pub fn increment_le(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Increment `buf` as one big big-endian integer
pub fn increment_be(buf: &mut [u8]) {
    for byte in buf.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Add a scalar to `buf` interpreted as one big little-endian integer
///
/// The scalar (any unsigned width up to u64) is serialized
/// little-endian and added with full carry propagation through the
/// higher-order bytes.
pub fn add_le<T: Into<u64>>(buf: &mut [u8], value: T) {
    let mut carry = 0u16;
    let le = value.into().to_le_bytes();

    for (i, byte) in buf.iter_mut().enumerate() {
        let add = if i < 8 { le[i] as u16 } else { 0 };
        let sum = *byte as u16 + add + carry;
        *byte = sum as u8;
        carry = sum >> 8;
    }
}

/// Increment a 128-bit counter held as two little-endian u64 halves
#[inline]
pub fn increment_words_le(counter: &mut [u64; 2]) {
    counter[0] = counter[0].wrapping_add(1);
    if counter[0] == 0 {
        counter[1] = counter[1].wrapping_add(1);
    }
}

/// Return `counter + delta` for a 128-bit counter of two u64 halves
///
/// Used to position a chunk's thread-local counter at its block offset
/// without disturbing the master counter.
#[inline]
pub fn offset_words_le(counter: &[u64; 2], delta: u64) -> [u64; 2] {
    let (low, overflow) = counter[0].overflowing_add(delta);
    let high = counter[1].wrapping_add(overflow as u64);
    [low, high]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_le_carry() {
        let mut buf = [0xff, 0xff, 0x00];
        increment_le(&mut buf);
        assert_eq!(buf, [0x00, 0x00, 0x01]);

        let mut wrap = [0xffu8; 2];
        increment_le(&mut wrap);
        assert_eq!(wrap, [0x00, 0x00]);
    }

    #[test]
    fn test_increment_be_carry() {
        let mut buf = [0x00, 0xff, 0xff];
        increment_be(&mut buf);
        assert_eq!(buf, [0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_add_le_matches_repeated_increment() {
        let mut a = [0xfe, 0xff, 0x00, 0x00];
        let mut b = a;
        add_le(&mut a, 5u16);
        for _ in 0..5 {
            increment_le(&mut b);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_add_le_wide_carry() {
        // carry must run past the 8 serialized scalar bytes
        let mut buf = [0xffu8; 10];
        buf[8] = 0x00;
        add_le(&mut buf, 1u64);
        let mut expected = [0x00u8; 10];
        expected[8] = 0x01;
        expected[9] = 0xff;
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_offset_words_matches_increments() {
        let base = [u64::MAX - 2, 7];
        let stepped = offset_words_le(&base, 5);
        let mut walked = base;
        for _ in 0..5 {
            increment_words_le(&mut walked);
        }
        assert_eq!(stepped, walked);
        assert_eq!(stepped[1], 8);
    }
}
