//! Endianness utility functions
//!
//! Load/store helpers that are exact about byte order regardless of the
//! host. The scalar forms read a fixed-width word at a byte offset; the
//! batched forms convert whole blocks, which is what the permutation
//! kernels use.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Read a u32 from `src` at `offset` in little-endian byte order
#[inline(always)]
pub fn le_bytes_to_u32(src: &[u8], offset: usize) -> u32 {
    LittleEndian::read_u32(&src[offset..offset + 4])
}

/// Read a u64 from `src` at `offset` in little-endian byte order
#[inline(always)]
pub fn le_bytes_to_u64(src: &[u8], offset: usize) -> u64 {
    LittleEndian::read_u64(&src[offset..offset + 8])
}

/// Read a u32 from `src` at `offset` in big-endian byte order
#[inline(always)]
pub fn be_bytes_to_u32(src: &[u8], offset: usize) -> u32 {
    BigEndian::read_u32(&src[offset..offset + 4])
}

/// Read a u64 from `src` at `offset` in big-endian byte order
#[inline(always)]
pub fn be_bytes_to_u64(src: &[u8], offset: usize) -> u64 {
    BigEndian::read_u64(&src[offset..offset + 8])
}

/// Write `value` into `dst` at `offset` in little-endian byte order
#[inline(always)]
pub fn u32_to_le_bytes(value: u32, dst: &mut [u8], offset: usize) {
    LittleEndian::write_u32(&mut dst[offset..offset + 4], value);
}

/// Write `value` into `dst` at `offset` in little-endian byte order
#[inline(always)]
pub fn u64_to_le_bytes(value: u64, dst: &mut [u8], offset: usize) {
    LittleEndian::write_u64(&mut dst[offset..offset + 8], value);
}

/// Write `value` into `dst` at `offset` in big-endian byte order
#[inline(always)]
pub fn u32_to_be_bytes(value: u32, dst: &mut [u8], offset: usize) {
    BigEndian::write_u32(&mut dst[offset..offset + 4], value);
}

/// Write `value` into `dst` at `offset` in big-endian byte order
#[inline(always)]
pub fn u64_to_be_bytes(value: u64, dst: &mut [u8], offset: usize) {
    BigEndian::write_u64(&mut dst[offset..offset + 8], value);
}

/// Convert a byte block to u32 words, little-endian
///
/// Fills `dst` from `src[offset..]`; `src` must hold `dst.len() * 4`
/// bytes past the offset.
#[inline]
pub fn le_block_to_u32_words(src: &[u8], offset: usize, dst: &mut [u32]) {
    LittleEndian::read_u32_into(&src[offset..offset + dst.len() * 4], dst);
}

/// Convert a byte block to u64 words, little-endian
#[inline]
pub fn le_block_to_u64_words(src: &[u8], offset: usize, dst: &mut [u64]) {
    LittleEndian::read_u64_into(&src[offset..offset + dst.len() * 8], dst);
}

/// Convert u32 words to a byte block, little-endian
#[inline]
pub fn u32_words_to_le_block(src: &[u32], dst: &mut [u8], offset: usize) {
    LittleEndian::write_u32_into(src, &mut dst[offset..offset + src.len() * 4]);
}

/// Convert u64 words to a byte block, little-endian
#[inline]
pub fn u64_words_to_le_block(src: &[u64], dst: &mut [u8], offset: usize) {
    LittleEndian::write_u64_into(src, &mut dst[offset..offset + src.len() * 8]);
}

/// Convert a byte block to u32 words, big-endian (SHA-2 message schedule)
#[inline]
pub fn be_block_to_u32_words(src: &[u8], offset: usize, dst: &mut [u32]) {
    BigEndian::read_u32_into(&src[offset..offset + dst.len() * 4], dst);
}

/// Convert a byte block to u64 words, big-endian
#[inline]
pub fn be_block_to_u64_words(src: &[u8], offset: usize, dst: &mut [u64]) {
    BigEndian::read_u64_into(&src[offset..offset + dst.len() * 8], dst);
}

/// Convert u32 words to a byte block, big-endian
#[inline]
pub fn u32_words_to_be_block(src: &[u32], dst: &mut [u8], offset: usize) {
    BigEndian::write_u32_into(src, &mut dst[offset..offset + src.len() * 4]);
}

/// Convert u64 words to a byte block, big-endian
#[inline]
pub fn u64_words_to_be_block(src: &[u64], dst: &mut [u8], offset: usize) {
    BigEndian::write_u64_into(src, &mut dst[offset..offset + src.len() * 8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let mut buf = [0u8; 12];
        u32_to_le_bytes(0x0403_0201, &mut buf, 0);
        assert_eq!(&buf[..4], &[1, 2, 3, 4]);
        assert_eq!(le_bytes_to_u32(&buf, 0), 0x0403_0201);

        u64_to_be_bytes(0x0102_0304_0506_0708, &mut buf, 4);
        assert_eq!(&buf[4..12], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(be_bytes_to_u64(&buf, 4), 0x0102_0304_0506_0708);
    }

    #[test]
    fn test_block_round_trip() {
        let words = [0x1111_2222_3333_4444u64, 0xaaaa_bbbb_cccc_dddd];
        let mut bytes = [0u8; 16];
        u64_words_to_le_block(&words, &mut bytes, 0);

        let mut back = [0u64; 2];
        le_block_to_u64_words(&bytes, 0, &mut back);
        assert_eq!(back, words);
    }

    #[test]
    fn test_endian_disagreement() {
        let bytes = [0x01u8, 0x02, 0x03, 0x04];
        assert_eq!(le_bytes_to_u32(&bytes, 0), 0x0403_0201);
        assert_eq!(be_bytes_to_u32(&bytes, 0), 0x0102_0304);
    }
}
