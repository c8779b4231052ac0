//! Hash function implementations
//!
//! Only what the MAC layer needs lives here: the SHA-2 pair behind
//! HMAC. The Keccak-based primitives live in [`crate::xof`], where the
//! sponge interface fits them better.

pub mod sha2;

/// A fixed-output hash function with a streaming interface
///
/// Infallible by design; digest state has no failure modes. Consumed by
/// the generic HMAC construction.
pub trait Digest: Clone {
    /// Compression block size in bytes
    const BLOCK_SIZE: usize;
    /// Digest size in bytes
    const OUTPUT_SIZE: usize;
    /// Algorithm name
    const NAME: &'static str;

    /// Fresh hasher
    fn new() -> Self;

    /// Absorb `data`
    fn update(&mut self, data: &[u8]);

    /// Write the digest into `out` and consume the hasher
    ///
    /// `out` must be exactly `OUTPUT_SIZE` bytes.
    fn finalize_into(self, out: &mut [u8]);
}
