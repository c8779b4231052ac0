//! Capability traits implemented by the algorithm crates
//!
//! The inheritance lattice of a classic OO crypto library is replaced by
//! three small capabilities. Keystream generation is always statically
//! dispatched (an enum of concrete variants); only the MAC slot is
//! designed to be usable behind a trait object.

use crate::error::Result;
use crate::types::{SymmetricKey, SymmetricKeySize};

/// A streaming message-authentication-code generator
///
/// Lifecycle: construct keyed, `update` any number of times, then
/// `finalize_into`, which writes the tag and returns the generator to the
/// unkeyed state. `rekey` arms it again; calls out of order fail without
/// corrupting state.
pub trait MacEngine {
    /// Absorb `data` into the running MAC
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Write the tag into `tag` and return to the unkeyed state
    ///
    /// `tag` must be exactly `tag_size()` bytes.
    fn finalize_into(&mut self, tag: &mut [u8]) -> Result<()>;

    /// Re-arm the generator with a fresh key
    fn rekey(&mut self, key: &[u8]) -> Result<()>;

    /// Tag length in bytes
    fn tag_size(&self) -> usize;

    /// Accepted key geometries
    fn legal_key_sizes(&self) -> &'static [SymmetricKeySize];

    /// Generator name, e.g. `"KMAC512"`
    fn name(&self) -> &'static str;

    /// True between `rekey` and `finalize_into`
    fn is_initialized(&self) -> bool;
}

/// An extendable-output function with an absorb/squeeze interface
///
/// `absorb` may be called repeatedly before the first `squeeze`; once
/// squeezing begins the input is sealed. Output is deterministic in the
/// absorbed input, and any split of squeeze calls concatenates to the
/// same stream.
pub trait Xof {
    /// Absorb input into the sponge
    fn absorb(&mut self, data: &[u8]) -> Result<()>;

    /// Produce the next `out.len()` bytes of output
    fn squeeze(&mut self, out: &mut [u8]) -> Result<()>;

    /// Return to the freshly constructed state
    fn reset(&mut self);
}

/// The authenticated stream-cipher surface
///
/// One instance represents one (variant, authenticator) choice and owns
/// all of its mutable state; it is not meant to be shared between
/// callers. Keystream generation inside a single `transform` call may be
/// parallel, but the observable byte stream is identical at every degree.
pub trait StreamCipher {
    /// Validate the key container, expand keys, and arm the instance
    ///
    /// `encryption` selects the transform direction. In authenticated
    /// mode this derives the cipher key and the MAC key through the
    /// domain-separated expansion and opens the first MAC cycle.
    fn initialize(&mut self, encryption: bool, key: &SymmetricKey) -> Result<()>;

    /// Authenticate additional data for the current cycle
    ///
    /// Permitted once per cycle, after `initialize` and before the first
    /// `transform` of the cycle.
    fn set_associated_data(&mut self, data: &[u8]) -> Result<()>;

    /// XOR the keystream over `input` into `output`
    ///
    /// In authenticated mode the ciphertext side of the call is absorbed
    /// into the MAC as it streams. `output` must be at least as long as
    /// `input`.
    fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<()>;

    /// Close the MAC cycle and emit the tag (encryption direction)
    ///
    /// Writes `tag_size()` bytes, advances the MAC counter by the bytes
    /// processed this cycle, and re-derives the MAC key for the next
    /// cycle.
    fn finalize(&mut self, tag: &mut [u8]) -> Result<()>;

    /// Close the MAC cycle and check `tag` (decryption direction)
    ///
    /// Returns `Ok(false)` on mismatch, after which the instance refuses
    /// to yield further plaintext until re-initialized. The comparison is
    /// constant-time.
    fn verify(&mut self, tag: &[u8]) -> Result<bool>;

    /// Zeroize counter, tag, and MAC accumulator, keeping the expanded key
    fn reset(&mut self);

    /// Tag length in bytes; zero when unauthenticated
    fn tag_size(&self) -> usize;

    /// Accepted key geometries
    fn legal_key_sizes(&self) -> &'static [SymmetricKeySize];

    /// Instance name, e.g. `"TSX512-KMAC512"`
    fn name(&self) -> String;

    /// True once `initialize` has succeeded
    fn is_initialized(&self) -> bool;
}
