//! Secure memory handling
//!
//! Types and utilities that keep key material out of reach: the owning
//! [`SecureBuffer`] container, guard types for stack temporaries, and
//! compiler-fence barriers.

mod memory;
mod secret;

pub use memory::barrier;
pub use secret::{EphemeralSecret, SecureBuffer, ZeroizeGuard};
