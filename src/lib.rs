//! KESTREL: an authenticated stream-cipher suite in pure Rust
//!
//! This is the facade crate; it re-exports the workspace members and
//! provides a prelude for the common path: build a [`CipherStream`],
//! initialize it with a [`SymmetricKey`], transform, finalize or
//! verify.
//!
//! ```
//! use kestrel::prelude::*;
//!
//! let key = SymmetricKey::with_nonce(&[7u8; 64], &[1u8; 16]);
//!
//! let mut cipher = CipherStream::new(
//!     StreamCipherVariant::Tsx512,
//!     Some(StreamAuthenticator::Kmac512),
//! );
//! cipher.initialize(true, &key)?;
//! cipher.set_associated_data(b"header")?;
//! let sealed = cipher.encrypt_to_vec(b"attack at dawn")?;
//!
//! let mut cipher = CipherStream::new(
//!     StreamCipherVariant::Tsx512,
//!     Some(StreamAuthenticator::Kmac512),
//! );
//! cipher.initialize(false, &key)?;
//! cipher.set_associated_data(b"header")?;
//! assert_eq!(cipher.decrypt_to_vec(&sealed)?, b"attack at dawn");
//! # Ok::<(), kestrel::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub use kestrel_algorithms as algorithms;
pub use kestrel_api as api;
pub use kestrel_common as common;
pub use kestrel_internal as internal;

pub use kestrel_api::{Error, Result};

/// The common imports in one place
pub mod prelude {
    pub use kestrel_algorithms::{
        CipherStream, SimdProfile, StreamAuthenticator, StreamCipherVariant,
    };
    pub use kestrel_api::{
        Error, MacEngine, Result, StreamCipher, SymmetricKey, SymmetricKeySize, Xof,
    };
    pub use kestrel_common::SecureBuffer;
}
