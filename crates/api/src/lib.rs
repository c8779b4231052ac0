//! Public API traits and types for the kestrel workspace
//!
//! This crate defines the surface shared by every algorithm crate: the
//! error sum type, the capability traits ([`MacEngine`], [`Xof`],
//! [`StreamCipher`]), and the owning key containers with their minimal
//! wire format.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{validate, Error, Result};
pub use traits::{MacEngine, StreamCipher, Xof};
pub use types::{
    AsymmetricKey, AsymmetricPrimitive, KeyClass, ParameterId, SymmetricKey, SymmetricKeySize,
};
