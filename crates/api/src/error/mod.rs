//! Error handling for cryptographic operations
//!
//! Failures across the workspace collapse into one flat sum type. Every
//! variant carries a `&'static str` context naming the operation or
//! primitive that rejected the call; length variants carry the expected
//! and observed sizes so callers can log something actionable without the
//! library allocating.

use core::fmt;

pub mod validate;

/// The error type for all kestrel operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument had the wrong shape (range, alignment, degree)
    InvalidParam {
        /// Operation or primitive that rejected the argument
        context: &'static str,
        /// Why the argument was rejected
        reason: &'static str,
    },

    /// Key length is not in the advertised set
    InvalidKey {
        /// Cipher or MAC that rejected the key
        context: &'static str,
        /// Length supplied by the caller
        actual: usize,
    },

    /// Nonce length is not in the advertised set
    InvalidNonce {
        /// Cipher that rejected the nonce
        context: &'static str,
        /// Length supplied by the caller
        actual: usize,
    },

    /// Info/tweak length is unsupported
    InvalidInfo {
        /// Cipher that rejected the info string
        context: &'static str,
        /// Length supplied by the caller
        actual: usize,
    },

    /// An output or input buffer is the wrong size
    InvalidSize {
        /// Operation that needed the space
        context: &'static str,
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Operation requires a prior `initialize`
    NotInitialized {
        /// Operation that was attempted
        context: &'static str,
    },

    /// Call violates the instance's state machine
    IllegalOperation {
        /// Operation that was attempted
        context: &'static str,
        /// Which ordering rule was broken
        reason: &'static str,
    },

    /// Authentication tag mismatch
    AuthenticationFailure {
        /// Cipher or MAC whose tag failed to verify
        context: &'static str,
    },

    /// The underlying entropy provider refused the request
    NoAccess {
        /// Provider-facing operation that failed
        context: &'static str,
    },
}

/// Result type for all kestrel operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Replace the context, keeping the structural payload
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::InvalidParam { reason, .. } => Self::InvalidParam { context, reason },
            Self::InvalidKey { actual, .. } => Self::InvalidKey { context, actual },
            Self::InvalidNonce { actual, .. } => Self::InvalidNonce { context, actual },
            Self::InvalidInfo { actual, .. } => Self::InvalidInfo { context, actual },
            Self::InvalidSize {
                expected, actual, ..
            } => Self::InvalidSize {
                context,
                expected,
                actual,
            },
            Self::NotInitialized { .. } => Self::NotInitialized { context },
            Self::IllegalOperation { reason, .. } => Self::IllegalOperation { context, reason },
            Self::AuthenticationFailure { .. } => Self::AuthenticationFailure { context },
            Self::NoAccess { .. } => Self::NoAccess { context },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParam { context, reason } => {
                write!(f, "{}: invalid parameter: {}", context, reason)
            }
            Self::InvalidKey { context, actual } => {
                write!(f, "{}: key length {} is not supported", context, actual)
            }
            Self::InvalidNonce { context, actual } => {
                write!(f, "{}: nonce length {} is not supported", context, actual)
            }
            Self::InvalidInfo { context, actual } => {
                write!(f, "{}: info length {} is not supported", context, actual)
            }
            Self::InvalidSize {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{}: buffer too small (need {}, have {})",
                    context, expected, actual
                )
            }
            Self::NotInitialized { context } => {
                write!(f, "{}: instance has not been initialized", context)
            }
            Self::IllegalOperation { context, reason } => {
                write!(f, "{}: illegal operation: {}", context, reason)
            }
            Self::AuthenticationFailure { context } => {
                write!(f, "{}: authentication failure", context)
            }
            Self::NoAccess { context } => {
                write!(f, "{}: entropy provider refused access", context)
            }
        }
    }
}

impl std::error::Error for Error {}
