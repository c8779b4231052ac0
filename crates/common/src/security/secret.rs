//! Secret data containers with guaranteed zeroization

use core::fmt;
use core::ops::{Deref, DerefMut};

use kestrel_internal::constant_time::ct_eq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An owning byte container that wipes its storage on drop
///
/// This is the single owning home for secret octets in the workspace:
/// keys, derived MAC keys, expanded schedules. It provides:
///
/// - zero-initialized allocation and wipe-on-drop via volatile writes
/// - constant-time equality
/// - explicit cloning; moves transfer ownership without copying
/// - a `Debug` impl that never prints the contents
///
/// Borrow `as_slice`/`as_mut_slice` for views; the borrow checker keeps
/// any view from outliving the buffer.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureBuffer {
    data: Vec<u8>,
}

impl SecureBuffer {
    /// Allocate `len` zero bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: vec![0u8; len],
        }
    }

    /// Create an empty buffer
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    /// Copy `slice` into a new buffer
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            data: slice.to_vec(),
        }
    }

    /// Take ownership of `data` without copying
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the contents
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrow the contents
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite the contents from `src`
    ///
    /// Panics if `src.len() != self.len()`; resizing a secret buffer is
    /// never implicit.
    pub fn fill_from(&mut self, src: &[u8]) {
        assert_eq!(
            self.data.len(),
            src.len(),
            "SecureBuffer::fill_from length mismatch"
        );
        self.data.copy_from_slice(src);
    }

    /// Wipe the contents now, keeping the allocation and length
    pub fn wipe(&mut self) {
        self.data.as_mut_slice().zeroize();
    }

    /// Constant-time equality; unequal lengths compare unequal
    pub fn ct_eq(&self, other: &Self) -> bool {
        ct_eq(&self.data, &other.data)
    }
}

impl AsRef<[u8]> for SecureBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for SecureBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl From<Vec<u8>> for SecureBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBuffer(len={}, [REDACTED])", self.data.len())
    }
}

/// A secret that is automatically zeroized when it leaves scope
///
/// Wraps any `Zeroize` type; useful for intermediate values inside the
/// kernels (expanded subkey arrays, working states) that never escape a
/// function.
pub struct EphemeralSecret<T: Zeroize> {
    inner: T,
}

impl<T: Zeroize> EphemeralSecret<T> {
    /// Wrap `value`
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }
}

impl<T: Zeroize> AsRef<T> for EphemeralSecret<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

impl<T: Zeroize> AsMut<T> for EphemeralSecret<T> {
    fn as_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Zeroize> Deref for EphemeralSecret<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Zeroize> DerefMut for EphemeralSecret<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Zeroize> Drop for EphemeralSecret<T> {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl<T: Zeroize + fmt::Debug> fmt::Debug for EphemeralSecret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EphemeralSecret([REDACTED])")
    }
}

/// Guard that zeroizes a borrowed value when dropped
///
/// Ensures cleanup on early returns and panics alike.
pub struct ZeroizeGuard<'a, T: Zeroize> {
    value: &'a mut T,
}

impl<'a, T: Zeroize> ZeroizeGuard<'a, T> {
    /// Guard `value`
    pub fn new(value: &'a mut T) -> Self {
        Self { value }
    }
}

impl<T: Zeroize> Drop for ZeroizeGuard<'_, T> {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl<T: Zeroize> Deref for ZeroizeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value
    }
}

impl<T: Zeroize> DerefMut for ZeroizeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value
    }
}
