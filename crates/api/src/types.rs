//! Key containers and the minimal key-blob wire format

use core::fmt;

use kestrel_common::SecureBuffer;
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// A supported (key, nonce, info) length triple, in bytes
///
/// A cipher or MAC publishes a set of these as its acceptance grammar;
/// `initialize` checks the caller's container against the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetricKeySize {
    /// Key length in bytes
    pub key_size: usize,
    /// Nonce length in bytes
    pub nonce_size: usize,
    /// Maximum info length in bytes
    pub info_size: usize,
}

impl SymmetricKeySize {
    /// Construct a size triple
    pub const fn new(key_size: usize, nonce_size: usize, info_size: usize) -> Self {
        Self {
            key_size,
            nonce_size,
            info_size,
        }
    }

    /// True when `key_len` and `nonce_len` match this triple exactly
    pub fn matches(&self, key_len: usize, nonce_len: usize) -> bool {
        self.key_size == key_len && self.nonce_size == nonce_len
    }
}

/// An owning symmetric key container
///
/// Holds key, nonce, and optional info material, each in its own
/// [`SecureBuffer`]; all three are wiped on drop. Moves transfer
/// ownership; duplication requires an explicit `clone`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: SecureBuffer,
    nonce: SecureBuffer,
    info: SecureBuffer,
}

impl SymmetricKey {
    /// Build a container from key material alone
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: SecureBuffer::from_slice(key),
            nonce: SecureBuffer::empty(),
            info: SecureBuffer::empty(),
        }
    }

    /// Build a container from key and nonce
    pub fn with_nonce(key: &[u8], nonce: &[u8]) -> Self {
        Self {
            key: SecureBuffer::from_slice(key),
            nonce: SecureBuffer::from_slice(nonce),
            info: SecureBuffer::empty(),
        }
    }

    /// Build a container from key, nonce, and info
    pub fn with_info(key: &[u8], nonce: &[u8], info: &[u8]) -> Self {
        Self {
            key: SecureBuffer::from_slice(key),
            nonce: SecureBuffer::from_slice(nonce),
            info: SecureBuffer::from_slice(info),
        }
    }

    /// Fill key and nonce for `size` from a cryptographic RNG
    ///
    /// Entropy refusal surfaces as [`Error::NoAccess`].
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, size: SymmetricKeySize) -> Result<Self> {
        let mut key = SecureBuffer::zeroed(size.key_size);
        let mut nonce = SecureBuffer::zeroed(size.nonce_size);

        rng.try_fill_bytes(key.as_mut_slice()).map_err(|_| Error::NoAccess {
            context: "SymmetricKey::random",
        })?;
        rng.try_fill_bytes(nonce.as_mut_slice()).map_err(|_| Error::NoAccess {
            context: "SymmetricKey::random",
        })?;

        Ok(Self {
            key,
            nonce,
            info: SecureBuffer::empty(),
        })
    }

    /// Borrow the key bytes
    pub fn key(&self) -> &[u8] {
        self.key.as_slice()
    }

    /// Borrow the nonce bytes
    pub fn nonce(&self) -> &[u8] {
        self.nonce.as_slice()
    }

    /// Borrow the info bytes
    pub fn info(&self) -> &[u8] {
        self.info.as_slice()
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SymmetricKey(key={}, nonce={}, info={}, [REDACTED])",
            self.key.len(),
            self.nonce.len(),
            self.info.len()
        )
    }
}

/// Visibility class of a serialized key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyClass {
    /// Symmetric envelope (neither half of a pair)
    Symmetric = 0,
    /// Public half of an asymmetric pair
    Public = 1,
    /// Private half of an asymmetric pair
    Private = 2,
}

impl KeyClass {
    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Self::Symmetric),
            1 => Ok(Self::Public),
            2 => Ok(Self::Private),
            _ => Err(Error::InvalidParam {
                context: "KeyClass::from_byte",
                reason: "unknown key class tag",
            }),
        }
    }
}

/// Algorithm family of an asymmetric key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AsymmetricPrimitive {
    /// Module-LWE lattice KEM
    Kyber = 1,
    /// NTRU lattice KEM
    Ntru = 2,
    /// Code-based KEM
    McEliece = 3,
    /// Lattice signature scheme
    Dilithium = 4,
    /// Stateless hash-based signature scheme
    SphincsPlus = 5,
    /// Stateful hash-based signature scheme
    Xmss = 6,
}

impl AsymmetricPrimitive {
    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Self::Kyber),
            2 => Ok(Self::Ntru),
            3 => Ok(Self::McEliece),
            4 => Ok(Self::Dilithium),
            5 => Ok(Self::SphincsPlus),
            6 => Ok(Self::Xmss),
            _ => Err(Error::InvalidParam {
                context: "AsymmetricPrimitive::from_byte",
                reason: "unknown primitive tag",
            }),
        }
    }
}

/// Parameter-set tag within a primitive family
///
/// `XmssSha256H10` and `XmssSha256H16` are deliberately distinct tags;
/// conflating the two names is a known defect in older name tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ParameterId {
    /// No parameter distinction
    None = 0,
    /// Kyber-512
    Kyber512 = 1,
    /// Kyber-768
    Kyber768 = 2,
    /// Kyber-1024
    Kyber1024 = 3,
    /// Dilithium-2
    Dilithium2 = 4,
    /// Dilithium-3
    Dilithium3 = 5,
    /// SPHINCS+-SHAKE-128f
    SphincsShake128f = 6,
    /// XMSS-SHA2-256 tree height 10
    XmssSha256H10 = 7,
    /// XMSS-SHA2-256 tree height 16
    XmssSha256H16 = 8,
}

impl ParameterId {
    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Self::None),
            1 => Ok(Self::Kyber512),
            2 => Ok(Self::Kyber768),
            3 => Ok(Self::Kyber1024),
            4 => Ok(Self::Dilithium2),
            5 => Ok(Self::Dilithium3),
            6 => Ok(Self::SphincsShake128f),
            7 => Ok(Self::XmssSha256H10),
            8 => Ok(Self::XmssSha256H16),
            _ => Err(Error::InvalidParam {
                context: "ParameterId::from_byte",
                reason: "unknown parameter tag",
            }),
        }
    }
}

/// An owning asymmetric key container
///
/// The polynomial payload lives in a [`SecureBuffer`]; no interior
/// pointers, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AsymmetricKey {
    poly: SecureBuffer,
    #[zeroize(skip)]
    class: KeyClass,
    #[zeroize(skip)]
    primitive: AsymmetricPrimitive,
    #[zeroize(skip)]
    parameters: ParameterId,
}

impl AsymmetricKey {
    /// Build a container from its parts
    pub fn new(
        poly: &[u8],
        class: KeyClass,
        primitive: AsymmetricPrimitive,
        parameters: ParameterId,
    ) -> Self {
        Self {
            poly: SecureBuffer::from_slice(poly),
            class,
            primitive,
            parameters,
        }
    }

    /// Borrow the polynomial payload
    pub fn poly(&self) -> &[u8] {
        self.poly.as_slice()
    }

    /// Key class
    pub fn class(&self) -> KeyClass {
        self.class
    }

    /// Algorithm family
    pub fn primitive(&self) -> AsymmetricPrimitive {
        self.primitive
    }

    /// Parameter set
    pub fn parameters(&self) -> ParameterId {
        self.parameters
    }

    /// Serialize to the transport layout
    ///
    /// ```text
    /// byte 0  : key class
    /// byte 1  : parameter id
    /// byte 2  : primitive id
    /// byte 3..: payload, to end of blob
    /// ```
    ///
    /// There is no length prefix; the caller frames the blob externally.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + self.poly.len());
        out.push(self.class as u8);
        out.push(self.parameters as u8);
        out.push(self.primitive as u8);
        out.extend_from_slice(self.poly.as_slice());
        out
    }

    /// Deserialize from the transport layout
    pub fn from_bytes(blob: &[u8]) -> Result<Self> {
        if blob.len() < 3 {
            return Err(Error::InvalidSize {
                context: "AsymmetricKey::from_bytes",
                expected: 3,
                actual: blob.len(),
            });
        }

        Ok(Self {
            class: KeyClass::from_byte(blob[0])?,
            parameters: ParameterId::from_byte(blob[1])?,
            primitive: AsymmetricPrimitive::from_byte(blob[2])?,
            poly: SecureBuffer::from_slice(&blob[3..]),
        })
    }
}

impl fmt::Debug for AsymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AsymmetricKey({:?}, {:?}, {:?}, len={}, [REDACTED])",
            self.class,
            self.primitive,
            self.parameters,
            self.poly.len()
        )
    }
}
