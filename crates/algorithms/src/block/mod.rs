//! Block-cipher primitives
//!
//! The stream core is permutation-based, but GMAC needs a 128-bit block
//! cipher for its subkey and J0 encryption, so the AES-128 forward
//! transform lives here. The GF(2^8) helpers are shared with the
//! wide-block Rijndael keystream kernel.

pub mod aes;
