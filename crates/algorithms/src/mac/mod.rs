//! Message-authentication-code generators
//!
//! Four families sit behind the stream engine's authenticator slot:
//! HMAC over SHA-2, KMAC over cSHAKE, GMAC over GHASH/AES, and
//! Poly1305. Each implements [`kestrel_api::MacEngine`]: keyed
//! construction, streaming absorb, a finalize that returns the generator
//! to the unkeyed state, and a `rekey` for the tag re-keying cycle.
//!
//! State-machine misuse (update before keying, finalize twice) returns
//! an error and never corrupts the accumulator.

pub mod gmac;
pub mod hmac;
pub mod kmac;
pub mod poly1305;
