//! Forward-only permutation kernels
//!
//! Each family exposes a stateless `permute` over (expanded key, tweak,
//! counter block). The stream engine only ever runs the forward
//! direction; none of these kernels carries an inverse.
//!
//! Every kernel is generic over a lane bundle, so the scalar and the
//! four- and eight-block wide forms are the same code instantiated at
//! different lane widths.

pub mod chacha;
pub mod rijndael;
pub mod serpent;
pub mod threefish;
