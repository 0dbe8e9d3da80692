//! Binary storage primitives used to persist a frozen InfoBase.

pub mod structured;

pub use structured::{StructReader, StructWriter};
