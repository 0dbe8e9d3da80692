//! Small encoding helpers shared by the storage layer.

pub mod varint;
