//! Small shared helpers

pub mod hash;

pub use hash::fingerprint;
