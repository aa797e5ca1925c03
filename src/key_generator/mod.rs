//! Key sequences to feed the indexes in tests and benchmarks
mod random;
mod sequential;

pub use random::*;
pub use sequential::*;
