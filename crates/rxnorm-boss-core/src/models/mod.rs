//! Domain models for the RxNorm BoSS pipeline.

mod concept;
mod group;
mod stats;

pub use concept::*;
pub use group::*;
pub use stats::*;
