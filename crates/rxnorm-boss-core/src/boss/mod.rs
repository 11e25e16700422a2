//! BoSS grouping pipeline.
//!
//! Pipeline: ATV Parsing → Grouping (label lookup) → Explanation → Statistics

mod atv;
mod explanation;
mod grouping;
mod stats;

pub use atv::*;
pub use explanation::*;
pub use grouping::*;
pub use stats::*;
