//! RxNorm BoSS Core Library
//!
//! Groups RxNorm Basis of Strength Substance (BoSS) attributes by Parent × SCDC,
//! explains each group in one sentence and summarizes the result.
//!
//! # Architecture
//!
//! ```text
//! RXNCONSO.RRF ──► Label Index ─────────────┐
//!                                           │ (resolve RXCUI → TTY, STR)
//! RXNSAT.RRF ──► ATV Parser ──► Grouping ◄──┘
//!                                  │
//!                         [finalize: explanation]
//!                                  │
//!                            Statistics
//!                                  │
//!                    ┌─────────────▼─────────────┐
//!                    │         Snapshot          │
//!                    │  groups + stats + digest  │
//!                    └─────────────┬─────────────┘
//!                                  │
//!                  ┌───────────────┴───────────────┐
//!                  ▼                               ▼
//!             HTML Report                   Read API (query)
//! ```
//!
//! # Core Principle
//!
//! **A run is all or nothing.** Noisy rows are dropped silently, but an unreadable
//! input file aborts the run before anything is produced.
//!
//! # Modules
//!
//! - [`rrf`]: RRF reader, column layout and label index
//! - [`models`]: Domain types (BossGroup, ResolvedConcept, BossStats, etc.)
//! - [`boss`]: ATV parsing, grouping, explanations and statistics
//! - [`snapshot`]: One complete pipeline run
//! - [`query`]: Filtering and pagination over a snapshot
//! - [`export`]: Self-contained HTML report

pub mod boss;
pub mod export;
pub mod models;
pub mod query;
pub mod rrf;
pub mod snapshot;

// Re-export commonly used types
pub use boss::{compute_stats, explain, parse_boss_from_atv, parse_component_atv, GroupBuilder};
pub use export::HtmlReport;
pub use models::{
    BossAttribute, BossFrom, BossGroup, BossStats, IngredientEntry, IngredientKind, Metric,
    ResolvedConcept,
};
pub use query::{GroupPage, GroupQuery};
pub use rrf::{DataPaths, LabelIndex, RrfReader};
pub use snapshot::Snapshot;

use thiserror::Error;

// =========================================================================
// Pipeline Error Type
// =========================================================================

#[derive(Debug, Error)]
pub enum BossError {
    #[error("Input error: {0}")]
    Input(#[from] rrf::RrfError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type BossResult<T> = Result<T, BossError>;

/// Run the full pipeline over the files in `paths`.
///
/// Returns the grouped rows and their statistics, the same pair the report and
/// the read API are built from.
pub fn load_data(paths: &DataPaths) -> BossResult<(Vec<BossGroup>, BossStats)> {
    let snapshot = Snapshot::load(paths)?;
    Ok((snapshot.groups, snapshot.stats))
}
