//! One complete pipeline run: groups, statistics and provenance.

use std::io::Read;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::boss::{build_groups, compute_stats};
use crate::models::{BossGroup, BossStats};
use crate::rrf::{DataPaths, LabelIndex, RrfReader};
use crate::BossResult;

/// The immutable result of one run.
///
/// Either every stage completed or no snapshot exists; readers can share it
/// freely once built.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub groups: Vec<BossGroup>,
    pub stats: BossStats,
    /// RFC 3339 build time
    pub generated_at: String,
    /// SHA-256 of the canonical groups and statistics JSON
    pub fingerprint: String,
}

impl Snapshot {
    /// Run the pipeline over the release files in `paths`.
    ///
    /// Both files are opened before any work starts, so a missing input fails
    /// fast.
    pub fn load(paths: &DataPaths) -> BossResult<Self> {
        let mut rxnconso = RrfReader::open(&paths.rxnconso)?;
        let mut rxnsat = RrfReader::open(&paths.rxnsat)?;

        let labels = LabelIndex::build(&mut rxnconso)?;
        let groups = build_groups(&mut rxnsat, &labels)?;
        Self::from_groups(groups)
    }

    /// Run the pipeline over in-memory or streamed RRF content.
    pub fn from_readers<C: Read, S: Read>(rxnconso: C, rxnsat: S) -> BossResult<Self> {
        let labels = LabelIndex::from_reader(rxnconso)?;
        let mut rxnsat = RrfReader::from_reader(rxnsat, "RXNSAT");
        let groups = build_groups(&mut rxnsat, &labels)?;
        Self::from_groups(groups)
    }

    /// Derive statistics and provenance for finished groups.
    pub fn from_groups(groups: Vec<BossGroup>) -> BossResult<Self> {
        let stats = compute_stats(&groups);
        let fingerprint = fingerprint(&groups, &stats)?;
        log::info!(
            "Snapshot ready: {} groups, fingerprint {}",
            groups.len(),
            &fingerprint[..12]
        );

        Ok(Self {
            groups,
            stats,
            generated_at: chrono::Utc::now().to_rfc3339(),
            fingerprint,
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Hash the canonical JSON of `groups` followed by `stats`.
pub fn fingerprint(groups: &[BossGroup], stats: &BossStats) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(groups)?);
    hasher.update(b"\n");
    hasher.update(serde_json::to_vec(stats)?);
    Ok(hex::encode(hasher.finalize()))
}
