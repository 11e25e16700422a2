//! Self-contained HTML viewer with the snapshot embedded as inline JSON.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use super::{ExportError, ExportResult};
use crate::snapshot::Snapshot;

const TEMPLATE: &str = include_str!("../../templates/boss_report.html");

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([A-Z]+(?:_[A-Z]+)*)__").expect("valid placeholder regex"));

/// Escape serialized JSON for embedding inside a `<script>` element.
///
/// The output is still valid JavaScript that evaluates to the same value.
pub fn escape_script_json(json: &str) -> String {
    json.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace("<!--", "<\\!--")
        .replace("-->", "--\\>")
        .replace("</", "<\\/")
}

/// Provenance shown in the report footer.
#[derive(Debug, Serialize)]
struct ReportMeta<'a> {
    generated_at: &'a str,
    fingerprint: &'a str,
    total_groups: usize,
}

/// Renders a snapshot as a single HTML file.
pub struct HtmlReport<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> HtmlReport<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Render the full document.
    ///
    /// Placeholders are substituted in one pass, so embedded data is never
    /// scanned for further placeholders.
    pub fn render(&self) -> ExportResult<String> {
        let meta = ReportMeta {
            generated_at: &self.snapshot.generated_at,
            fingerprint: &self.snapshot.fingerprint,
            total_groups: self.snapshot.len(),
        };
        let data = escape_script_json(&serde_json::to_string(&self.snapshot.groups)?);
        let stats = escape_script_json(&serde_json::to_string(&self.snapshot.stats)?);
        let meta = escape_script_json(&serde_json::to_string(&meta)?);

        let html = PLACEHOLDER.replace_all(TEMPLATE, |caps: &Captures| match &caps[1] {
            "DATA" => data.clone(),
            "STATS" => stats.clone(),
            "META" => meta.clone(),
            _ => caps[0].to_string(),
        });
        Ok(html.into_owned())
    }

    /// Write the report to `path`, replacing any previous file atomically.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> ExportResult<()> {
        let path = path.as_ref();
        let html = self.render()?;
        let tmp = temp_path(path);
        let io_err = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };

        fs::write(&tmp, html.as_bytes()).map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(source));
        }

        log::info!("Wrote report to {} ({} bytes)", path.display(), html.len());
        Ok(())
    }
}

/// Sibling temporary path, so the final rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
