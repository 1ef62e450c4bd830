use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::shared::frame::Frame;

/// Domain interface for persisting evidence snapshots.
///
/// `name` is the artifact stem; the implementation appends its own
/// extension and decides where the file lives.
pub trait SnapshotWriter: Send {
    fn save(&self, frame: &Frame, name: &str) -> Result<PathBuf, Box<dyn std::error::Error>>;
}

/// Artifact stem for a capture at the given wall-clock time, e.g.
/// `person-detected-2026-08-26T14-25-01-123Z`.
///
/// UTC with millisecond precision; `:` and `.` are replaced with `-` so the
/// name is safe on every filesystem, and lexical order matches capture
/// order.
pub fn snapshot_name(label: &str, at: SystemTime) -> String {
    let utc: DateTime<Utc> = at.into();
    let iso = utc.to_rfc3339_opts(SecondsFormat::Millis, true);
    let stamp = iso.replace([':', '.'], "-");
    format!("{label}-detected-{stamp}")
}
