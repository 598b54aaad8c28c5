//! Fallback feature extraction for unrecognized file kinds.

use std::fs::{self, Metadata};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::features::FileFeatures;
use crate::{short_hash, UniversalError};

/// Reduce an arbitrary file to its feature record: a content hash over the
/// raw bytes plus filesystem timestamps. The file kind is the uppercased
/// extension.
pub fn generic_features(path: &Path) -> Result<FileFeatures, UniversalError> {
    let meta = fs::metadata(path)?;
    let bytes = fs::read(path)?;
    let content_hash = short_hash(&bytes);

    let file_kind = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default();

    let (creation_time, modification_time) = file_times(&meta);

    let mut features = FileFeatures::bare(file_kind, meta.len(), content_hash);
    features.creation_time = creation_time;
    features.modification_time = modification_time;
    Ok(features)
}

/// Filesystem timestamps as seconds since the epoch. Platforms without a
/// creation time simply leave it empty.
pub(crate) fn file_times(meta: &Metadata) -> (Option<f64>, Option<f64>) {
    let to_epoch = |time: SystemTime| {
        time.duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs_f64())
    };
    let creation = meta.created().ok().and_then(to_epoch);
    let modification = meta.modified().ok().and_then(to_epoch);
    (creation, modification)
}
