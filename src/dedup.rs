//! Projection of a listing onto the downloads that are still missing.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::asset::{AssetId, AssetKind, AssetRecord, PendingDownload};
use crate::download::sanitize_filename;

/// `(id, kind)` pairs already recorded for one source tag.
pub type DedupSet = HashSet<(AssetId, AssetKind)>;

/// Returns the pending downloads for every image variant absent from `existing`.
///
/// A record whose desktop image is recorded still yields its mobile image.
/// Output follows listing order, then variant order within a record. Empty
/// variant URLs are skipped. A record repeated later in the same listing is
/// emitted only once.
#[must_use]
pub fn filter_new(
    records: &[AssetRecord],
    existing: &DedupSet,
    source: &'static str,
    root: &Path,
) -> Vec<PendingDownload> {
    let mut emitted: HashSet<&AssetId> = HashSet::new();
    let mut pending = Vec::new();

    for record in records {
        if !emitted.insert(&record.id) {
            debug!(id = %record.id, "skipping repeated listing entry");
            continue;
        }

        for image in &record.images {
            if image.url.trim().is_empty() {
                debug!(id = %record.id, kind = %image.kind, "no url for variant");
                continue;
            }
            if existing.contains(&(record.id.clone(), image.kind)) {
                continue;
            }
            let dest_dir = match image.subfolder {
                Some(subfolder) => root.join(subfolder),
                None => root.to_path_buf(),
            };
            pending.push(PendingDownload {
                asset_id: record.id.clone(),
                source,
                kind: image.kind,
                url: image.url.clone(),
                file_name: file_stem_for(&image.file_stem, &record.id),
                dest_dir,
            });
        }
    }

    pending
}

/// Sanitizes `stem`, falling back to the asset id when nothing usable is left.
fn file_stem_for(stem: &str, id: &AssetId) -> String {
    let sanitized = sanitize_filename(stem.trim());
    if sanitized.chars().all(|c| c == '.') {
        sanitize_filename(id.as_str())
    } else {
        sanitized
    }
}
