use crate::index::Snapshot;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Bumped whenever the snapshot encoding changes shape.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub version: u32,
    pub num_docs: usize,
    pub num_terms: usize,
    pub created_at: String,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn snapshot(&self) -> PathBuf { self.root.join("snapshot.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Write a snapshot and its meta sidecar to `paths.root`. Both files go to
/// a temporary name first and are renamed into place; a concurrent reader
/// sees either the previous snapshot or the new one, never a torn write.
pub fn save_snapshot(paths: &IndexPaths, snapshot: &Snapshot) -> Result<SnapshotMeta> {
    fs::create_dir_all(&paths.root)
        .with_context(|| format!("creating index directory {}", paths.root.display()))?;

    let meta = SnapshotMeta {
        version: SNAPSHOT_VERSION,
        num_docs: snapshot.documents.len(),
        num_terms: snapshot.index.num_terms(),
        created_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::new()),
    };

    let snapshot_path = paths.snapshot();
    let snapshot_tmp = snapshot_path.with_extension("bin.tmp");
    let encoded = bincode::serialize(snapshot).context("encoding snapshot")?;
    fs::write(&snapshot_tmp, encoded)
        .with_context(|| format!("writing {}", snapshot_tmp.display()))?;

    let meta_path = paths.meta();
    let meta_tmp = meta_path.with_extension("json.tmp");
    let meta_json = serde_json::to_string_pretty(&meta).context("encoding snapshot meta")?;
    fs::write(&meta_tmp, meta_json).with_context(|| format!("writing {}", meta_tmp.display()))?;

    fs::rename(&snapshot_tmp, &snapshot_path)
        .with_context(|| format!("publishing {}", snapshot_path.display()))?;
    fs::rename(&meta_tmp, &meta_path)
        .with_context(|| format!("publishing {}", meta_path.display()))?;
    Ok(meta)
}

/// Load a snapshot pair, refusing another version, a snapshot that fails
/// its own invariants, or one that disagrees with the meta counts.
pub fn load_snapshot(paths: &IndexPaths) -> Result<(Snapshot, SnapshotMeta)> {
    let meta_path = paths.meta();
    let meta_json = fs::read_to_string(&meta_path)
        .with_context(|| format!("reading {}", meta_path.display()))?;
    let meta: SnapshotMeta = serde_json::from_str(&meta_json)
        .with_context(|| format!("decoding {}", meta_path.display()))?;
    if meta.version != SNAPSHOT_VERSION {
        bail!(
            "snapshot version {} is not supported (expected {SNAPSHOT_VERSION})",
            meta.version
        );
    }

    let snapshot_path = paths.snapshot();
    let bytes = fs::read(&snapshot_path)
        .with_context(|| format!("reading {}", snapshot_path.display()))?;
    let snapshot: Snapshot = bincode::deserialize(&bytes)
        .with_context(|| format!("decoding {}", snapshot_path.display()))?;

    snapshot.validate().context("validating loaded snapshot")?;
    if snapshot.documents.len() != meta.num_docs {
        bail!(
            "snapshot has {} documents but meta records {}",
            snapshot.documents.len(),
            meta.num_docs
        );
    }
    if snapshot.index.num_terms() != meta.num_terms {
        bail!(
            "snapshot has {} terms but meta records {}",
            snapshot.index.num_terms(),
            meta.num_terms
        );
    }
    Ok((snapshot, meta))
}

pub fn snapshot_exists(paths: &IndexPaths) -> bool {
    paths.snapshot().is_file() && paths.meta().is_file()
}
