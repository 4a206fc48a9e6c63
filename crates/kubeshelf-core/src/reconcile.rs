use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::cluster_control::ClusterControl;
use crate::error::StoreResult;
use crate::fsutil;
use crate::registry::ContextRegistry;
use crate::shelf::Shelf;

/// Registry contents before a rebuild, used once as the baseline for
/// classifying files and then dropped.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    files: HashSet<PathBuf>,
    contexts: HashSet<String>,
    captured_at: Option<SystemTime>,
}

impl Snapshot {
    /// Captures `registry`; the capture time is when the registry file was
    /// last written.
    pub fn capture(registry: &ContextRegistry) -> Self {
        Self {
            files: registry.records().iter().map(|r| r.credential_file.clone()).collect(),
            contexts: registry.records().iter().map(|r| r.context_name.clone()).collect(),
            captured_at: fsutil::modified_time(registry.path()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Baseline {
    Snapshot(Snapshot),
    /// A previous rebuild never finished; nothing can be trusted.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewReason {
    UnknownFile,
    NewContexts(Vec<String>),
    ModifiedSinceSnapshot,
    NoBaseline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    New(NewReason),
    Known,
}

#[derive(Debug, Clone)]
pub struct FileScan {
    pub path: PathBuf,
    pub contexts: Vec<String>,
    pub status: FileStatus,
}

impl FileScan {
    pub fn is_new(&self) -> bool {
        matches!(self.status, FileStatus::New(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub files: Vec<FileScan>,
    pub baseline_unknown: bool,
}

impl ReconcileReport {
    pub fn new_files(&self) -> impl Iterator<Item = &FileScan> {
        self.files.iter().filter(|f| f.is_new())
    }
}

/// First matching rule wins: unseen file, unseen context, modified after
/// the snapshot, otherwise known.
pub fn classify(baseline: &Baseline, path: &Path, contexts: &[String], modified: Option<SystemTime>) -> FileStatus {
    let snapshot = match baseline {
        Baseline::Unknown => return FileStatus::New(NewReason::NoBaseline),
        Baseline::Snapshot(s) => s,
    };

    if !snapshot.files.contains(path) {
        return FileStatus::New(NewReason::UnknownFile);
    }

    let unseen: Vec<String> = contexts.iter().filter(|c| !snapshot.contexts.contains(*c)).cloned().collect();
    if !unseen.is_empty() {
        return FileStatus::New(NewReason::NewContexts(unseen));
    }

    if let (Some(modified), Some(captured)) = (modified, snapshot.captured_at) {
        if modified > captured {
            return FileStatus::New(NewReason::ModifiedSinceSnapshot);
        }
    }

    FileStatus::Known
}

/// Rebuilds the registry from a full scan of the credential directory.
pub struct Reconciler<'a> {
    control: &'a dyn ClusterControl,
}

impl<'a> Reconciler<'a> {
    pub fn new(control: &'a dyn ClusterControl) -> Self {
        Self { control }
    }

    /// Replaces `shelf.registry` with mappings from every credential file and
    /// reports which files are new relative to the registry as it was.
    ///
    /// A marker file is held for the duration of the pass. Finding one at the
    /// start means an earlier pass was interrupted, and every file is then
    /// reported as new.
    pub async fn rebuild(&self, shelf: &mut Shelf) -> StoreResult<ReconcileReport> {
        let marker = shelf.rebuild_marker();
        let baseline = if marker.exists() {
            tracing::warn!("Previous registry rebuild did not finish; treating every file as new");
            Baseline::Unknown
        } else {
            Baseline::Snapshot(Snapshot::capture(&shelf.registry))
        };
        fsutil::write_atomic(&marker, format!("started {}\n", jiff::Timestamp::now()).as_bytes())?;

        let mut report = ReconcileReport { files: Vec::new(), baseline_unknown: matches!(baseline, Baseline::Unknown) };
        let mut fresh = ContextRegistry::empty(shelf.registry.path());

        for path in shelf.credentials.files()? {
            let contexts = match self.control.list_contexts(&path).await {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!("Could not list contexts in {}: {e}", path.display());
                    Vec::new()
                }
            };
            let status = classify(&baseline, &path, &contexts, shelf.credentials.modified(&path));
            tracing::debug!("{}: {} context(s), {status:?}", path.display(), contexts.len());

            fresh.insert_mappings(&path, &contexts);
            report.files.push(FileScan { path, contexts, status });
        }

        fresh.normalize();
        fresh.save()?;
        shelf.registry = fresh;

        fsutil::remove_if_exists(&marker)?;
        tracing::info!(
            "Rebuilt registry: {} file(s), {} context(s), {} new file(s)",
            report.files.len(),
            shelf.registry.len(),
            report.new_files().count()
        );
        Ok(report)
    }
}
