use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::fsutil;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Remembered namespaces per context, one file per sanitized context name.
/// Used when the operator cannot list namespaces live.
#[derive(Debug, Clone)]
pub struct NamespaceCache {
    dir: PathBuf,
}

impl NamespaceCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, context: &str) -> PathBuf {
        self.dir.join(sanitize(context))
    }

    pub fn exists(&self, context: &str) -> bool {
        self.path_for(context).is_file()
    }

    /// Cached namespaces in file order, without comments, blanks or repeats.
    pub fn list(&self, context: &str) -> StoreResult<Vec<String>> {
        let lines = self.read_lines(context)?;
        let mut names: Vec<String> = Vec::new();
        for line in &lines {
            if let Some(name) = entry(line) {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    pub fn add(&self, context: &str, namespace: &str) -> StoreResult<AddOutcome> {
        let namespace = validate(namespace)?;
        let mut lines = self.read_lines(context)?;
        if lines.iter().any(|l| entry(l) == Some(namespace)) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        lines.push(namespace.to_string());
        self.write_lines(context, &lines)?;
        tracing::info!("Cached namespace {namespace} for context {context}");
        Ok(AddOutcome::Added)
    }

    /// Returns whether `namespace` was cached.
    pub fn remove(&self, context: &str, namespace: &str) -> StoreResult<bool> {
        Ok(!self.remove_many(context, &[namespace.to_string()])?.is_empty())
    }

    /// Removes a batch in one rewrite. Names that are not cached are skipped,
    /// so re-running with the same batch is harmless. Returns the names that
    /// were actually removed.
    pub fn remove_many(&self, context: &str, namespaces: &[String]) -> StoreResult<Vec<String>> {
        let lines = self.read_lines(context)?;
        let mut removed = Vec::new();
        let kept: Vec<String> = lines
            .into_iter()
            .filter(|line| match entry(line) {
                Some(name) if namespaces.iter().any(|n| n.trim() == name) => {
                    if !removed.iter().any(|r| r == name) {
                        removed.push(name.to_string());
                    }
                    false
                }
                _ => true,
            })
            .collect();

        if !removed.is_empty() {
            self.write_lines(context, &kept)?;
            tracing::info!("Removed {} cached namespace(s) for context {context}", removed.len());
        }
        Ok(removed)
    }

    /// Deletes the whole cache file for `context`.
    pub fn delete(&self, context: &str) -> StoreResult<bool> {
        fsutil::remove_if_exists(&self.path_for(context))
    }

    /// Moves the cache of `old` under `new`. Existing entries under `new`
    /// are kept and entries of `old` not already present are appended.
    pub fn migrate(&self, old: &str, new: &str) -> StoreResult<()> {
        let (from, to) = (self.path_for(old), self.path_for(new));
        if from == to || !from.is_file() {
            return Ok(());
        }

        let mut merged = self.read_lines(new)?;
        for line in self.read_lines(old)? {
            let duplicate = entry(&line).is_some_and(|name| merged.iter().any(|m| entry(m) == Some(name)));
            if !duplicate {
                merged.push(line);
            }
        }
        self.write_lines(new, &merged)?;
        fsutil::remove_if_exists(&from)?;
        tracing::info!("Moved namespace cache {} -> {}", from.display(), to.display());
        Ok(())
    }

    fn read_lines(&self, context: &str) -> StoreResult<Vec<String>> {
        match std::fs::read_to_string(self.path_for(context)) {
            Ok(contents) => Ok(contents.lines().map(|l| l.trim_end_matches('\r').to_string()).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_lines(&self, context: &str, lines: &[String]) -> StoreResult<()> {
        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        fsutil::write_atomic(&self.path_for(context), out.as_bytes())
    }
}

/// The namespace a cache line names, if it is not a comment or blank.
fn entry(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        None
    } else {
        Some(trimmed)
    }
}

fn validate(namespace: &str) -> StoreResult<&str> {
    let namespace = namespace.trim();
    if namespace.is_empty() || namespace.starts_with('#') || namespace.contains('\n') {
        return Err(StoreError::Parse(format!("invalid namespace name: {namespace:?}")));
    }
    Ok(namespace)
}

/// Filesystem-safe form of a context name: anything outside alphanumerics,
/// `_`, `.` and `-` becomes `_`.
pub fn sanitize(context: &str) -> String {
    let key: String = context
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    match key.as_str() {
        "" | "." | ".." => key.replace('.', "_") + "_",
        _ => key,
    }
}
