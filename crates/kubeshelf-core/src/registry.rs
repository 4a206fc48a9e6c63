use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::cluster_control::ClusterControl;
use crate::error::StoreResult;
use crate::fsutil;

mod codec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRecord {
    pub context_name: String,
    pub credential_file: PathBuf,
}

/// Context name to kubeconfig file mapping, persisted at `path`.
///
/// Mutations are in memory until [`ContextRegistry::save`]. At most one
/// record exists per context name after any public mutation.
#[derive(Debug, Clone)]
pub struct ContextRegistry {
    path: PathBuf,
    records: Vec<ContextRecord>,
}

impl ContextRegistry {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), records: Vec::new() }
    }

    /// Reads the registry at `path`; a missing file is an empty registry.
    pub fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(contents) => codec::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let mut registry = Self { path, records };
        registry.normalize();
        Ok(registry)
    }

    pub fn save(&self) -> StoreResult<()> {
        fsutil::write_atomic(&self.path, codec::render(&self.records).as_bytes())?;
        tracing::debug!("Saved {} registry records to {}", self.records.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Asks `control` which contexts `file` defines and points each of them at
    /// `file`. A failing command or a file without contexts yields no
    /// mappings; neither is an error.
    pub async fn add_mappings_for_file(&mut self, control: &dyn ClusterControl, file: &Path) -> Vec<String> {
        let names = match control.list_contexts(file).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Could not list contexts in {}: {e}", file.display());
                Vec::new()
            }
        };
        self.insert_mappings(file, &names);
        names
    }

    /// Points every name in `names` at `file`, replacing whatever record held
    /// that name before.
    pub fn insert_mappings(&mut self, file: &Path, names: &[String]) {
        for name in names {
            self.records.retain(|r| &r.context_name != name);
            self.records.push(ContextRecord { context_name: name.clone(), credential_file: file.to_path_buf() });
        }
    }

    /// Appends a record without dropping an older one for the same name.
    /// [`ContextRegistry::normalize`] collapses the duplicates later.
    #[cfg(test)]
    pub(crate) fn append_raw(&mut self, record: ContextRecord) {
        self.records.push(record);
    }

    /// Collapses to one record per name. The last mapping seen for a name
    /// wins and takes the position of its first occurrence.
    pub fn normalize(&mut self) {
        let collapsed = {
            let mut latest: HashMap<&str, usize> = HashMap::new();
            for (idx, record) in self.records.iter().enumerate() {
                latest.insert(record.context_name.as_str(), idx);
            }
            if latest.len() == self.records.len() {
                return;
            }

            let mut seen = HashSet::new();
            let mut collapsed = Vec::with_capacity(latest.len());
            for record in &self.records {
                if seen.insert(record.context_name.as_str()) {
                    collapsed.push(self.records[latest[record.context_name.as_str()]].clone());
                }
            }
            collapsed
        };
        self.records = collapsed;
    }

    pub fn lookup(&self, context_name: &str) -> Option<&Path> {
        self.records.iter().rev().find(|r| r.context_name == context_name).map(|r| r.credential_file.as_path())
    }

    pub fn contains(&self, context_name: &str) -> bool {
        self.lookup(context_name).is_some()
    }

    /// Returns how many records were removed.
    pub fn remove_by_name(&mut self, context_name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.context_name != context_name);
        before - self.records.len()
    }

    pub fn remove_by_file(&mut self, file: &Path) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.credential_file != file);
        before - self.records.len()
    }

    /// Renames the record of `old` that points at `file`. `file` now defines
    /// `new`, so records of `new` for other files are dropped, while a record
    /// of `old` for another file is kept. Without a matching record `new` is
    /// mapped to `file` anyway. Returns whether a record matched.
    pub fn rename(&mut self, file: &Path, old: &str, new: &str) -> bool {
        self.records.retain(|r| r.context_name != new);
        let mut renamed = false;
        for record in self.records.iter_mut().filter(|r| r.context_name == old && r.credential_file == file) {
            record.context_name = new.to_string();
            renamed = true;
        }
        if !renamed {
            self.records.push(ContextRecord { context_name: new.to_string(), credential_file: file.to_path_buf() });
        }
        self.normalize();
        renamed
    }

    pub fn records(&self) -> &[ContextRecord] {
        &self.records
    }

    pub fn contexts_in(&self, file: &Path) -> Vec<&str> {
        self.records.iter().filter(|r| r.credential_file == file).map(|r| r.context_name.as_str()).collect()
    }

    pub fn context_names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.context_name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn replace_records(&mut self, records: Vec<ContextRecord>) {
        self.records = records;
        self.normalize();
    }
}
