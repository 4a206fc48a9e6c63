use std::path::{Path, PathBuf};

use crate::credential_store::{self, CredentialStore};
use crate::error::StoreResult;
use crate::namespace_cache::NamespaceCache;
use crate::registry::ContextRegistry;
use crate::selection::SelectionStore;

const REGISTRY_FILE: &str = "registry";
const SELECTION_FILE: &str = "selection";
const NAMESPACES_DIR: &str = "namespaces";
const REBUILD_MARKER: &str = "registry.rebuilding";

/// All persisted state: the credential directory plus the three stores kept
/// under the state directory.
///
/// No locking happens here. Two invocations racing on the same state
/// directory resolve as last writer wins.
#[derive(Debug, Clone)]
pub struct Shelf {
    pub credentials: CredentialStore,
    pub registry: ContextRegistry,
    pub namespaces: NamespaceCache,
    pub selection: SelectionStore,
    state_dir: PathBuf,
}

impl Shelf {
    pub fn open(credential_dir: &Path, state_dir: &Path) -> StoreResult<Self> {
        let credential_dir = credential_store::absolute(credential_dir);
        let state_dir = credential_store::absolute(state_dir);
        std::fs::create_dir_all(&state_dir)?;

        let registry = ContextRegistry::load(state_dir.join(REGISTRY_FILE))?;
        tracing::debug!("Opened state at {} ({} contexts)", state_dir.display(), registry.len());
        Ok(Self {
            credentials: CredentialStore::new(credential_dir),
            registry,
            namespaces: NamespaceCache::new(state_dir.join(NAMESPACES_DIR)),
            selection: SelectionStore::new(state_dir.join(SELECTION_FILE)),
            state_dir,
        })
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Present only while a registry rebuild is in flight.
    pub fn rebuild_marker(&self) -> PathBuf {
        self.state_dir.join(REBUILD_MARKER)
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use std::path::PathBuf;

    use super::Shelf;

    /// A shelf rooted in a temp dir, with `creds/` and `state/` inside.
    pub struct TestShelf {
        pub dir: tempfile::TempDir,
        pub shelf: Shelf,
    }

    impl TestShelf {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let creds = dir.path().join("creds");
            std::fs::create_dir_all(&creds).unwrap();
            let shelf = Shelf::open(&creds, &dir.path().join("state")).unwrap();
            Self { dir, shelf }
        }

        /// Writes an (opaque) credential file into the managed directory.
        pub fn credential(&self, name: &str) -> PathBuf {
            let path = self.shelf.credentials.dir().join(name);
            std::fs::write(&path, format!("# {name}\n")).unwrap();
            path
        }

        pub fn reopen(&self) -> Shelf {
            Shelf::open(self.shelf.credentials.dir(), self.shelf.state_dir()).unwrap()
        }
    }
}
