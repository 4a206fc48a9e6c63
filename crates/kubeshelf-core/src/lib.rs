pub mod cluster_control;
pub mod credential_store;
pub mod error;
pub mod fsutil;
pub mod import;
pub mod kube_client;
pub mod namespace_cache;
pub mod reconcile;
pub mod registry;
pub mod removal;
pub mod rename;
pub mod select;
pub mod selection;
pub mod session;
pub mod shelf;

pub use cluster_control::{BuiltinControl, ClusterControl, Kubectl};
pub use credential_store::CredentialStore;
pub use error::{StoreError, StoreResult};
pub use import::{import, ImportReport};
pub use kube_client::{namespaces_for, KubeClient, NamespaceListing, NamespaceSource};
pub use namespace_cache::{AddOutcome, NamespaceCache};
pub use reconcile::{FileScan, FileStatus, NewReason, ReconcileReport, Reconciler};
pub use registry::{ContextRecord, ContextRegistry};
pub use removal::{AbortReason, Removal, RemovalOptions, RemovalPlan, RemovalReport, RemovalState};
pub use rename::{RenameOutcome, RenamePropagator};
pub use select::{Choice, NonInteractive, Selector};
pub use selection::{Selection, SelectionStore};
pub use session::Session;
pub use shelf::Shelf;
