use std::fmt;
use std::path::PathBuf;

use crate::cluster_control::ClusterControl;
use crate::error::{StoreError, StoreResult};
use crate::select::Selector;
use crate::session::Session;
use crate::shelf::Shelf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    NotFound,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalState {
    Requested,
    Confirmed,
    FileUpdated,
    MapUpdated,
    CacheCleared,
    SelectionCleared,
    Done,
    Aborted(AbortReason),
}

impl RemovalState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RemovalOptions {
    /// Resolve and report the plan, mutate nothing.
    pub dry_run: bool,
    /// Skip the confirmation prompt.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPlan {
    pub context: String,
    pub credential_file: PathBuf,
    /// Whether the file lives under the managed credential directory.
    pub managed: bool,
    /// Other contexts the registry maps to the same file.
    pub siblings: Vec<String>,
}

impl fmt::Display for RemovalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Remove context '{}' defined in {}", self.context, self.credential_file.display())?;
        if self.siblings.is_empty() && self.managed {
            writeln!(f, "  the file has no other contexts and will be deleted")?;
        } else if self.siblings.is_empty() {
            writeln!(f, "  the file is outside the managed directory and will be kept")?;
        } else {
            writeln!(f, "  the file keeps {} other context(s): {}", self.siblings.len(), self.siblings.join(", "))?;
        }
        write!(f, "  its namespace cache and saved selection (if any) will be cleared")
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemovalReport {
    pub plan: Option<RemovalPlan>,
    pub trail: Vec<RemovalState>,
    pub dry_run: bool,
    pub file_deleted: bool,
    pub records_removed: usize,
    pub cache_cleared: bool,
    pub selection_cleared: bool,
    /// Steps that failed without stopping the removal.
    pub warnings: Vec<String>,
}

impl RemovalReport {
    pub fn state(&self) -> RemovalState {
        self.trail.last().copied().unwrap_or(RemovalState::Requested)
    }
}

/// Removes one context and everything that refers to it, one named state at
/// a time. Failures after confirmation are recorded as warnings and the
/// machine keeps going, so the stores never stop half-cleaned.
pub struct Removal<'a> {
    shelf: &'a mut Shelf,
    session: &'a mut Session,
    control: &'a dyn ClusterControl,
    options: RemovalOptions,
    context: String,
    state: RemovalState,
    report: RemovalReport,
}

impl<'a> Removal<'a> {
    pub fn new(
        shelf: &'a mut Shelf,
        session: &'a mut Session,
        control: &'a dyn ClusterControl,
        context: &str,
        options: RemovalOptions,
    ) -> Self {
        let report = RemovalReport { dry_run: options.dry_run, ..RemovalReport::default() };
        Self {
            shelf,
            session,
            control,
            options,
            context: context.to_string(),
            state: RemovalState::Requested,
            report,
        }
    }

    /// Resolves the context into a plan without leaving `Requested`.
    pub fn prepare(&mut self) -> StoreResult<&RemovalPlan> {
        if self.report.plan.is_none() {
            let Some(file) = self.shelf.registry.lookup(&self.context) else {
                return Err(StoreError::NotFound(format!("context {}", self.context)));
            };
            let credential_file = file.to_path_buf();
            let siblings = self
                .shelf
                .registry
                .contexts_in(&credential_file)
                .into_iter()
                .filter(|c| *c != self.context)
                .map(String::from)
                .collect();
            let managed = self.shelf.credentials.manages(&credential_file);
            self.report.plan = Some(RemovalPlan { context: self.context.clone(), credential_file, managed, siblings });
        }
        self.report.plan.as_ref().ok_or_else(|| StoreError::NotFound(self.context.clone()))
    }

    /// Runs the machine to a terminal state, or to the end of planning for a
    /// dry run.
    pub async fn run(mut self, selector: &mut dyn Selector) -> RemovalReport {
        self.report.trail.push(self.state);
        while !self.state.is_terminal() {
            if self.options.dry_run && self.state == RemovalState::Requested {
                if self.prepare().is_err() {
                    self.enter(RemovalState::Aborted(AbortReason::NotFound));
                }
                break;
            }
            let next = self.step(selector).await;
            self.enter(next);
        }
        self.report
    }

    fn enter(&mut self, next: RemovalState) {
        tracing::debug!("Removal of {}: {:?} -> {next:?}", self.context, self.state);
        self.state = next;
        self.report.trail.push(next);
    }

    async fn step(&mut self, selector: &mut dyn Selector) -> RemovalState {
        match self.state {
            RemovalState::Requested => self.confirm(selector),
            RemovalState::Confirmed => self.update_file().await,
            RemovalState::FileUpdated => self.update_map().await,
            RemovalState::MapUpdated => self.clear_cache(),
            RemovalState::CacheCleared => self.clear_selection(),
            RemovalState::SelectionCleared => self.finish(),
            terminal => terminal,
        }
    }

    fn confirm(&mut self, selector: &mut dyn Selector) -> RemovalState {
        let plan = match self.prepare() {
            Ok(plan) => plan.clone(),
            Err(_) => return RemovalState::Aborted(AbortReason::NotFound),
        };
        if self.options.force || selector.confirm(&format!("{plan}\nProceed?")) {
            RemovalState::Confirmed
        } else {
            RemovalState::Aborted(AbortReason::Declined)
        }
    }

    async fn update_file(&mut self) -> RemovalState {
        let file = self.planned_file();
        let result = self.control.delete_context(&file, &self.context).await;
        if let Err(e) = result {
            self.warn(format!("could not delete {} from {}: {e}", self.context, file.display()));
        }
        RemovalState::FileUpdated
    }

    async fn update_map(&mut self) -> RemovalState {
        let file = self.planned_file();
        let listed = self.control.list_contexts(&file).await;
        let remaining: Vec<String> = match listed {
            Ok(names) => names.into_iter().filter(|n| *n != self.context).collect(),
            Err(e) => {
                self.warn(format!("could not list contexts in {}: {e}", file.display()));
                self.report.plan.as_ref().map(|p| p.siblings.clone()).unwrap_or_default()
            }
        };

        if remaining.is_empty() && self.shelf.credentials.manages(&file) {
            match self.shelf.credentials.delete(&file) {
                Ok(deleted) => self.report.file_deleted = deleted,
                Err(e) => self.warn(format!("could not delete {}: {e}", file.display())),
            }
            self.report.records_removed = self.shelf.registry.remove_by_file(&file);
            self.report.records_removed += self.shelf.registry.remove_by_name(&self.context);
        } else {
            self.report.records_removed = self.shelf.registry.remove_by_name(&self.context);
        }
        self.shelf.registry.normalize();
        if let Err(e) = self.shelf.registry.save() {
            self.warn(format!("could not save registry: {e}"));
        }
        RemovalState::MapUpdated
    }

    fn clear_cache(&mut self) -> RemovalState {
        match self.shelf.namespaces.delete(&self.context) {
            Ok(deleted) => self.report.cache_cleared = deleted,
            Err(e) => self.warn(format!("could not delete namespace cache: {e}")),
        }
        RemovalState::CacheCleared
    }

    fn clear_selection(&mut self) -> RemovalState {
        let result = match self.shelf.selection.references(&self.context) {
            Ok(true) => self.shelf.selection.clear(),
            Ok(false) => Ok(false),
            Err(e) => Err(e),
        };
        match result {
            Ok(cleared) => self.report.selection_cleared = cleared,
            Err(e) => self.warn(format!("could not clear saved selection: {e}")),
        }
        RemovalState::SelectionCleared
    }

    fn finish(&mut self) -> RemovalState {
        let file = self.planned_file();
        let forgot = self.session.forget_context(&self.context);
        if !forgot && self.report.file_deleted && self.session.active_credential_file() == Some(file.as_path()) {
            *self.session = Session::new();
        }
        tracing::info!("Removed context {}", self.context);
        RemovalState::Done
    }

    fn planned_file(&self) -> PathBuf {
        self.report.plan.as_ref().map(|p| p.credential_file.clone()).unwrap_or_default()
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("Removal of {}: {message}", self.context);
        self.report.warnings.push(message);
    }
}
