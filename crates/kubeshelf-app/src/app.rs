use std::time::Duration;

use kubeshelf_config::{AppConfig, ControlBackend};
use kubeshelf_core::{BuiltinControl, ClusterControl, Kubectl, Selector, Session, Shelf, StoreError};

use crate::command::Command;

mod contexts;
mod namespaces;
mod rebuild;
mod removal;

/// One invocation: config, persisted state, the active session and the
/// collaborators used to reach kubeconfig files and the operator.
pub struct App {
    config: AppConfig,
    shelf: Shelf,
    session: Session,
    control: Box<dyn ClusterControl>,
    selector: Box<dyn Selector>,
    interactive: bool,
}

impl App {
    pub fn new(config: AppConfig, selector: Box<dyn Selector>, interactive: bool) -> anyhow::Result<Self> {
        let control = control_for(&config);
        Self::with_control(config, control, selector, interactive)
    }

    pub fn with_control(
        config: AppConfig,
        control: Box<dyn ClusterControl>,
        selector: Box<dyn Selector>,
        interactive: bool,
    ) -> anyhow::Result<Self> {
        let shelf = Shelf::open(&config.credential_dir(), &config.state_dir())?;
        let session = match shelf.selection.load()? {
            Some(selection) => Session::from_selection(&selection),
            None => Session::new(),
        };
        Ok(Self { config, shelf, session, control, selector, interactive })
    }

    /// Runs `command` and returns what it prints on stdout.
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::ShowSavedSelection => self.show_saved_selection(),
            Command::RebuildRegistry => self.rebuild_registry().await,
            Command::RemoveContext { name, dry_run, yes } => self.remove_context(name, dry_run, yes).await,
            Command::AddNamespace { name, context } => self.add_namespace(&name, context),
            Command::RemoveNamespace { names, context } => self.remove_namespaces(names, context),
            Command::ListNamespaces { context, cached } => self.list_namespaces(context, cached).await,
            Command::ListContexts { json } => self.list_contexts(json),
            Command::Import { file, name, yes } => self.import(&file, name.as_deref(), yes).await,
            Command::RenameContext { old, new } => self.rename_context(&old, &new).await,
            Command::Switch { context, namespace } => self.switch(context, namespace).await,
            Command::Env => self.env(),
            Command::InitConfig => {
                let path = AppConfig::init_default()?;
                Ok(format!("Wrote default config to {}\n", path.display()))
            }
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The context a command acts on: the explicit one, else the saved
    /// selection, else an interactive pick.
    fn resolve_context(&mut self, explicit: Option<String>) -> Result<String, StoreError> {
        if let Some(name) = explicit.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            return Ok(name);
        }
        if let Some(name) = self.session.context_name() {
            return Ok(name.to_string());
        }
        if !self.interactive {
            return Err(StoreError::NoSelection);
        }
        let names = self.shelf.registry.context_names();
        self.selector.pick_one("Select a context", &names).chosen().ok_or(StoreError::NoSelection)
    }

    fn command_timeout(&self) -> Duration {
        self.config.command_timeout()
    }
}

fn control_for(config: &AppConfig) -> Box<dyn ClusterControl> {
    match config.kubectl.backend {
        ControlBackend::Kubectl => Box::new(Kubectl::new(&config.kubectl.binary, config.command_timeout())),
        ControlBackend::Builtin => Box::new(BuiltinControl::new()),
    }
}

#[cfg(test)]
mod tests;
