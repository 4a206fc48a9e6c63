use kubeshelf_core::{namespaces_for, AddOutcome, Choice, NamespaceSource, StoreError};

use super::App;

impl App {
    pub(super) fn add_namespace(&mut self, name: &str, context: Option<String>) -> anyhow::Result<String> {
        let context = self.resolve_context(context)?;
        Ok(match self.shelf.namespaces.add(&context, name)? {
            AddOutcome::Added => format!("Added namespace {} for {context}\n", name.trim()),
            AddOutcome::AlreadyPresent => format!("Namespace {} already present for {context}\n", name.trim()),
        })
    }

    pub(super) fn remove_namespaces(&mut self, names: Vec<String>, context: Option<String>) -> anyhow::Result<String> {
        let context = self.resolve_context(context)?;
        let names = if !names.is_empty() {
            names
        } else if self.interactive {
            let cached = self.shelf.namespaces.list(&context)?;
            match self.selector.pick_many("Select namespaces to forget", &cached) {
                Choice::Chosen(picked) => picked,
                Choice::Nothing => return Ok("Nothing selected\n".into()),
            }
        } else {
            return Err(StoreError::NoSelection.into());
        };

        let removed = self.shelf.namespaces.remove_many(&context, &names)?;
        let mut out = String::new();
        for name in &names {
            let name = name.trim();
            if removed.iter().any(|r| r == name) {
                out.push_str(&format!("Removed namespace {name} for {context}\n"));
            } else {
                out.push_str(&format!("Namespace {name} not found for {context}\n"));
            }
        }
        Ok(out)
    }

    pub(super) async fn list_namespaces(&mut self, context: Option<String>, cached: bool) -> anyhow::Result<String> {
        let context = self.resolve_context(context)?;
        let (names, source) = if cached {
            (self.shelf.namespaces.list(&context)?, NamespaceSource::Cache)
        } else {
            let file = self
                .shelf
                .registry
                .lookup(&context)
                .map(|f| f.to_path_buf())
                .ok_or_else(|| StoreError::NotFound(format!("context {context}")))?;
            let listing = namespaces_for(&self.shelf.namespaces, &file, &context, self.command_timeout()).await;
            (listing.names, listing.source)
        };

        if source == NamespaceSource::Cache {
            tracing::info!("Showing remembered namespaces for {context}");
        }
        let active = match self.session.context_name() {
            Some(current) if current == context => self.session.namespace(),
            _ => None,
        };
        Ok(names
            .iter()
            .map(|n| format!("{}{n}\n", if active == Some(n.as_str()) { "* " } else { "" }))
            .collect())
    }
}
