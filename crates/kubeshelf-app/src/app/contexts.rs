use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;

use kubeshelf_core::{namespaces_for, RenameOutcome, RenamePropagator, Selection, StoreError};

use super::App;

#[derive(Serialize)]
struct ContextRow<'a> {
    context: &'a str,
    file: String,
    selected: bool,
}

impl App {
    pub(super) fn show_saved_selection(&self) -> anyhow::Result<String> {
        match self.shelf.selection.load()? {
            Some(selection) => Ok(format!(
                "KUBECONFIG={}\nCONTEXT={}\nNAMESPACE={}\n",
                selection.credential_file.display(),
                selection.context,
                selection.namespace
            )),
            None => Ok("No saved selection\n".into()),
        }
    }

    pub(super) fn list_contexts(&self, json: bool) -> anyhow::Result<String> {
        let current = self.session.context_name();
        let rows: Vec<ContextRow<'_>> = self
            .shelf
            .registry
            .records()
            .iter()
            .map(|r| ContextRow {
                context: &r.context_name,
                file: r.credential_file.to_string_lossy().into_owned(),
                selected: current == Some(r.context_name.as_str()),
            })
            .collect();

        if json {
            return Ok(serde_json::to_string_pretty(&rows)? + "\n");
        }
        Ok(rows
            .iter()
            .map(|row| format!("{}{}\t{}\n", if row.selected { "* " } else { "" }, row.context, row.file))
            .collect())
    }

    pub(super) async fn import(&mut self, file: &Path, name: Option<&str>, yes: bool) -> anyhow::Result<String> {
        let report = kubeshelf_core::import(&mut self.shelf, self.control.as_ref(), file, name)
            .await
            .with_context(|| format!("importing {}", file.display()))?;

        let mut out = format!("Imported {} ({} context(s))\n", report.file.display(), report.contexts.len());
        for (context, previous) in &report.displaced {
            out.push_str(&format!("  {context} now comes from this file instead of {}\n", previous.display()));
        }

        if !yes && self.interactive && self.config.general.prompt_on_new_contexts {
            let renamed = RenamePropagator::new(self.control.as_ref())
                .offer(&mut self.shelf, &mut self.session, self.selector.as_mut(), &report.file, &report.contexts)
                .await;
            for (old, new) in renamed {
                out.push_str(&format!("  renamed {old} -> {new}\n"));
            }
        }
        Ok(out)
    }

    pub(super) async fn rename_context(&mut self, old: &str, new: &str) -> anyhow::Result<String> {
        let file = self
            .shelf
            .registry
            .lookup(old)
            .map(Path::to_path_buf)
            .ok_or_else(|| StoreError::NotFound(format!("context {old}")))?;

        let outcome = RenamePropagator::new(self.control.as_ref())
            .rename(&mut self.shelf, &mut self.session, &file, old, new)
            .await?;
        Ok(match outcome {
            RenameOutcome::Unchanged => format!("Context {old} unchanged\n"),
            RenameOutcome::Renamed { .. } => format!("Renamed {old} -> {}\n", new.trim()),
        })
    }

    pub(super) async fn switch(&mut self, context: Option<String>, namespace: Option<String>) -> anyhow::Result<String> {
        let context = match context {
            Some(c) => c,
            None if self.interactive => {
                let names = self.shelf.registry.context_names();
                self.selector.pick_one("Select a context", &names).chosen().ok_or(StoreError::NoSelection)?
            }
            None => return Err(StoreError::NoSelection.into()),
        };
        let file = self
            .shelf
            .registry
            .lookup(&context)
            .map(Path::to_path_buf)
            .ok_or_else(|| StoreError::NotFound(format!("context {context}")))?;

        let namespace = match namespace {
            Some(ns) => ns,
            None => {
                let listing = namespaces_for(&self.shelf.namespaces, &file, &context, self.command_timeout()).await;
                let picked = if self.interactive {
                    self.selector.pick_one("Select a namespace", &listing.names).chosen()
                } else {
                    None
                };
                picked.unwrap_or_else(|| self.config.general.default_namespace.clone())
            }
        };

        let selection = Selection { credential_file: file, context, namespace };
        self.shelf.selection.save(&selection)?;
        if !selection.namespace.is_empty() {
            if let Err(e) = self.shelf.namespaces.add(&selection.context, &selection.namespace) {
                tracing::warn!("Could not remember namespace {}: {e}", selection.namespace);
            }
        }
        self.session.activate(&selection.credential_file, &selection.context, Some(&selection.namespace));

        Ok(format!(
            "Switched to {} / {} ({})\n",
            selection.context,
            selection.namespace,
            selection.credential_file.display()
        ))
    }

    pub(super) fn env(&self) -> anyhow::Result<String> {
        if self.session.active_credential_file().is_none() {
            return Err(StoreError::NoSelection.into());
        }
        Ok(self.session.shell_exports())
    }
}
