use std::path::{Path, PathBuf};

use crate::selection::Selection;

/// The kubeconfig, context and namespace a run is working against. Passed
/// explicitly instead of living in the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    active_credential_file: Option<PathBuf>,
    context: Option<String>,
    namespace: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_selection(selection: &Selection) -> Self {
        let namespace = Some(selection.namespace.clone()).filter(|ns| !ns.is_empty());
        Self {
            active_credential_file: Some(selection.credential_file.clone()),
            context: Some(selection.context.clone()),
            namespace,
        }
    }

    pub fn activate(&mut self, file: &Path, context: &str, namespace: Option<&str>) {
        self.active_credential_file = Some(file.to_path_buf());
        self.context = Some(context.to_string());
        self.namespace = namespace.map(String::from);
    }

    pub fn active_credential_file(&self) -> Option<&Path> {
        self.active_credential_file.as_deref()
    }

    pub fn context_name(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Drops the active context if it is `name`. Returns whether it was.
    pub fn forget_context(&mut self, name: &str) -> bool {
        if self.context.as_deref() != Some(name) {
            return false;
        }
        *self = Self::default();
        true
    }

    /// Follows a rename of `old` inside `file`.
    pub fn rename_context(&mut self, file: &Path, old: &str, new: &str) {
        if self.context.as_deref() == Some(old) && self.active_credential_file.as_deref() == Some(file) {
            self.context = Some(new.to_string());
        }
    }

    /// Variables a child process needs to act on this session.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        let mut vars = Vec::new();
        if let Some(file) = &self.active_credential_file {
            vars.push(("KUBECONFIG".into(), file.to_string_lossy().into_owned()));
        }
        if let Some(ctx) = &self.context {
            vars.push(("KUBESHELF_CONTEXT".into(), ctx.clone()));
        }
        if let Some(ns) = &self.namespace {
            vars.push(("KUBESHELF_NAMESPACE".into(), ns.clone()));
        }
        vars
    }

    /// `export` lines for a POSIX shell, single-quoted.
    pub fn shell_exports(&self) -> String {
        self.env_vars().iter().map(|(k, v)| format!("export {k}={}\n", shell_quote(v))).collect()
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
