use kubeshelf_core::{AbortReason, Removal, RemovalOptions, RemovalState};

use super::App;

impl App {
    pub(super) async fn remove_context(&mut self, name: Option<String>, dry_run: bool, yes: bool) -> anyhow::Result<String> {
        let context = match name.filter(|n| !n.trim().is_empty()) {
            Some(n) => n,
            None => self.resolve_context(None)?,
        };
        let force = yes || !self.config.general.confirm_remove;
        if !force && !dry_run && !self.interactive {
            anyhow::bail!("Refusing to remove {context} without confirmation; pass --yes");
        }

        let options = RemovalOptions { dry_run, force };
        let mut removal = Removal::new(&mut self.shelf, &mut self.session, self.control.as_ref(), &context, options);
        let plan = removal.prepare()?.to_string();
        // Without --yes the confirmation prompt carries the plan.
        let mut out = String::new();
        if dry_run {
            out.push_str(&format!("{plan}\n"));
        } else if force {
            eprintln!("{plan}");
        }
        let report = removal.run(self.selector.as_mut()).await;

        for warning in &report.warnings {
            out.push_str(&format!("warning: {warning}\n"));
        }
        match report.state() {
            RemovalState::Done => out.push_str(&format!("Removed context {context}\n")),
            RemovalState::Aborted(AbortReason::Declined) => out.push_str("Aborted\n"),
            RemovalState::Aborted(AbortReason::NotFound) => anyhow::bail!("Context {context} not found"),
            _ if report.dry_run => out.push_str("Dry run: nothing changed\n"),
            other => anyhow::bail!("Removal of {context} stopped in state {other:?}"),
        }
        Ok(out)
    }
}
