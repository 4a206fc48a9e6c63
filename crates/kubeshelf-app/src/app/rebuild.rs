use kubeshelf_core::{FileStatus, NewReason, Reconciler, RenamePropagator};

use super::App;

impl App {
    pub(super) async fn rebuild_registry(&mut self) -> anyhow::Result<String> {
        let report = Reconciler::new(self.control.as_ref()).rebuild(&mut self.shelf).await?;

        let mut out = format!(
            "Scanned {} file(s): {} context(s), {} new file(s)\n",
            report.files.len(),
            self.shelf.registry.len(),
            report.new_files().count()
        );
        if report.baseline_unknown {
            out.push_str("Previous rebuild was interrupted; every file counts as new\n");
        }

        let prompt = self.interactive && self.config.general.prompt_on_new_contexts;
        let propagator = RenamePropagator::new(self.control.as_ref());
        for scan in report.new_files() {
            let why = match &scan.status {
                FileStatus::New(NewReason::UnknownFile) => "new file".to_string(),
                FileStatus::New(NewReason::NewContexts(names)) => {
                    format!("new context(s): {}", names.join(", "))
                }
                FileStatus::New(NewReason::ModifiedSinceSnapshot) => "modified".to_string(),
                FileStatus::New(NewReason::NoBaseline) => "unverified".to_string(),
                FileStatus::Known => continue,
            };
            out.push_str(&format!("  {} ({why})\n", scan.path.display()));

            if prompt {
                let renamed = propagator
                    .offer(&mut self.shelf, &mut self.session, self.selector.as_mut(), &scan.path, &scan.contexts)
                    .await;
                for (old, new) in renamed {
                    out.push_str(&format!("    renamed {old} -> {new}\n"));
                }
            }
        }
        Ok(out)
    }
}
