use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use kubeshelf_config::AppConfig;
use kubeshelf_core::{BuiltinControl, Choice, NonInteractive, Selector, StoreError};

use super::App;
use crate::command::Command;

fn kubeconfig(contexts: &[&str]) -> String {
    let mut yaml = String::from(
        "apiVersion: v1\nkind: Config\nclusters:\n- name: c1\n  cluster:\n    server: https://127.0.0.1:1\n\
         users:\n- name: u1\n  user:\n    token: t\ncontexts:\n",
    );
    for ctx in contexts {
        yaml.push_str(&format!("- name: {ctx}\n  context:\n    cluster: c1\n    user: u1\n"));
    }
    if contexts.is_empty() {
        yaml = yaml.replace("contexts:\n", "contexts: []\n");
    }
    yaml
}

/// Replays text answers; confirms with `confirm`.
#[derive(Default)]
struct Scripted {
    answers: VecDeque<String>,
    confirm: bool,
}

impl Selector for Scripted {
    fn pick_one(&mut self, _prompt: &str, items: &[String]) -> Choice<String> {
        match self.answers.pop_front() {
            Some(a) if items.contains(&a) => Choice::Chosen(a),
            _ => Choice::Nothing,
        }
    }

    fn pick_many(&mut self, _prompt: &str, _items: &[String]) -> Choice<Vec<String>> {
        match self.answers.pop_front() {
            Some(a) => Choice::Chosen(a.split(',').map(String::from).collect()),
            None => Choice::Nothing,
        }
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.confirm
    }

    fn ask(&mut self, _prompt: &str, default: &str) -> String {
        self.answers.pop_front().unwrap_or_else(|| default.to_string())
    }
}

struct Harness {
    dir: tempfile::TempDir,
    config: AppConfig,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.paths.credential_dir = dir.path().join("creds").to_string_lossy().into_owned();
        config.paths.state_dir = dir.path().join("state").to_string_lossy().into_owned();
        config.kubectl.timeout_secs = 2;
        std::fs::create_dir_all(dir.path().join("creds")).unwrap();
        Self { dir, config }
    }

    fn app(&self) -> App {
        self.app_with(Box::new(NonInteractive), false)
    }

    fn app_with(&self, selector: Box<dyn Selector>, interactive: bool) -> App {
        App::with_control(self.config.clone(), Box::new(BuiltinControl::new()), selector, interactive).unwrap()
    }

    /// A kubeconfig outside the managed directory, ready to import.
    fn download(&self, name: &str, contexts: &[&str]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, kubeconfig(contexts)).unwrap();
        path
    }

    fn managed(&self, name: &str) -> PathBuf {
        self.dir.path().join("creds").join(name)
    }

    async fn run(&self, app: &mut App, command: Command) -> String {
        app.execute(command).await.unwrap()
    }
}

fn import(file: &Path, name: &str) -> Command {
    Command::Import { file: file.to_path_buf(), name: Some(name.into()), yes: true }
}

fn switch(context: &str, namespace: &str) -> Command {
    Command::Switch { context: Some(context.into()), namespace: Some(namespace.into()) }
}

#[tokio::test]
async fn import_then_list_contexts() {
    let h = Harness::new();
    let mut app = h.app();
    let src = h.download("dl", &["prod", "staging"]);

    let out = h.run(&mut app, import(&src, "team")).await;
    assert!(out.contains("2 context(s)"));

    let listed = h.run(&mut app, Command::ListContexts { json: false }).await;
    let file = h.managed("team");
    assert!(listed.contains(&format!("prod\t{}", file.display())));
    assert!(listed.contains(&format!("staging\t{}", file.display())));
}

#[tokio::test]
async fn list_contexts_json_marks_selection() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod", "dev"]), "f")).await;
    h.run(&mut app, switch("dev", "default")).await;

    let json = h.run(&mut app, Command::ListContexts { json: true }).await;
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    let selected: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["selected"] == true)
        .map(|r| r["context"].as_str().unwrap())
        .collect();
    assert_eq!(selected, vec!["dev"]);
}

#[tokio::test]
async fn show_without_selection() {
    let h = Harness::new();
    let out = h.run(&mut h.app(), Command::ShowSavedSelection).await;
    assert_eq!(out, "No saved selection\n");
}

#[tokio::test]
async fn switch_saves_selection_and_remembers_namespace() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;
    h.run(&mut app, switch("prod", "payments")).await;

    let mut fresh = h.app();
    let shown = h.run(&mut fresh, Command::ShowSavedSelection).await;
    assert_eq!(shown, format!("KUBECONFIG={}\nCONTEXT=prod\nNAMESPACE=payments\n", h.managed("f1").display()));

    let cached = h.run(&mut fresh, Command::ListNamespaces { context: None, cached: true }).await;
    assert_eq!(cached, "* payments\n");

    let env = h.run(&mut fresh, Command::Env).await;
    assert!(env.contains(&format!("export KUBECONFIG='{}'", h.managed("f1").display())));
}

#[tokio::test]
async fn switch_to_unknown_context_fails() {
    let h = Harness::new();
    let err = h.app().execute(switch("ghost", "default")).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NotFound(_))));
}

#[tokio::test]
async fn switch_without_namespace_uses_default_when_unreachable() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;
    h.run(&mut app, Command::Switch { context: Some("prod".into()), namespace: None }).await;

    let shown = h.run(&mut app, Command::ShowSavedSelection).await;
    assert!(shown.ends_with("NAMESPACE=default\n"));
}

#[tokio::test]
async fn namespace_commands_need_a_context_when_non_interactive() {
    let h = Harness::new();
    let err = h.app().execute(Command::AddNamespace { name: "web".into(), context: None }).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NoSelection)));
}

#[tokio::test]
async fn add_and_remove_namespaces() {
    let h = Harness::new();
    let mut app = h.app();
    let ctx = Some("prod".to_string());

    let added = h.run(&mut app, Command::AddNamespace { name: "web".into(), context: ctx.clone() }).await;
    assert!(added.starts_with("Added namespace web"));
    let again = h.run(&mut app, Command::AddNamespace { name: "web".into(), context: ctx.clone() }).await;
    assert!(again.contains("already present"));

    let out = h
        .run(&mut app, Command::RemoveNamespace { names: vec!["web".into(), "api".into()], context: ctx.clone() })
        .await;
    assert!(out.contains("Removed namespace web for prod"));
    assert!(out.contains("Namespace api not found for prod"));
}

#[tokio::test]
async fn interactive_remove_namespace_nothing_chosen() {
    let h = Harness::new();
    let mut app = h.app_with(Box::new(Scripted::default()), true);
    let ctx = Some("prod".to_string());
    h.run(&mut app, Command::AddNamespace { name: "web".into(), context: ctx.clone() }).await;

    let out = h.run(&mut app, Command::RemoveNamespace { names: vec![], context: ctx.clone() }).await;
    assert_eq!(out, "Nothing selected\n");
}

#[tokio::test]
async fn remove_context_requires_yes_when_non_interactive() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;

    let result = app.execute(Command::RemoveContext { name: Some("prod".into()), dry_run: false, yes: false }).await;
    assert!(result.is_err());
    assert!(h.managed("f1").exists());
}

#[tokio::test]
async fn remove_last_context_deletes_file_and_selection() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;
    h.run(&mut app, switch("prod", "default")).await;

    let out = h.run(&mut app, Command::RemoveContext { name: Some("prod".into()), dry_run: false, yes: true }).await;
    assert!(out.contains("Removed context prod"));
    assert!(!h.managed("f1").exists());
    assert_eq!(h.run(&mut app, Command::ShowSavedSelection).await, "No saved selection\n");
    assert!(app.session().context_name().is_none());
    assert_eq!(h.run(&mut app, Command::ListContexts { json: false }).await, "");
}

#[tokio::test]
async fn remove_one_of_two_contexts_keeps_file() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod", "staging"]), "f2")).await;

    h.run(&mut app, Command::RemoveContext { name: Some("prod".into()), dry_run: false, yes: true }).await;
    assert!(h.managed("f2").exists());
    let listed = h.run(&mut app, Command::ListContexts { json: false }).await;
    assert!(listed.starts_with("staging\t"));
    assert!(!listed.contains("prod"));
}

#[tokio::test]
async fn dry_run_prints_plan_only() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;

    let out = h.run(&mut app, Command::RemoveContext { name: Some("prod".into()), dry_run: true, yes: false }).await;
    assert!(out.contains("will be deleted"));
    assert!(out.contains("Dry run"));
    assert!(h.managed("f1").exists());
}

#[tokio::test]
async fn declined_removal_is_reported_as_aborted() {
    let h = Harness::new();
    let mut app = h.app_with(Box::new(Scripted { confirm: false, ..Scripted::default() }), true);
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;

    let out = h.run(&mut app, Command::RemoveContext { name: Some("prod".into()), dry_run: false, yes: false }).await;
    assert_eq!(out, "Aborted\n");
    assert!(h.managed("f1").exists());
}

#[tokio::test]
async fn remove_unknown_context_fails() {
    let h = Harness::new();
    let result = h.app().execute(Command::RemoveContext { name: Some("x".into()), dry_run: false, yes: true }).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn rename_context_carries_selection() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;
    h.run(&mut app, switch("prod", "web")).await;

    let out = h.run(&mut app, Command::RenameContext { old: "prod".into(), new: "prod-eu".into() }).await;
    assert_eq!(out, "Renamed prod -> prod-eu\n");

    let shown = h.run(&mut h.app(), Command::ShowSavedSelection).await;
    assert!(shown.contains("CONTEXT=prod-eu\n"));
    let cached = h.run(&mut h.app(), Command::ListNamespaces { context: Some("prod-eu".into()), cached: true }).await;
    assert_eq!(cached, "* web\n");
}

#[tokio::test]
async fn interactive_import_offers_renames() {
    let h = Harness::new();
    let answers = VecDeque::from(["production".to_string(), String::new()]);
    let mut app = h.app_with(Box::new(Scripted { answers, confirm: false }), true);

    let src = h.download("dl", &["prod", "dev"]);
    let out = h.run(&mut app, Command::Import { file: src, name: Some("f1".into()), yes: false }).await;
    assert!(out.contains("renamed prod -> production"));

    let listed = h.run(&mut app, Command::ListContexts { json: false }).await;
    assert!(listed.contains("production\t"));
    assert!(listed.contains("dev\t"));
}

#[tokio::test]
async fn rebuild_registry_picks_up_dropped_in_files() {
    let h = Harness::new();
    let mut app = h.app();
    h.run(&mut app, import(&h.download("dl", &["prod"]), "f1")).await;
    std::fs::write(h.managed("f2"), kubeconfig(&["qa"])).unwrap();

    let out = h.run(&mut app, Command::RebuildRegistry).await;
    assert!(out.contains("Scanned 2 file(s): 2 context(s)"));
    assert!(out.contains(&format!("{} (new file)", h.managed("f2").display())));

    let listed = h.run(&mut app, Command::ListContexts { json: false }).await;
    assert!(listed.contains("qa\t"));
}

#[tokio::test]
async fn env_without_selection_fails() {
    let h = Harness::new();
    let err = h.app().execute(Command::Env).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NoSelection)));
}
