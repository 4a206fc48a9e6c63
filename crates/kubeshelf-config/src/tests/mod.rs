use super::*;

#[test]
fn default_config_has_expected_general_fields() {
    let config = AppConfig::default();
    assert!(config.general.confirm_remove);
    assert_eq!(config.general.default_namespace, "default");
    assert!(config.general.prompt_on_new_contexts);
}

#[test]
fn default_config_uses_kubectl_backend() {
    let config = AppConfig::default();
    assert_eq!(config.kubectl.binary, "kubectl");
    assert_eq!(config.kubectl.timeout_secs, 15);
    assert_eq!(config.kubectl.backend, ControlBackend::Kubectl);
    assert_eq!(config.command_timeout(), std::time::Duration::from_secs(15));
}

#[test]
fn empty_paths_fall_back_to_defaults() {
    let config = AppConfig::default();
    assert!(config.credential_dir().ends_with(".kube/configs"));
    assert!(config.state_dir().ends_with("kubeshelf"));
}

#[test]
fn parse_kubectl_section_with_kebab_aliases() {
    let raw = r#"
[kubectl]
timeout-secs = 3
backend = "builtin"
"#;
    let config: AppConfig = toml::from_str(raw).unwrap();
    assert_eq!(config.kubectl.timeout_secs, 3);
    assert_eq!(config.kubectl.backend, ControlBackend::Builtin);
    assert_eq!(config.kubectl.binary, "kubectl");
}

#[test]
fn partial_toml_only_general_merges_with_defaults() {
    let mut base = AppConfig::default();
    let user_toml = r#"
[general]
confirm_remove = false
"#;
    let user: AppConfig = toml::from_str(user_toml).unwrap();
    base.merge(user);

    assert!(!base.general.confirm_remove);
    assert_eq!(base.general.default_namespace, "default");
    assert_eq!(base.kubectl.binary, "kubectl");
}

#[test]
fn user_paths_override_only_when_set() {
    let mut base = AppConfig::default();
    base.paths.state_dir = "/var/lib/kubeshelf".into();
    let user: AppConfig = toml::from_str("[paths]\ncredential_dir = \"/srv/kube\"\n").unwrap();
    base.merge(user);

    assert_eq!(base.credential_dir(), PathBuf::from("/srv/kube"));
    assert_eq!(base.state_dir(), PathBuf::from("/var/lib/kubeshelf"));
}

#[test]
fn tilde_expands_to_home() {
    let expanded = paths::expand_home("~/kube/configs");
    assert!(expanded.ends_with("kube/configs"));
    assert!(!expanded.to_string_lossy().starts_with('~'));
}

#[test]
fn invalid_backend_is_rejected() {
    let raw = "[kubectl]\nbackend = \"helm\"\n";
    assert!(toml::from_str::<AppConfig>(raw).is_err());
}

#[test]
fn load_from_file_merges_over_defaults() {
    let dir = std::env::temp_dir().join(format!("kubeshelf-config-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(&path, "[kubectl]\nbinary = \"/opt/bin/kubectl\"\n").unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    assert_eq!(config.kubectl.binary, "/opt/bin/kubectl");
    assert_eq!(config.kubectl.timeout_secs, 15);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn write_default_produces_loadable_defaults_and_never_overwrites() {
    let dir = std::env::temp_dir().join(format!("kubeshelf-config-init-{}", std::process::id()));
    let path = dir.join("nested").join("config.toml");

    AppConfig::write_default(&path).unwrap();
    let loaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(loaded.general.default_namespace, "default");
    assert!(loaded.general.confirm_remove);

    std::fs::write(&path, "[general]\nconfirm_remove = false\n").unwrap();
    assert!(AppConfig::write_default(&path).is_err());
    assert!(!AppConfig::load_from(&path).unwrap().general.confirm_remove);

    std::fs::remove_dir_all(&dir).unwrap();
}
