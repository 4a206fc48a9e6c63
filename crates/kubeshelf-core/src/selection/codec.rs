//! Three `KEY=value` lines. Keys are matched literally and values are taken
//! verbatim; nothing in the file is ever evaluated or unquoted.

use std::path::PathBuf;

use super::Selection;
use crate::error::{StoreError, StoreResult};

const KUBECONFIG: &str = "KUBECONFIG";
const CONTEXT: &str = "CONTEXT";
const NAMESPACE: &str = "NAMESPACE";

pub fn render(selection: &Selection) -> String {
    format!(
        "{KUBECONFIG}={}\n{CONTEXT}={}\n{NAMESPACE}={}\n",
        selection.credential_file.to_string_lossy(),
        selection.context,
        selection.namespace,
    )
}

pub fn parse(contents: &str) -> StoreResult<Selection> {
    let mut file = None;
    let mut context = None;
    let mut namespace = None;

    for line in contents.lines() {
        let line = line.trim_end_matches('\r');
        let Some((key, value)) = line.split_once('=') else { continue };
        match key.trim() {
            KUBECONFIG => file = Some(PathBuf::from(value)),
            CONTEXT => context = Some(value.to_string()),
            NAMESPACE => namespace = Some(value.to_string()),
            _ => {}
        }
    }

    let credential_file = file
        .filter(|f| !f.as_os_str().is_empty())
        .ok_or_else(|| StoreError::Parse(format!("selection is missing {KUBECONFIG}")))?;
    let context =
        context.filter(|c| !c.is_empty()).ok_or_else(|| StoreError::Parse(format!("selection is missing {CONTEXT}")))?;
    Ok(Selection { credential_file, context, namespace: namespace.unwrap_or_default() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_three_lines() {
        let sel = Selection {
            credential_file: PathBuf::from("/a/f2"),
            context: "prod".into(),
            namespace: "default".into(),
        };
        assert_eq!(render(&sel), "KUBECONFIG=/a/f2\nCONTEXT=prod\nNAMESPACE=default\n");
    }

    #[test]
    fn parses_regardless_of_line_order() {
        let sel = parse("NAMESPACE=kube-system\nCONTEXT=prod\nKUBECONFIG=/a/f2\n").unwrap();
        assert_eq!(sel.credential_file, PathBuf::from("/a/f2"));
        assert_eq!(sel.context, "prod");
        assert_eq!(sel.namespace, "kube-system");
    }

    #[test]
    fn quoted_names_load_back_unchanged() {
        let sel = Selection {
            credential_file: PathBuf::from("'/a/f2'"),
            context: "\"prod\"".into(),
            namespace: "'web'".into(),
        };
        assert_eq!(parse(&render(&sel)).unwrap(), sel);
    }

    #[test]
    fn shell_syntax_is_kept_as_text() {
        let sel = parse("KUBECONFIG=$(rm -rf /)\nCONTEXT=`id`\nNAMESPACE=a;b\n").unwrap();
        assert_eq!(sel.credential_file, PathBuf::from("$(rm -rf /)"));
        assert_eq!(sel.context, "`id`");
        assert_eq!(sel.namespace, "a;b");
    }

    #[test]
    fn prefixed_keys_do_not_match() {
        let err = parse("export KUBECONFIG=/a/f2\nCONTEXT=prod\n").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn missing_context_is_parse_error() {
        assert!(parse("KUBECONFIG=/a/f2\nNAMESPACE=default\n").is_err());
    }

    #[test]
    fn missing_namespace_defaults_to_empty() {
        let sel = parse("KUBECONFIG=/a/f2\nCONTEXT=prod\n").unwrap();
        assert!(sel.namespace.is_empty());
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let sel = parse("KUBECONFIG=/a/b=c\nCONTEXT=x=y\n").unwrap();
        assert_eq!(sel.credential_file, PathBuf::from("/a/b=c"));
        assert_eq!(sel.context, "x=y");
    }
}
