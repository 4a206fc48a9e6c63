//! On-disk layout: one `contextName<TAB>credentialFilePath` record per line.

use std::path::PathBuf;

use super::ContextRecord;

pub fn parse(contents: &str) -> Vec<ContextRecord> {
    let mut records = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, file)) = line.split_once('\t') else {
            tracing::warn!("Skipping malformed registry line {}: {line:?}", idx + 1);
            continue;
        };
        if name.is_empty() || file.is_empty() {
            tracing::warn!("Skipping incomplete registry line {}", idx + 1);
            continue;
        }
        records.push(ContextRecord { context_name: name.to_string(), credential_file: PathBuf::from(file) });
    }
    records
}

pub fn render(records: &[ContextRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.context_name);
        out.push('\t');
        out.push_str(&record.credential_file.to_string_lossy());
        out.push('\n');
    }
    out
}
