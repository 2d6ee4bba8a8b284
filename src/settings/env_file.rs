use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::Result;

const ADDED_HEADER: &str = "# Added by Settings UI";

fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '#' | '$' | '\\'))
}

fn encode_line(key: &str, value: &str) -> String {
    if !needs_quotes(value) {
        return format!("{}={}", key, value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '"' | '\\' | '$' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    format!("{}=\"{}\"", key, escaped)
}

fn decode_value(raw: &str) -> String {
    let raw = raw.trim();

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        let inner = &raw[1..raw.len() - 1];
        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                value.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => value.push('\n'),
                Some(other) => value.push(other),
                None => value.push('\\'),
            }
        }
        return value;
    }

    raw.to_string()
}

/// Splits `KEY=VALUE`, ignoring blank lines and comments.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    Some((key.trim(), value))
}

pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        tracing::warn!(".env file not found at {}", path.display());
        return Ok(HashMap::new());
    }

    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .filter_map(parse_line)
        .map(|(key, value)| (key.to_string(), decode_value(value)))
        .collect())
}

/// Rewrites `path` with `updates` applied. Comments, blank lines and
/// untouched keys keep their original text; unseen keys are appended
/// in sorted order.
pub fn write_env_file(path: &Path, updates: &BTreeMap<String, String>) -> Result<()> {
    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut lines: Vec<String> = Vec::new();
    let mut written = HashSet::new();

    for line in existing.lines() {
        match parse_line(line) {
            Some((key, _)) if updates.contains_key(key) => {
                let value = &updates[key];
                lines.push(encode_line(key, value));
                written.insert(key.to_string());
            }
            _ => lines.push(line.to_string()),
        }
    }

    let fresh: Vec<(&String, &String)> = updates
        .iter()
        .filter(|(key, _)| !written.contains(key.as_str()))
        .collect();

    if !fresh.is_empty() {
        lines.push(String::new());
        lines.push(ADDED_HEADER.to_string());
        for (key, value) in fresh {
            lines.push(encode_line(key, value));
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    fs::write(path, output)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn updates(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let values = read_env_file(&dir.path().join(".env")).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_read_skips_comments_and_strips_quotes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# comment\n\nPORT=8080\nNAME=\"hello world\"\nSINGLE='x y'\nnot a pair\n",
        )
        .unwrap();

        let values = read_env_file(&path).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values["PORT"], "8080");
        assert_eq!(values["NAME"], "hello world");
        assert_eq!(values["SINGLE"], "x y");
    }

    #[test]
    fn test_write_preserves_layout_and_appends_sorted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# server\nPORT=8080\n\nOTHER=keep\n").unwrap();

        write_env_file(
            &path,
            &updates(&[("ZETA", "1"), ("PORT", "9090"), ("ALPHA", "2")]),
        )
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "# server\nPORT=9090\n\nOTHER=keep\n\n# Added by Settings UI\nALPHA=2\nZETA=1\n"
        );
    }

    #[test]
    fn test_special_values_survive_a_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let tricky = r#"pa ss"w$rd\#1"#;

        write_env_file(&path, &updates(&[("SECRET_KEY", tricky), ("EMPTY", "")])).unwrap();

        let values = read_env_file(&path).unwrap();
        assert_eq!(values["SECRET_KEY"], tricky);
        assert_eq!(values["EMPTY"], "");
    }

    #[test]
    fn test_write_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");

        write_env_file(&path, &updates(&[("PORT", "1")])).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\n# Added by Settings UI\nPORT=1\n"
        );
    }
}
