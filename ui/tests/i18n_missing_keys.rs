use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Translation completeness.
///
/// - every `t!("...")` key used under `src/` exists in the fallback bundle
/// - every other locale defines at least the fallback's keys
/// - no bundle defines a key twice
///
/// Keys are found with a line heuristic (`key = ...` outside comments and attributes); multi-line
/// pattern bodies are not parsed. New locales must be registered in `LOCALES`.
const EN_US: &str = include_str!("../i18n/en-US/wbr-ui.ftl");
const ES_ES: &str = include_str!("../i18n/es-ES/wbr-ui.ftl");

const LOCALES: &[(&str, &str)] = &[("es-ES", ES_ES)];

#[test]
fn all_locales_have_all_fallback_keys() {
    let fallback_keys = extract_keys(EN_US);
    assert!(!fallback_keys.is_empty(), "Fallback (en-US) contains no keys.");
    assert_no_dup_keys(EN_US, "en-US");

    let mut failures = Vec::new();
    for (locale, src) in LOCALES {
        assert_no_dup_keys(src, locale);

        let keys = extract_keys(src);
        let missing: BTreeSet<&String> = fallback_keys
            .iter()
            .filter(|key| !keys.contains(*key))
            .collect();

        if !missing.is_empty() {
            failures.push(format!(
                "Locale {locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing
                    .into_iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n  ")
            ));
        }
    }

    assert!(
        failures.is_empty(),
        "Translation completeness check failed:\n\n{}\n\nHint: copy the missing keys from en-US, then translate.",
        failures.join("\n\n")
    );
}

#[test]
fn every_referenced_key_exists_in_fallback() {
    let fallback_keys = extract_keys(EN_US);
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");

    let referenced = referenced_keys(&src_root);
    assert!(
        referenced.contains("chart-weekly-title"),
        "source scan found no t! keys; did the macro name change?"
    );

    let missing: BTreeSet<&String> = referenced
        .iter()
        .filter(|key| !fallback_keys.contains(*key))
        .collect();
    assert!(
        missing.is_empty(),
        "Keys used in src/ but missing from en-US: {missing:?}"
    );
}

#[test]
fn every_locale_directory_is_registered() {
    let i18n_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("i18n");
    let mut on_disk: Vec<String> = fs::read_dir(&i18n_root)
        .map(|entries| {
            entries
                .flatten()
                .filter(|entry| entry.path().is_dir())
                .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    on_disk.sort();

    let mut registered: Vec<String> = std::iter::once("en-US")
        .chain(LOCALES.iter().map(|(locale, _)| *locale))
        .map(str::to_string)
        .collect();
    registered.sort();

    assert_eq!(on_disk, registered);
}

fn extract_keys(src: &str) -> HashSet<String> {
    src.lines().filter_map(message_key).map(str::to_string).collect()
}

/// Message id defined on this line, if any.
fn message_key(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('.') || line.starts_with('-') {
        return None;
    }
    let (left, _) = line.split_once('=')?;
    let key = left.trim();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(key)
}

fn assert_no_dup_keys(src: &str, locale: &str) {
    let mut seen = HashSet::new();
    let dups: BTreeSet<&str> = src
        .lines()
        .filter_map(message_key)
        .filter(|key| !seen.insert(*key))
        .collect();

    assert!(
        dups.is_empty(),
        "Duplicate key definitions in {locale}: {dups:?}"
    );
}

/// Literal first arguments of every `t!("...")` under `root`.
fn referenced_keys(root: &Path) -> HashSet<String> {
    const NEEDLE: &str = "t!(\"";

    let mut found = HashSet::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(path) = stack.pop() {
        if path.is_dir() {
            if let Ok(entries) = fs::read_dir(&path) {
                stack.extend(entries.flatten().map(|entry| entry.path()));
            }
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };

        let mut rest = content.as_str();
        while let Some(pos) = rest.find(NEEDLE) {
            rest = &rest[pos + NEEDLE.len()..];
            if let Some(end) = rest.find('"') {
                let key = &rest[..end];
                if key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
                    found.insert(key.to_string());
                }
                rest = &rest[end..];
            }
        }
    }

    found
}
