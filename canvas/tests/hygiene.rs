//! Hygiene: source-level rules for the editor core, checked at test time.
//!
//! The core runs inside a browser tab. A panic tears down the whole editor,
//! stdout is invisible, and `std::time` is unavailable on wasm32. Each rule
//! has a budget of zero; production sources under `src/` are scanned, test
//! files (`*_test.rs`) are not.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// A forbidden pattern and why it is forbidden.
struct Rule {
    pattern: &'static str,
    reason: &'static str,
}

const PANICS: &[Rule] = &[
    Rule { pattern: ".unwrap()", reason: "propagate or default instead" },
    Rule { pattern: ".expect(", reason: "propagate or default instead" },
    Rule { pattern: "panic!(", reason: "core operations degrade to no-ops" },
    Rule { pattern: "unreachable!(", reason: "core operations degrade to no-ops" },
    Rule { pattern: "todo!(", reason: "stubs do not ship" },
    Rule { pattern: "unimplemented!(", reason: "stubs do not ship" },
];

const SILENT_LOSS: &[Rule] = &[
    Rule { pattern: "let _ =", reason: "inspect or log the value" },
    Rule { pattern: ".ok()", reason: "inspect or log the error" },
    Rule { pattern: "write!(", reason: "build strings with push_str(&format!(..))" },
    Rule { pattern: "writeln!(", reason: "build strings with push_str(&format!(..))" },
];

const HOST_BOUNDARY: &[Rule] = &[
    Rule { pattern: "println!(", reason: "log through tracing" },
    Rule { pattern: "eprintln!(", reason: "log through tracing" },
    Rule { pattern: "dbg!(", reason: "log through tracing" },
    Rule { pattern: "std::time::", reason: "the host supplies the clock" },
    Rule { pattern: "#[allow(dead_code)]", reason: "delete unused code" },
];

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

/// `path:line` for every line containing `pattern`.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(n, _)| format!("  {}:{}", file.path, n + 1))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn check(rules: &[Rule]) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");

    let report: Vec<String> = rules
        .iter()
        .filter_map(|rule| {
            let found = hits(&files, rule.pattern);
            if found.is_empty() {
                None
            } else {
                Some(format!("`{}` ({}):\n{}", rule.pattern, rule.reason, found.join("\n")))
            }
        })
        .collect();

    assert!(report.is_empty(), "hygiene violations:\n{}", report.join("\n"));
}

#[test]
fn no_panics() {
    check(PANICS);
}

#[test]
fn no_silent_loss() {
    check(SILENT_LOSS);
}

#[test]
fn respects_host_boundary() {
    check(HOST_BOUNDARY);
}

#[test]
fn every_module_has_sibling_tests_wired() {
    let files = source_files();
    let unwired: Vec<&str> = files
        .iter()
        .filter(|f| {
            let test_path = f.path.replace(".rs", "_test.rs");
            Path::new(&test_path).exists() && !f.content.contains("#[cfg(test)]")
        })
        .map(|f| f.path.as_str())
        .collect();
    assert!(unwired.is_empty(), "test files exist but are not wired into:\n{}", unwired.join("\n"));
}
