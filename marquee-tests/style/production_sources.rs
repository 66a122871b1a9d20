//! Production Source Checks
//!
//! Production code must not silence dead code warnings and must propagate
//! errors instead of unwrapping them. Everything from the first
//! `#[cfg(test)]` line of a file onward is treated as test code.

use std::fs;
use std::path::{Path, PathBuf};

const PRODUCTION_CRATES: &[&str] = &["marquee-core", "marquee-search", "marquee-cli"];

/// A banned pattern found in production code
#[derive(Debug)]
struct StyleViolation {
    file_path: String,
    line_number: usize,
    rule: &'static str,
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

fn collect_rust_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rust_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns the production part of a source file.
fn production_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(index, line)| (index + 1, line))
}

fn check_source(file_path: &str, content: &str) -> Vec<StyleViolation> {
    let mut violations = Vec::new();

    for (line_number, line) in production_lines(content) {
        let trimmed = line.trim();
        if trimmed.starts_with("//") {
            continue;
        }
        if trimmed.contains("#[allow(") && trimmed.contains("dead_code") {
            violations.push(StyleViolation {
                file_path: file_path.to_string(),
                line_number,
                rule: "dead code allowance",
            });
        }
        if trimmed.contains(".unwrap()") {
            violations.push(StyleViolation {
                file_path: file_path.to_string(),
                line_number,
                rule: "unwrap in production code",
            });
        }
    }

    violations
}

#[test]
fn test_production_sources_follow_style() {
    let root = workspace_root();
    let mut files = Vec::new();
    for krate in PRODUCTION_CRATES {
        collect_rust_files(&root.join(krate).join("src"), &mut files).unwrap();
    }
    assert!(!files.is_empty(), "no sources found under {}", root.display());

    let violations: Vec<_> = files
        .iter()
        .flat_map(|path| {
            let content = fs::read_to_string(path).unwrap();
            check_source(&path.to_string_lossy(), &content)
        })
        .collect();

    for violation in &violations {
        println!(
            "{}:{} {}",
            violation.file_path, violation.line_number, violation.rule
        );
    }
    assert!(
        violations.is_empty(),
        "{} style violation(s) in {} file(s)",
        violations.len(),
        files.len()
    );
}

#[test]
fn test_test_modules_are_exempt() {
    let source = "fn run() -> Option<u8> { None }\n\
                  #[cfg(test)]\n\
                  mod tests { fn t() { run().unwrap(); } }\n";
    assert!(check_source("lib.rs", source).is_empty());
}

#[test]
fn test_violations_are_reported_with_line_numbers() {
    let source = "#[allow(dead_code)]\nfn run() { value().unwrap(); }\n// .unwrap() in a comment\n";
    let violations = check_source("lib.rs", source);

    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].line_number, 1);
    assert_eq!(violations[0].rule, "dead code allowance");
    assert_eq!(violations[1].line_number, 2);
}
