//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, services reach I/O only through ports, and infra never
//! prints.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and return its non-comment lines that sit before the first
/// `#[cfg(test)]` marker.
fn production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .take_while(|l| !l.contains("#[cfg(test)]"))
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn src_dir(sub: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(sub)
}

fn violations(dir: &str, forbidden: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(&src_dir(dir)) {
        for (i, line) in production_lines(&file).iter().enumerate() {
            for pattern in forbidden {
                if line.contains(pattern) {
                    found.push(format!("{}:{}: {}", file.display(), i + 1, line.trim()));
                }
            }
        }
    }
    found
}

#[test]
fn domain_performs_no_io() {
    let found = violations(
        "domain",
        &["std::fs", "std::process", "crate::infra", "crate::application", "println!"],
    );
    assert!(found.is_empty(), "domain must stay pure:\n{}", found.join("\n"));
}

#[test]
fn services_do_not_import_infra_or_output() {
    let found = violations(
        "application",
        &["crate::infra", "crate::output", "crate::commands", "std::fs"],
    );
    assert!(
        found.is_empty(),
        "services must go through ports:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let found = violations("infra", &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "{}", found.join("\n"));
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let found = violations("infra", &["println!", "eprintln!", "print!("]);
    assert!(found.is_empty(), "infra must not print:\n{}", found.join("\n"));
}

#[test]
fn command_handlers_accept_app_context() {
    for file in collect_rs_files(&src_dir("commands")) {
        if file.file_name().and_then(|n| n.to_str()) == Some("mod.rs") {
            continue;
        }
        let content = std::fs::read_to_string(&file).unwrap_or_default();
        assert!(
            content.contains("pub fn run(app: &AppContext"),
            "{} must expose `run(app: &AppContext, ..)`",
            file.display()
        );
    }
}
