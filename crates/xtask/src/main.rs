use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

/// Crates each workspace member must not depend on.
const FORBIDDEN_DEPS: &[(&str, &[&str])] = &[
    (
        "placebook-domain",
        &[
            "placebook-engine",
            "placebook-shared",
            "sqlx",
            "axum",
            "tokio",
            "tower",
            "tower-http",
            "jsonwebtoken",
            "anyhow",
        ],
    ),
    // Wire types only
    ("placebook-shared", &["placebook-domain", "placebook-engine"]),
];

/// Source paths that must not mention infrastructure crates.
const FORBIDDEN_PATHS: &[(&str, &str)] = &[
    ("crates/domain/src", r"\b(sqlx|axum|tokio|tower_http)::"),
    ("crates/shared/src", r"\bplacebook_(domain|engine)\b"),
    (
        "crates/engine/src/use_cases",
        r"\b(sqlx|axum|jsonwebtoken)::|\bcrate::(api|infrastructure::sqlite)\b",
    ),
];

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
    workspace_root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = check_dependencies(&metadata.packages);
    for (dir, pattern) in FORBIDDEN_PATHS {
        violations.extend(check_sources(&metadata.workspace_root.join(dir), pattern)?);
    }

    if violations.is_empty() {
        println!("arch-check: OK");
        return Ok(());
    }

    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("arch-check failed with {} violation(s)", violations.len())
}

fn check_dependencies(packages: &[Package]) -> Vec<String> {
    let by_name: HashMap<&str, &Package> =
        packages.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut violations = Vec::new();
    for (member, forbidden) in FORBIDDEN_DEPS {
        let Some(package) = by_name.get(member) else {
            violations.push(format!("workspace member {member} not found"));
            continue;
        };
        for dep in &package.dependencies {
            // Dev-dependencies are free to pull in test tooling
            if dep.kind.as_deref() == Some("dev") {
                continue;
            }
            if forbidden.contains(&dep.name.as_str()) {
                violations.push(format!("{member} must not depend on {}", dep.name));
            }
        }
    }
    violations
}

fn check_sources(dir: &Path, pattern: &str) -> anyhow::Result<Vec<String>> {
    let re = regex_lite::Regex::new(pattern).context("compiling arch-check pattern")?;
    let mut violations = Vec::new();

    for path in rust_files(dir)? {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        for (line_no, line) in source.lines().enumerate() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            if let Some(found) = re.find(line) {
                violations.push(format!(
                    "{}:{}: forbidden reference `{}`",
                    path.display(),
                    line_no + 1,
                    found.as_str()
                ));
            }
        }
    }
    Ok(violations)
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(rust_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
