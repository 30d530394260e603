//! File discovery and linting of files on disk

use crate::formatter::FileReport;
use core::error::Error;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use marklint_lib::Linter;
use std::io::{self, Read};
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const MARKDOWN_GLOBS: &[&str] = &["*.md", "*.markdown", "*.mdown", "*.mkd", "*.mkdn", "*.mdwn"];

/// Pattern "dir/path" becomes ["dir/path", "dir/path/**"] so excluding a
/// directory excludes its contents. Glob patterns are returned unchanged.
fn expand_directory_pattern(pattern: &str) -> Vec<String> {
    if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
        return vec![pattern.to_string()];
    }
    let base = pattern.trim_end_matches('/');
    vec![base.to_string(), format!("{base}/**")]
}

fn strip_dot_slash(path: &str) -> String {
    path.strip_prefix("./").unwrap_or(path).to_string()
}

/// Collect the markdown files under `paths`.
///
/// Directories are walked honouring `.gitignore` when `respect_gitignore` is
/// set. Explicitly named files are always linted unless they match an
/// exclude pattern, and a missing path is an error.
pub fn find_markdown_files(
    paths: &[String],
    exclude: &[String],
    respect_gitignore: bool,
) -> Result<Vec<String>, Box<dyn Error>> {
    let first_path = paths.first().cloned().unwrap_or_else(|| ".".to_string());
    let mut walk_builder = WalkBuilder::new(&first_path);
    for path in paths.iter().skip(1) {
        walk_builder.add(path);
    }

    let mut types_builder = ignore::types::TypesBuilder::new();
    types_builder.add_defaults();
    for glob in MARKDOWN_GLOBS {
        types_builder.add("markdown", glob)?;
    }
    types_builder.select("markdown");
    walk_builder.types(types_builder.build()?);

    let exclude_patterns: Vec<String> = exclude.iter().flat_map(|p| expand_directory_pattern(p)).collect();
    log::debug!("Exclude patterns: {exclude_patterns:?}");

    let mut override_builder = OverrideBuilder::new(".");
    for pattern in &exclude_patterns {
        let rule = if pattern.starts_with('!') {
            pattern.clone()
        } else {
            format!("!{pattern}")
        };
        if let Err(e) = override_builder.add(&rule) {
            log::warn!("Invalid exclude pattern '{pattern}': {e}");
        }
    }
    let overrides = override_builder.build()?;
    if !exclude_patterns.is_empty() {
        walk_builder.overrides(overrides.clone());
    }

    walk_builder.ignore(respect_gitignore);
    walk_builder.git_ignore(respect_gitignore);
    walk_builder.git_global(respect_gitignore);
    walk_builder.git_exclude(respect_gitignore);
    walk_builder.parents(respect_gitignore);
    walk_builder.hidden(false);
    walk_builder.require_git(false);
    walk_builder.add_custom_ignore_filename(".marklintignore");

    let mut file_paths = Vec::new();
    let mut walk_directories = false;

    for path_str in paths {
        let path = Path::new(path_str);
        if !path.exists() {
            return Err(format!("File not found: {path_str}").into());
        }
        if path.is_file() {
            let cleaned = strip_dot_slash(path_str);
            if overrides.matched(&cleaned, false).is_ignore() {
                log::debug!("Skipping excluded file: {cleaned}");
                continue;
            }
            file_paths.push(cleaned);
        } else {
            walk_directories = true;
        }
    }

    if walk_directories || paths.is_empty() {
        for result in walk_builder.build() {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file()) {
                        file_paths.push(strip_dot_slash(&entry.path().to_string_lossy()));
                    }
                }
                Err(e) => log::warn!("Error walking directory: {e}"),
            }
        }
    }

    file_paths.sort();
    file_paths.dedup();
    Ok(file_paths)
}

/// Read and lint one file
pub fn lint_file(path: &str, linter: &Linter) -> io::Result<FileReport> {
    let content = std::fs::read_to_string(path)?;
    log::debug!("Linting {path} ({} bytes)", content.len());
    Ok(FileReport {
        file: path.to_string(),
        warnings: linter.lint(&content),
    })
}

/// Lint standard input, reported under the name `<stdin>`
pub fn lint_stdin(linter: &Linter) -> io::Result<FileReport> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(FileReport {
        file: "<stdin>".to_string(),
        warnings: linter.lint(&content),
    })
}

/// Lint every file, in the order given.
///
/// Each entry is either the file's report or the path with the read error.
pub fn lint_files(files: &[String], linter: &Linter) -> Vec<Result<FileReport, (String, io::Error)>> {
    let lint_one = |path: &String| lint_file(path, linter).map_err(|e| (path.clone(), e));

    #[cfg(feature = "parallel")]
    {
        files.par_iter().map(lint_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        files.iter().map(lint_one).collect()
    }
}
