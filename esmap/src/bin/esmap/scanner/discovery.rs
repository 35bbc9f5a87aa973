//! File discovery for finding Rust files containing SearchRecord.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discovered record file with basic metadata
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Path relative to project root
    pub relative_path: String,
}

/// Discover all Rust files under `search_dirs` that might contain SearchRecord derives.
///
/// This is a text check on "SearchRecord"; the parser decides what actually derives it.
pub fn discover_records(project_root: &Path, search_dirs: &[PathBuf]) -> Result<Vec<DiscoveredFile>> {
    let mut discovered = Vec::new();

    for search_path in search_dirs {
        if !search_path.exists() {
            log::debug!("scan directory {} does not exist", search_path.display());
            continue;
        }

        for entry in WalkDir::new(search_path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }

            // Skip hidden files and directories
            let relative = path.strip_prefix(project_root).unwrap_or(path);
            if relative
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
            {
                continue;
            }

            if file_mentions_search_record(path)? {
                discovered.push(DiscoveredFile {
                    path: path.to_path_buf(),
                    relative_path: relative.to_string_lossy().to_string(),
                });
            }
        }
    }

    // Sort by relative path for consistent ordering
    discovered.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    discovered.dedup_by(|a, b| a.path == b.path);

    Ok(discovered)
}

fn file_mentions_search_record(path: &Path) -> Result<bool> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(content.contains("SearchRecord"))
}
