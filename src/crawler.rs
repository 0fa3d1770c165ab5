use jwalk::{Parallelism, WalkDir};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::error::ScanError;

/// One raw filesystem entry, as handed to the tree builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub total_files: u64,
    pub total_dirs: u64,
    /// Entries jwalk could not read. They are left out of the tree.
    pub skipped_entries: u64,
    pub duration_ms: u128,
}

/// Name based filter applied to every directory listing.
///
/// Names are matched exactly. Hidden names (leading `.`) are dropped unless
/// they appear in `allow_hidden`.
#[derive(Debug, Clone, Default)]
pub struct ExcludeRules {
    exclude: Vec<String>,
    allow_hidden: Vec<String>,
}

impl ExcludeRules {
    pub fn new(exclude: Vec<String>, allow_hidden: Vec<String>) -> Self {
        Self {
            exclude,
            allow_hidden,
        }
    }

    pub fn should_skip(&self, name: &str) -> bool {
        if self.exclude.iter().any(|pattern| pattern == name) {
            return true;
        }
        name.starts_with('.') && !self.allow_hidden.iter().any(|allowed| allowed == name)
    }
}

/// Canonicalize the scan root and make sure it is a readable directory.
///
/// This is the only place a scan can fail outright.
pub fn resolve_root<P: AsRef<Path>>(root: P) -> Result<PathBuf, ScanError> {
    let root = root.as_ref();
    let resolved = fs::canonicalize(root).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ScanError::RootNotFound {
            path: root.to_path_buf(),
        },
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source,
        },
    })?;

    if !resolved.is_dir() {
        return Err(ScanError::NotADirectory { path: resolved });
    }

    fs::read_dir(&resolved).map_err(|source| ScanError::Io {
        path: resolved.clone(),
        source,
    })?;

    Ok(resolved)
}

/// Parallel directory enumerator
pub struct FileCrawler {
    rules: ExcludeRules,
    threads: usize,
}

impl FileCrawler {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            rules: ExcludeRules::new(config.exclude.clone(), config.allow_hidden.clone()),
            threads: Self::processing_parallelism(),
        }
    }

    fn processing_parallelism() -> usize {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        cores.clamp(1, 16)
    }

    /// Walk `root` and return every kept entry below it in pre-order.
    ///
    /// Children of a directory come in name order. Excluded directories are
    /// pruned before they are read. Unreadable subtrees are counted in
    /// `skipped_entries` and otherwise ignored.
    pub fn scan(&self, root: &Path) -> (Vec<ScanEntry>, ScanStats) {
        let start = Instant::now();
        let rules = self.rules.clone();

        let walker = WalkDir::new(root)
            .skip_hidden(false)
            .sort(true)
            .parallelism(Parallelism::RayonNewPool(self.threads))
            .process_read_dir(move |depth, _, _, children| {
                // the root itself comes through with no depth and is never filtered
                if depth.is_none() {
                    return;
                }
                children.retain(|entry| {
                    entry
                        .as_ref()
                        .map(|dir_entry| !rules.should_skip(&dir_entry.file_name().to_string_lossy()))
                        .unwrap_or(true)
                });
            });

        let mut entries = Vec::new();
        let mut stats = ScanStats::default();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry: {err}");
                    stats.skipped_entries += 1;
                    continue;
                }
            };

            if entry.depth == 0 {
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            if is_dir {
                stats.total_dirs += 1;
            } else {
                stats.total_files += 1;
            }

            entries.push(ScanEntry {
                path: entry.path(),
                is_dir,
            });
        }

        stats.duration_ms = start.elapsed().as_millis();
        info!(
            root = %root.display(),
            files = stats.total_files,
            dirs = stats.total_dirs,
            skipped = stats.skipped_entries,
            duration_ms = stats.duration_ms as u64,
            "directory walk finished"
        );

        (entries, stats)
    }
}
