use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Commits per day for a path touched `count` times in the window
pub fn change_rate(count: u32, window_days: u32) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    count as f64 / window_days as f64
}

/// Per-file commit counts from `git log`
pub struct ChangeHistory {
    root: PathBuf,
    window_days: u32,
}

impl ChangeHistory {
    pub fn new<P: Into<PathBuf>>(root: P, window_days: u32) -> Self {
        Self {
            root: root.into(),
            window_days,
        }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Top level of the repository containing the root, if any
    pub fn repository_root(&self) -> Option<PathBuf> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(["rev-parse", "--show-toplevel"])
            .output();

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(_) => {
                debug!(root = %self.root.display(), "not inside a git repository");
                return None;
            }
            Err(err) => {
                debug!("git is not available: {err}");
                return None;
            }
        };

        let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if toplevel.is_empty() {
            return None;
        }
        let toplevel = PathBuf::from(toplevel);
        Some(fs::canonicalize(&toplevel).unwrap_or(toplevel))
    }

    /// Absolute path → number of commits touching it within the window.
    ///
    /// Empty when the root is not under version control or git fails.
    pub fn commit_counts(&self) -> HashMap<PathBuf, u32> {
        let Some(toplevel) = self.repository_root() else {
            return HashMap::new();
        };

        let output = Command::new("git")
            .arg("-C")
            .arg(&toplevel)
            .arg("log")
            .arg(format!("--since={} days ago", self.window_days))
            .args(["-z", "--name-only", "--pretty=format:"])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let counts = parse_name_only_log(&toplevel, &String::from_utf8_lossy(&output.stdout));
                debug!(
                    repo = %toplevel.display(),
                    paths = counts.len(),
                    window_days = self.window_days,
                    "collected change counts"
                );
                counts
            }
            Ok(output) => {
                warn!(
                    repo = %toplevel.display(),
                    "git log failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                HashMap::new()
            }
            Err(err) => {
                warn!("git log could not be started: {err}");
                HashMap::new()
            }
        }
    }
}

/// NUL-terminated paths relative to the repository top level, unquoted.
/// Empty fields separate commits; some git versions also put a newline
/// before each commit's list.
fn parse_name_only_log(toplevel: &Path, log: &str) -> HashMap<PathBuf, u32> {
    let mut counts = HashMap::new();
    for name in log
        .split('\0')
        .map(|field| field.trim_start_matches('\n'))
        .filter(|field| !field.is_empty())
    {
        *counts.entry(toplevel.join(name)).or_insert(0) += 1;
    }
    counts
}
