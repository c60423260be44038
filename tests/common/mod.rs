#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fdup::{DuplicateFinder, DuplicateGroup, FinderConfig};
use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the fdup binary.
#[macro_export]
macro_rules! fdup {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("fdup"))
    };
}

/// A temporary directory tree to scan.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` at `relative_path`, creating parent directories.
    pub fn create_file(&self, relative_path: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn config(&self) -> FinderConfig {
        FinderConfig {
            roots: vec![self.path().to_path_buf()],
            ..FinderConfig::default()
        }
    }

    pub fn scan(&self, config: FinderConfig) -> Vec<DuplicateGroup> {
        let finder = DuplicateFinder::new(config).expect("Failed to build finder");
        let (groups, _summary) = finder.find_duplicates().expect("Scan failed");
        groups
    }
}

/// File names of every group, each group sorted, for order-independent checks.
pub fn group_names(groups: &[DuplicateGroup]) -> Vec<Vec<String>> {
    let mut names: Vec<Vec<String>> = groups
        .iter()
        .map(|group| {
            let mut names: Vec<String> = group
                .files
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        })
        .collect();
    names.sort();
    names
}
