//! The duplicate-detection pipeline: walk every root into size pools, then
//! fingerprint and verify each surviving pool.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{HumanCount, ProgressBar};
use log::info;
use serde::{Serialize, Serializer};

use crate::checksum::{ChecksumGrouper, FingerprintKind};
use crate::error::{Result, ScanError};
use crate::ignore::IgnoreList;
use crate::pools::{Admission, SizeGrouper};
use crate::walker::Walker;

/// Progress message refresh interval, in admitted files.
const PROGRESS_EVERY: u64 = 64;

#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Directories to scan, in order. Empty means the current directory.
    pub roots: Vec<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub exclude_empty: bool,
    pub fingerprint: FingerprintKind,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            ignore_patterns: Vec::new(),
            exclude_empty: false,
            fingerprint: FingerprintKind::default(),
        }
    }
}

/// Files with identical size and content, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub size: u64,
    #[serde(serialize_with = "serialize_paths")]
    pub files: Vec<PathBuf>,
}

/// Serializes paths as strings, replacing invalid UTF-8 with U+FFFD.
fn serialize_paths<S: Serializer>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|path| path.to_string_lossy()))
}

impl DuplicateGroup {
    /// Bytes that would be freed by keeping only the first file.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.files.len() as u64).saturating_sub(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files_scanned: u64,
    pub already_visited: u64,
    pub size_groups: usize,
    pub checksum_groups: usize,
    pub duplicate_groups: usize,
    pub duplicate_files: usize,
    pub wasted_bytes: u64,
    pub unreadable_files: u64,
}

/// Only a newly admitted file moves the counter, so skipped entries never
/// trigger a refresh.
fn refreshes_progress(admission: Admission, files_scanned: u64) -> bool {
    admission == Admission::Added && files_scanned % PROGRESS_EVERY == 0
}

pub struct DuplicateFinder {
    roots: Vec<PathBuf>,
    walker: Walker,
    exclude_empty: bool,
    fingerprint: FingerprintKind,
    shutdown: Option<Arc<AtomicBool>>,
    progress: ProgressBar,
}

impl DuplicateFinder {
    /// Fails with [`ScanError::InvalidPattern`] on a bad ignore glob.
    pub fn new(config: FinderConfig) -> Result<Self> {
        let ignore = IgnoreList::new(config.ignore_patterns)?;
        let roots = if config.roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            config.roots
        };
        Ok(Self {
            roots,
            walker: Walker::new(ignore),
            exclude_empty: config.exclude_empty,
            fingerprint: config.fingerprint,
            shutdown: None,
            progress: ProgressBar::hidden(),
        })
    }

    /// Stops the walk once `flag` is set, failing with [`ScanError::Interrupted`].
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn find_duplicates(&self) -> Result<(Vec<DuplicateGroup>, ScanSummary)> {
        let mut sizes = SizeGrouper::new(self.exclude_empty);
        for root in &self.roots {
            info!("Scanning '{}'", root.display());
            let signal = self.walker.walk(root, |path| {
                if self.is_shutdown_requested() {
                    return ControlFlow::Break(());
                }
                let admission = sizes.add(path);
                if refreshes_progress(admission, sizes.files_scanned()) {
                    self.progress.set_message(format!(
                        "Scanning files... {} scanned",
                        HumanCount(sizes.files_scanned())
                    ));
                }
                ControlFlow::Continue(())
            })?;
            if signal.is_break() {
                return Err(ScanError::Interrupted);
            }
        }

        let mut summary = ScanSummary {
            files_scanned: sizes.files_scanned(),
            already_visited: sizes.already_visited(),
            ..ScanSummary::default()
        };
        let size_pools = sizes.finish();
        summary.size_groups = size_pools.len();
        self.progress.set_message("Comparing contents...");

        let mut checksums = ChecksumGrouper::new(self.fingerprint);
        let mut groups = Vec::new();
        for pool in size_pools {
            if self.is_shutdown_requested() {
                return Err(ScanError::Interrupted);
            }
            let size = *pool.key();
            for bucket in checksums.group(pool) {
                for class in checksums.verify(bucket.into_paths()) {
                    groups.push(DuplicateGroup {
                        size,
                        files: class.into_iter().collect(),
                    });
                }
            }
        }

        summary.checksum_groups = checksums.fingerprint_pools();
        summary.unreadable_files = checksums.unreadable();
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(|g| g.files.len() - 1).sum();
        summary.wasted_bytes = groups.iter().map(DuplicateGroup::wasted_bytes).sum();
        info!("Groups of files with the same checksum: {}", summary.checksum_groups);
        info!("Groups of files with the same content: {}", summary.duplicate_groups);

        Ok((groups, summary))
    }
}
