//! Keyed path buckets and the first grouping phase (by byte size).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::{debug, info, trace, warn};

use crate::inode::InodeId;
use crate::queue::Queue;
use crate::set::HashSet;

/// Buckets in the visited set; sized for trees with many files.
const VISITED_BUCKETS: usize = 4093;

/// Paths sharing a key (a byte size, or a fingerprint within one size).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool<K> {
    key: K,
    paths: Queue<PathBuf>,
}

impl<K> Pool<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            paths: Queue::new(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn paths(&self) -> &Queue<PathBuf> {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.paths.push_tail(path);
    }

    pub fn into_paths(self) -> Queue<PathBuf> {
        self.paths
    }
}

/// Drops every pool with fewer than two members. Returns how many went.
pub fn discard_singletons<K>(pools: &mut Queue<Pool<K>>) -> usize {
    pools.delete_where(|pool| pool.len() < 2)
}

/// What [`SizeGrouper::add`] did with a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Added,
    /// Another name for a file already bucketed (hard link, or a symlink to it).
    AlreadyVisited,
    /// Zero-byte file while empty files are excluded.
    Empty,
    /// Not a regular file once links are resolved, or unreadable metadata.
    Skipped,
}

/// Buckets discovered files by byte size, admitting each physical file once.
#[derive(Debug)]
pub struct SizeGrouper {
    pools: Queue<Pool<u64>>,
    index: HashMap<u64, usize>,
    visited: HashSet<InodeId>,
    exclude_empty: bool,
    files_scanned: u64,
    already_visited: u64,
}

impl SizeGrouper {
    pub fn new(exclude_empty: bool) -> Self {
        Self {
            pools: Queue::new(),
            index: HashMap::new(),
            visited: HashSet::with_buckets(VISITED_BUCKETS, InodeId::hash_value, |a, b| a == b),
            exclude_empty,
            files_scanned: 0,
            already_visited: 0,
        }
    }

    pub fn add(&mut self, path: PathBuf) -> Admission {
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Skipping '{}': {}", path.display(), err);
                return Admission::Skipped;
            }
        };
        if !metadata.is_file() {
            debug!("Skipping '{}': not a regular file", path.display());
            return Admission::Skipped;
        }

        let inode = InodeId::from_metadata(&metadata);
        if inode.is_some_and(|id| self.visited.contains(&id)) {
            debug!("File '{}' already visited", path.display());
            self.already_visited += 1;
            return Admission::AlreadyVisited;
        }

        let size = metadata.len();
        if size == 0 && self.exclude_empty {
            trace!("Excluding empty file '{}'", path.display());
            return Admission::Empty;
        }

        match self.index.get(&size).and_then(|&slot| self.pools.get_mut(slot)) {
            Some(pool) => pool.push(path),
            None => {
                let mut pool = Pool::new(size);
                pool.push(path);
                self.index.insert(size, self.pools.len());
                self.pools.push_tail(pool);
            }
        }

        if let Some(id) = inode {
            self.visited.add(id);
        }
        self.files_scanned += 1;
        Admission::Added
    }

    pub fn files_scanned(&self) -> u64 {
        self.files_scanned
    }

    pub fn already_visited(&self) -> u64 {
        self.already_visited
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Ends the phase, keeping only sizes shared by at least two files.
    pub fn finish(self) -> Queue<Pool<u64>> {
        let mut pools = self.pools;
        info!("Files scanned: {}", self.files_scanned);
        let dropped = discard_singletons(&mut pools);
        info!(
            "Groups of files of the same size: {} ({} single-file sizes dropped)",
            pools.len(),
            dropped
        );
        pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_files_bucketed_by_size_in_discovery_order() {
        let dir = TempDir::new().unwrap();
        let mut grouper = SizeGrouper::new(false);
        let a = write(&dir, "a", b"12345");
        let b = write(&dir, "b", b"123");
        let c = write(&dir, "c", b"54321");

        for path in [&a, &b, &c] {
            assert_eq!(grouper.add(path.clone()), Admission::Added);
        }
        assert_eq!(grouper.files_scanned(), 3);
        assert_eq!(grouper.pool_count(), 2);

        let pools = grouper.finish();
        assert_eq!(pools.len(), 1);
        let pool = pools.peek_head().unwrap();
        assert_eq!(*pool.key(), 5);
        assert_eq!(pool.paths().iter().collect::<Vec<_>>(), vec![&a, &c]);
    }

    #[test]
    fn test_singleton_sizes_are_discarded() {
        let dir = TempDir::new().unwrap();
        let mut grouper = SizeGrouper::new(false);
        grouper.add(write(&dir, "a", b"1"));
        grouper.add(write(&dir, "b", b"22"));
        grouper.add(write(&dir, "c", b"333"));

        assert!(grouper.finish().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_hard_link_admitted_once() {
        let dir = TempDir::new().unwrap();
        let original = write(&dir, "a.txt", b"hello");
        let link = dir.path().join("a_link.txt");
        fs::hard_link(&original, &link).unwrap();

        let mut grouper = SizeGrouper::new(false);
        assert_eq!(grouper.add(original), Admission::Added);
        assert_eq!(grouper.add(link), Admission::AlreadyVisited);
        assert_eq!(grouper.files_scanned(), 1);
        assert_eq!(grouper.already_visited(), 1);
        assert!(grouper.finish().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_to_seen_file_is_already_visited() {
        let dir = TempDir::new().unwrap();
        let original = write(&dir, "a.txt", b"hello");
        let link = dir.path().join("a_symlink.txt");
        std::os::unix::fs::symlink(&original, &link).unwrap();

        let mut grouper = SizeGrouper::new(false);
        assert_eq!(grouper.add(original), Admission::Added);
        assert_eq!(grouper.add(link), Admission::AlreadyVisited);
    }

    #[test]
    fn test_empty_files_excluded_when_requested() {
        let dir = TempDir::new().unwrap();
        let mut grouper = SizeGrouper::new(true);
        assert_eq!(grouper.add(write(&dir, "e1", b"")), Admission::Empty);
        assert_eq!(grouper.add(write(&dir, "e2", b"")), Admission::Empty);
        assert_eq!(grouper.files_scanned(), 0);
        assert!(grouper.finish().is_empty());
    }

    #[test]
    fn test_empty_files_kept_by_default() {
        let dir = TempDir::new().unwrap();
        let mut grouper = SizeGrouper::new(false);
        grouper.add(write(&dir, "e1", b""));
        grouper.add(write(&dir, "e2", b""));

        let pools = grouper.finish();
        assert_eq!(pools.len(), 1);
        assert_eq!(*pools.peek_head().unwrap().key(), 0);
    }

    #[test]
    fn test_directories_and_missing_paths_are_skipped() {
        let dir = TempDir::new().unwrap();
        let mut grouper = SizeGrouper::new(false);
        assert_eq!(grouper.add(dir.path().to_path_buf()), Admission::Skipped);
        assert_eq!(grouper.add(dir.path().join("missing")), Admission::Skipped);
        assert_eq!(grouper.files_scanned(), 0);
    }

    #[test]
    fn test_discard_singletons_counts() {
        let mut pools: Queue<Pool<u64>> = Queue::new();
        let mut pair = Pool::new(1);
        pair.push(PathBuf::from("x"));
        pair.push(PathBuf::from("y"));
        let mut single = Pool::new(2);
        single.push(PathBuf::from("z"));
        pools.push_tail(single);
        pools.push_tail(pair);

        assert_eq!(discard_singletons(&mut pools), 1);
        assert_eq!(pools.len(), 1);
        assert_eq!(*pools.peek_head().unwrap().key(), 1);
    }
}
