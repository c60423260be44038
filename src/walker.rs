//! Depth-first directory walk with ignore filtering.
//!
//! Symbolic links are never followed below the root: a link to a directory is
//! reported as a leaf like any other non-directory entry. Entries matching the
//! ignore list are dropped before anything else happens to them, and a matching
//! directory is not descended into. Entry order is whatever the filesystem
//! returns and must not be assumed sorted.

use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, ScanError};
use crate::ignore::IgnoreList;

#[derive(Debug, Clone, Default)]
pub struct Walker {
    ignore: IgnoreList,
}

impl Walker {
    pub fn new(ignore: IgnoreList) -> Self {
        Self { ignore }
    }

    /// Lazily lists the non-directory entries under `root`.
    ///
    /// The first error ends the sequence; nothing is yielded after it.
    pub fn files(&self, root: &Path) -> Files<'_> {
        Files {
            entries: WalkDir::new(root).follow_links(false).into_iter(),
            ignore: &self.ignore,
            finished: false,
        }
    }

    /// Feeds every file under `root` to `visit`.
    ///
    /// A `Break` from `visit` abandons the rest of the walk and is returned
    /// as-is. Directory open failures anywhere in the tree abort the walk.
    pub fn walk<B, F>(&self, root: &Path, mut visit: F) -> Result<ControlFlow<B>>
    where
        F: FnMut(PathBuf) -> ControlFlow<B>,
    {
        for path in self.files(root) {
            if let ControlFlow::Break(signal) = visit(path?) {
                debug!("Walk of '{}' stopped early", root.display());
                return Ok(ControlFlow::Break(signal));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

pub struct Files<'a> {
    entries: walkdir::IntoIter,
    ignore: &'a IgnoreList,
    finished: bool,
}

impl Iterator for Files<'_> {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(walk_error(err)));
                }
            };
            let is_dir = entry.file_type().is_dir();

            if entry.depth() == 0 {
                if is_dir {
                    continue;
                }
                self.finished = true;
                return Some(Err(ScanError::DirectoryOpen {
                    path: entry.into_path(),
                    source: io::Error::from(io::ErrorKind::NotADirectory),
                }));
            }

            if self.ignore.matches(entry.path()) {
                trace!("Ignoring '{}'", entry.path().display());
                if is_dir {
                    self.entries.skip_current_dir();
                }
                continue;
            }
            if is_dir {
                continue;
            }
            return Some(Ok(entry.into_path()));
        }
    }
}

fn walk_error(err: walkdir::Error) -> ScanError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    match err.into_io_error() {
        Some(source) => ScanError::DirectoryOpen { path, source },
        None => ScanError::Io {
            path,
            source: io::Error::other("filesystem loop detected"),
        },
    }
}
