//! Second grouping phase: content fingerprints within one size, followed by a
//! byte-for-byte comparison that splits each fingerprint bucket into classes of
//! identical files.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{debug, warn};

use crate::error::{Result, ScanError};
use crate::pools::{Pool, discard_singletons};
use crate::queue::Queue;

/// Bytes read per chunk. The positional weight restarts at every chunk.
pub const CHUNK_SIZE: usize = 128 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum FingerprintKind {
    /// XOR of each byte weighted by its position in the chunk (fast, weak)
    #[default]
    Positional,
    /// BLAKE3 digest of the whole file
    Blake3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    Positional(u64),
    Blake3([u8; 32]),
}

impl FingerprintKind {
    /// Fingerprint given to files that cannot be read.
    pub fn zero(self) -> Fingerprint {
        match self {
            Self::Positional => Fingerprint::Positional(0),
            Self::Blake3 => Fingerprint::Blake3([0; 32]),
        }
    }
}

/// Fills `buf` as far as the reader allows; a short count means end of input.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub fn positional_checksum<R: Read>(mut reader: R) -> io::Result<u64> {
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut checksum = 0u64;
    loop {
        let bytes_read = read_chunk(&mut reader, &mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        for (position, byte) in (1u64..).zip(&buffer[..bytes_read]) {
            checksum ^= u64::from(*byte).wrapping_mul(position);
        }
    }
    Ok(checksum)
}

pub fn blake3_digest<R: Read>(mut reader: R) -> io::Result<[u8; 32]> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let bytes_read = read_chunk(&mut reader, &mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(*hasher.finalize().as_bytes())
}

fn try_checksum(path: &Path, kind: FingerprintKind) -> io::Result<Fingerprint> {
    let file = File::open(path)?;
    Ok(match kind {
        FingerprintKind::Positional => Fingerprint::Positional(positional_checksum(file)?),
        FingerprintKind::Blake3 => Fingerprint::Blake3(blake3_digest(file)?),
    })
}

/// Fingerprints the file at `path`.
///
/// A file that cannot be read gets [`FingerprintKind::zero`]; the verification
/// pass is what keeps such files out of the results.
pub fn checksum(path: &Path, kind: FingerprintKind) -> Fingerprint {
    match try_checksum(path, kind) {
        Ok(fingerprint) => fingerprint,
        Err(err) => {
            warn!("Failed to read '{}': {}", path.display(), err);
            kind.zero()
        }
    }
}

/// Returns whether two files have identical bytes.
///
/// The error names whichever file could not be read.
pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let read_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ScanError::FileRead { path, source }
    };
    let mut file_a = File::open(a).map_err(read_error(a))?;
    let mut file_b = File::open(b).map_err(read_error(b))?;
    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];
    loop {
        let read_a = read_chunk(&mut file_a, &mut buf_a).map_err(read_error(a))?;
        let read_b = read_chunk(&mut file_b, &mut buf_b).map_err(read_error(b))?;
        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

/// Re-buckets the members of size pools by fingerprint and verifies them.
#[derive(Debug)]
pub struct ChecksumGrouper {
    kind: FingerprintKind,
    fingerprint_pools: usize,
    unreadable: u64,
}

impl ChecksumGrouper {
    pub fn new(kind: FingerprintKind) -> Self {
        Self {
            kind,
            fingerprint_pools: 0,
            unreadable: 0,
        }
    }

    /// Buckets one size pool by fingerprint, dropping single-member buckets.
    ///
    /// Buckets never mix sizes: each call only ever sees one size pool.
    pub fn group(&mut self, pool: Pool<u64>) -> Queue<Pool<Fingerprint>> {
        let size = *pool.key();
        let mut pools: Queue<Pool<Fingerprint>> = Queue::new();
        for path in pool.into_paths() {
            let fingerprint = checksum(&path, self.kind);
            debug!("Checksum of '{}': {:?}", path.display(), fingerprint);
            match pools.find_mut(|candidate| *candidate.key() == fingerprint) {
                Some(bucket) => bucket.push(path),
                None => {
                    let mut bucket = Pool::new(fingerprint);
                    bucket.push(path);
                    pools.push_tail(bucket);
                }
            }
        }
        discard_singletons(&mut pools);
        debug!("Size {}: {} checksum group(s)", size, pools.len());
        self.fingerprint_pools += pools.len();
        pools
    }

    /// Splits `paths` into classes of byte-identical files, keeping only
    /// classes with two or more members.
    ///
    /// Each class keeps discovery order, and classes are ordered by their first
    /// member. Files that cannot be read are dropped.
    pub fn verify(&mut self, paths: Queue<PathBuf>) -> Vec<Queue<PathBuf>> {
        let mut classes = Vec::new();
        let mut pending = paths;
        loop {
            let mut members = pending.into_iter();
            let Some(head) = members.next() else {
                break;
            };
            let mut class = Queue::new();
            let mut rest = Queue::new();
            let mut head_readable = true;
            for candidate in members {
                if !head_readable {
                    rest.push_tail(candidate);
                    continue;
                }
                match same_content(&head, &candidate) {
                    Ok(true) => class.push_tail(candidate),
                    Ok(false) => rest.push_tail(candidate),
                    Err(ScanError::FileRead { path, source }) => {
                        warn!("Failed to read '{}': {}", path.display(), source);
                        self.unreadable += 1;
                        if path == head {
                            head_readable = false;
                            rest.push_tail(candidate);
                        }
                    }
                    Err(err) => warn!("{err}"),
                }
            }
            if head_readable && !class.is_empty() {
                class.push_head(head);
                classes.push(class);
            }
            pending = rest;
        }
        classes
    }

    pub fn fingerprint_pools(&self) -> usize {
        self.fingerprint_pools
    }

    pub fn unreadable(&self) -> u64 {
        self.unreadable
    }
}
