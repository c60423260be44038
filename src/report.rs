use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use indicatif::{HumanBytes, HumanCount};

use crate::duplicates::{DuplicateGroup, ScanSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// `#<index>` header per group followed by its tab-indented members.
    #[default]
    Grouped,
    /// Every member except the first of each group, one per line. Safe to feed
    /// to a deletion tool: one copy of each group always survives.
    DuplicatesOnly,
}

pub fn write_groups<W: Write>(out: &mut W, groups: &[DuplicateGroup], mode: OutputMode) -> io::Result<()> {
    for (index, group) in groups.iter().enumerate() {
        match mode {
            OutputMode::Grouped => {
                writeln!(out, "#{index}")?;
                for path in &group.files {
                    out.write_all(b"\t")?;
                    write_path(out, path)?;
                    out.write_all(b"\n")?;
                }
            }
            OutputMode::DuplicatesOnly => {
                for path in group.files.iter().skip(1) {
                    write_path(out, path)?;
                    out.write_all(b"\n")?;
                }
            }
        }
    }
    Ok(())
}

/// Writes the path's raw bytes, so names that are not valid UTF-8 still
/// name the file on disk.
#[cfg(unix)]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    write!(out, "{}", path.display())
}

/// Paths that are not valid UTF-8 are written lossily.
pub fn write_json<W: Write>(out: &mut W, groups: &[DuplicateGroup]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, groups)?;
    writeln!(out)
}

/// One-line outcome on stderr, kept off stdout so the listing stays clean.
pub fn print_summary(summary: &ScanSummary) {
    if summary.duplicate_groups == 0 {
        eprintln!("{}", "No duplicate files found!".green());
        return;
    }
    eprintln!(
        "{}",
        format!(
            "Found {} duplicate files in {} groups wasting {} of space",
            HumanCount(summary.duplicate_files as u64),
            HumanCount(summary.duplicate_groups as u64),
            HumanBytes(summary.wasted_bytes)
        )
        .yellow()
    );
}
