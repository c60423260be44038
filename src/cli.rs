use clap::Parser;
use std::path::PathBuf;

use crate::checksum::FingerprintKind;
use crate::duplicates::FinderConfig;
use crate::report::OutputMode;

#[derive(Parser, Debug)]
#[command(name = "fdup", version)]
#[command(about = "Find groups of duplicate files under one or more directories")]
pub struct Cli {
    /// Directories to scan (default: current directory)
    #[arg(value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Directory to scan; may be repeated
    #[arg(short, long = "directory", value_name = "DIR")]
    pub directories: Vec<PathBuf>,

    /// Skip entries whose full path matches this shell glob; may be repeated
    #[arg(short, long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Exclude zero-byte files
    #[arg(short, long)]
    pub exclude_empty: bool,

    /// List only the duplicates, omitting the first file of every group
    #[arg(short, long, conflicts_with = "json")]
    pub list: bool,

    /// Print scan diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Content fingerprint used before the byte-for-byte comparison
    #[arg(long, value_enum, default_value_t = FingerprintKind::Positional)]
    pub hash: FingerprintKind,

    /// Print the groups as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// `-d` directories first, then positional ones, in command-line order.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.directories.iter().chain(&self.paths).cloned().collect()
    }

    pub fn finder_config(&self) -> FinderConfig {
        let roots = self.roots();
        FinderConfig {
            roots: if roots.is_empty() { vec![PathBuf::from(".")] } else { roots },
            ignore_patterns: self.ignore.clone(),
            exclude_empty: self.exclude_empty,
            fingerprint: self.hash,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.list { OutputMode::DuplicatesOnly } else { OutputMode::Grouped }
    }
}
