pub mod checksum;
pub mod cli;
pub mod duplicates;
pub mod error;
pub mod ignore;
pub mod inode;
pub mod logging;
pub mod pools;
pub mod queue;
pub mod report;
pub mod set;
pub mod walker;

pub use checksum::{Fingerprint, FingerprintKind};
pub use cli::Cli;
pub use duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig, ScanSummary};
pub use error::{Result, ScanError};
pub use ignore::IgnoreList;
pub use queue::{Queue, QueueError};
pub use report::{OutputMode, print_summary, write_groups, write_json};
pub use set::HashSet;
pub use walker::Walker;
