use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use fdup::{Cli, DuplicateFinder, ScanError, print_summary, write_groups, write_json};

/// Exit status after Ctrl-C, as shells report it.
const EXIT_INTERRUPTED: u8 = 130;

fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    pb.set_message("Scanning files...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    fdup::logging::init_logging(cli.verbose).context("Failed to initialize logging")?;

    info!("Starting fdup v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command line arguments: {:?}", cli);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("Failed to install Ctrl-C handler")?;

    let progress = spinner()?;
    let finder = DuplicateFinder::new(cli.finder_config())?
        .with_shutdown_flag(shutdown)
        .with_progress(progress.clone());

    let result = finder.find_duplicates();
    progress.finish_and_clear();
    let (groups, summary) = match result {
        Ok(found) => found,
        Err(ScanError::Interrupted) => {
            warn!("Scan interrupted, no results printed");
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
        Err(err) => return Err(err.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        write_json(&mut out, &groups).context("Failed to write JSON report")?;
    } else {
        write_groups(&mut out, &groups, cli.output_mode()).context("Failed to write report")?;
    }
    out.flush().context("Failed to flush stdout")?;

    print_summary(&summary);
    info!(
        "Completed in {} ({} files scanned, {} hard links skipped)",
        HumanDuration(start_time.elapsed()),
        summary.files_scanned,
        summary.already_visited
    );
    Ok(ExitCode::SUCCESS)
}
