//! # cdrsync CLI
//!
//! Command-line driver for the cdrsync library.

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use dotenv::dotenv;

use cdrsync::cli::{Args, PASSWORD_ENV};
use cdrsync::config::{ExtractConfig, FetchConfig};
use cdrsync::error::CdrSyncError;
use cdrsync::fetch::{self, Fetcher, FtpLogSource};
use cdrsync::output::OutputSinks;
use cdrsync::{extract, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let total_start = Instant::now();
    let args = Args::parse();
    dotenv().ok();

    let level = match args.debug {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("📞 cdrsync v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Stage 1: mirror the remote logs (or reuse what is already staged)
    let staged = if args.offline {
        println!("📂 Staging: {}", args.staging_dir.display());
        println!("⏭️  Offline: skipping FTP fetch");
        println!();
        fetch::stage_existing(&args.staging_dir)?
    } else {
        sync_remote(&args)?
    };

    // Stage 2: extract CDRs into the two artifacts
    let extract_config = ExtractConfig::new().with_output_dir(&args.output_dir);

    println!("🔍 Extracting CDRs from {} staged file(s)...", staged.len());
    let extract_start = Instant::now();
    let mut sinks = OutputSinks::create(&extract_config)?;
    let report = extract::extract_files(&staged, &mut sinks)?;
    println!(
        "   {} record(s), {} malformed payload(s) dropped ({:.2}s)",
        report.records,
        report.malformed,
        extract_start.elapsed().as_secs_f64()
    );

    println!();
    println!("✅ Done! Output saved to {}", args.output_dir.display());

    println!();
    println!("📊 Summary:");
    println!(
        "   Files:    {} processed, {} skipped",
        report.files_processed, report.files_skipped
    );
    println!("   Records:  {}", report.records);
    println!("   Text:     {}", extract_config.text_path().display());
    println!("   CSV:      {}", extract_config.csv_path().display());

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

/// Connects to the configured host and runs one sync pass.
fn sync_remote(args: &Args) -> Result<Vec<PathBuf>> {
    // clap enforces these when --offline is absent
    let host = args
        .host
        .clone()
        .ok_or_else(|| CdrSyncError::invalid_config("host is required"))?;
    let username = args
        .username
        .clone()
        .ok_or_else(|| CdrSyncError::invalid_config("username is required"))?;
    let password = env::var(PASSWORD_ENV).map_err(|_| CdrSyncError::MissingCredential {
        name: PASSWORD_ENV,
    })?;

    let config = FetchConfig::new(host, username, password)
        .with_port(args.port)
        .with_remote_dir(&args.remote_dir)
        .with_lookback_days(args.lookback)
        .with_staging_dir(&args.staging_dir);
    config.validate()?;

    println!("🌐 Host:    {}:{}", config.host, config.port);
    println!("👤 User:    {}", config.username);
    println!("📅 Window:  last {} days", config.lookback_days);
    println!("📂 Staging: {}", config.staging_dir.display());
    println!();

    println!("⏳ Syncing remote logs...");
    let sync_start = Instant::now();
    let mut session = FtpLogSource::connect(&config)?;
    let report = Fetcher::new(config).sync(&mut session)?;
    session.quit();
    println!(
        "   {} downloaded, {} unchanged, {} failed ({:.2}s)",
        report.downloaded,
        report.skipped_unchanged,
        report.failed,
        sync_start.elapsed().as_secs_f64()
    );
    println!();

    Ok(report.staged)
}
