//! ca-desk: practice desk for an accounting firm
//!
//! Usage:
//!   ca-desk                  - Start the interactive desk
//!   ca-desk --stats [--json] - Print dashboard numbers
//!   ca-desk --export [path]  - Write the client list as CSV
//!   ca-desk --help           - Show help

mod cli;
mod commands;

use std::path::PathBuf;

use ca_core::sample::sample_store;
use ca_core::{DashboardStats, DeskConfig, default_export_file_name, write_clients_csv};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use crate::commands::{Desk, format_stats};

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// Interactive REPL
    Repl,
    /// Print dashboard stats and exit
    Stats { json: bool },
    /// Export clients to CSV and exit
    Export(Option<PathBuf>),
    Help,
    Version,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = parse_args(&args);

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("ca-desk {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let config = DeskConfig::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting ca-desk {}", env!("CARGO_PKG_VERSION"));
    let store = sample_store();

    match mode {
        RunMode::Stats { json } => {
            let stats = DashboardStats::from(&store);
            if json {
                println!("{}", stats.to_json()?);
            } else {
                println!("{}", format_stats(&stats));
            }
            Ok(())
        }
        RunMode::Export(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(default_export_file_name(Utc::now().date_naive())));
            let clients: Vec<_> = store.clients().iter().collect();
            write_clients_csv(&path, &clients)?;
            println!("Exported {} clients to {}", clients.len(), path.display());
            Ok(())
        }
        _ => cli::run_repl(Desk::new(store, config)),
    }
}

/// Parse command line arguments (program name excluded)
fn parse_args(args: &[String]) -> RunMode {
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            "--stats" | "-s" => {
                return RunMode::Stats {
                    json: args.iter().any(|a| a == "--json"),
                };
            }
            "--export" | "-e" => return RunMode::Export(iter.next().map(PathBuf::from)),
            _ => {}
        }
    }

    RunMode::Repl
}

fn print_help() {
    println!("ca-desk - practice desk for an accounting firm");
    println!();
    println!("Usage:");
    println!("  ca-desk                  Start the interactive desk");
    println!("  ca-desk --stats [--json] Print dashboard numbers");
    println!("  ca-desk --export [path]  Write the client list as CSV (default clients_<date>.csv)");
    println!("  ca-desk --help           Show this help message");
    println!("  ca-desk --version        Show version");
    println!();
    println!("Configuration is read from ca-desk.toml in the working directory when present.");
    println!();
    println!("Environment Variables:");
    println!("  CA_DESK_LOGIN_URL        Client portal login URL");
    println!("  CA_DESK_PAGE_SIZE        Clients per page (default: 10)");
    println!("  CA_DESK_INBOX_SORT       date-desc, date-asc, sender or subject (default: date-desc)");
    println!("  CA_DESK_LOG_LEVEL        Log filter when RUST_LOG is unset (default: info)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(&args(&[])), RunMode::Repl);
        assert_eq!(parse_args(&args(&["--stats"])), RunMode::Stats { json: false });
        assert_eq!(parse_args(&args(&["--json", "--stats"])), RunMode::Stats { json: true });
        assert_eq!(parse_args(&args(&["-h", "--stats"])), RunMode::Help);
        assert_eq!(parse_args(&args(&["--export"])), RunMode::Export(None));
        assert_eq!(
            parse_args(&args(&["--export", "out.csv"])),
            RunMode::Export(Some(PathBuf::from("out.csv")))
        );
        assert_eq!(parse_args(&args(&["--unknown"])), RunMode::Repl);
    }
}
