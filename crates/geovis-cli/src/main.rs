use clap::{Parser, Subcommand};
use geovis_scan::{run_scan, ScanDeps, ScanOptions};

#[derive(Debug, Parser)]
#[command(name = "geovis-cli")]
#[command(about = "AI visibility scanner command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one visibility scan and print the report as pretty JSON.
    Scan {
        /// Domain to scan; full URLs are normalized to the bare hostname.
        domain: String,
        /// Override the per-platform query deadline.
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Ask each platform a single probe instead of two (cheaper, less
        /// signal).
        #[arg(long)]
        single_probe: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            domain,
            timeout_secs,
            single_probe,
        } => run_scan_command(&domain, timeout_secs, single_probe).await,
    }
}

async fn run_scan_command(
    domain: &str,
    timeout_secs: Option<u64>,
    single_probe: bool,
) -> anyhow::Result<()> {
    let config = geovis_core::load_app_config()?;
    let mut deps = ScanDeps::from_config(&config)?;
    if let Some(secs) = timeout_secs {
        deps.platform_timeout_secs = secs;
    }
    tracing::info!(platforms = deps.adapters.len(), "scan engine ready");

    let report = run_scan(&deps, domain, &ScanOptions { single_probe }).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_args_parse() {
        let cli = Cli::try_parse_from([
            "geovis-cli",
            "scan",
            "example.com",
            "--timeout-secs",
            "10",
            "--single-probe",
        ])
        .expect("parse");
        let Commands::Scan {
            domain,
            timeout_secs,
            single_probe,
        } = cli.command;
        assert_eq!(domain, "example.com");
        assert_eq!(timeout_secs, Some(10));
        assert!(single_probe);
    }

    #[test]
    fn scan_requires_a_domain() {
        assert!(Cli::try_parse_from(["geovis-cli", "scan"]).is_err());
    }
}
