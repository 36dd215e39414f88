use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prism_map::config::{Config, ConfigOverrides, FailurePolicy};
use prism_map::fetch::{HttpFetcher, PageFetcher};
use prism_map::map::restrict_geometry;
use prism_map::output::{
    counties_to_csv, render_county_table, render_json, render_skipped_table, report_to_json,
};
use prism_map::pipeline::{build_county_report, CountyReport};
use prism_map::server::run_server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "prism-map",
    about = "PRISM county membership choropleth dashboard"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// abort or skip when a single county fails to scrape
    #[arg(long = "on-error")]
    on_error: Option<FailurePolicy>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape and print the merged county table
    Scrape,
    /// Scrape, then serve the dashboard
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        on_error: cli.on_error,
        host,
        port,
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }

    let fetcher = HttpFetcher::new(&config.http)?;
    match &cli.command {
        Commands::Scrape => {
            let report = build_county_report(&fetcher, &config).await?;
            report.log_summary();
            print_report(&report, cli.output)?;
        }
        Commands::Serve { .. } => {
            let bind = format!("{}:{}", config.server.host, config.server.port);
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;

            info!("fetching county geometry {}", config.sources.geojson_url);
            let geojson = fetcher
                .fetch_json(&config.sources.geojson_url)
                .await
                .context("failed fetching county geometry")?;
            let report = build_county_report(&fetcher, &config).await?;
            report.log_summary();
            let geometry = restrict_geometry(&geojson, &report.rows)?;
            return run_server(report.rows, geometry, addr).await;
        }
        Commands::Config { .. } => unreachable!("config command handled before dispatch"),
    }

    Ok(())
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &Path,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_report(report: &CountyReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_county_table(&report.rows));
            if !report.skipped.is_empty() {
                println!("{}", render_skipped_table(&report.skipped));
            }
        }
        OutputFormat::Json => println!("{}", report_to_json(report)?),
        OutputFormat::Csv => print!("{}", counties_to_csv(&report.rows)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{handle_config_command, Cli, Commands, OutputFormat};
    use prism_map::config::{Config, FailurePolicy};

    #[test]
    fn parses_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "prism-map",
            "--on-error",
            "abort",
            "serve",
            "--port",
            "9000",
        ])
        .expect("valid args");
        assert_eq!(cli.on_error, Some(FailurePolicy::Abort));
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_scrape_output_format() {
        let cli = Cli::try_parse_from(["prism-map", "-o", "csv", "scrape"]).expect("valid args");
        assert!(matches!(cli.output, OutputFormat::Csv));
        assert!(matches!(cli.command, Commands::Scrape));
    }

    #[test]
    fn config_init_writes_a_loadable_template() {
        let dir = std::env::temp_dir().join(format!("prism-map-init-{}", std::process::id()));
        let path = dir.join("config.toml");
        handle_config_command(true, false, &Config::default(), &path).expect("init");
        let loaded = Config::load(Some(&path)).expect("template loads");
        assert_eq!(loaded.sources.fips_cell_bgcolor, "#9DACD7");
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["prism-map", "--on-error", "retry", "scrape"]).is_err());
    }
}
