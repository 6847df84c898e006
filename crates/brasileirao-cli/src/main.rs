// Entry point for the brasileirao explorer.

mod cli;
mod predict;
mod render;

use anyhow::{bail, Context};
use brasileirao_core::analysis;
use brasileirao_core::config::{self, Config, LoggingConfig};
use brasileirao_core::export;
use brasileirao_core::ingest::{self, DataSource, LoadOutcome, MemoryCache};
use brasileirao_core::table::CanonicalTable;
use clap::Parser;
use cli::{Cli, Command};
use std::io::Write;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Load config (copies defaults/ into config/ on first run)
    let mut config = config::load_config().context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data.dir = dir;
    }

    // 2. Initialize tracing (stderr unless a log file is configured)
    init_tracing(&config.logging)?;
    info!("brasileirao starting up, data dir {}", config.data.dir.display());

    // 3. Load and reconcile the season files
    let source = DataSource::from_config(&config.data);
    let cache = MemoryCache::new();
    let outcome = ingest::load_cached(&source, &cache)
        .with_context(|| format!("failed to load season files from {}", source.dir.display()))?;
    report_warnings(&outcome);

    // 4. Render the requested view
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli.command, &config, &outcome.table, &mut out)?;
    out.flush().context("failed to flush stdout")?;

    Ok(())
}

fn run(command: &Command, config: &Config, table: &CanonicalTable, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Overview { raw: true } => write!(out, "{}", render::table(table))?,
        Command::Overview { raw: false } => {
            let view = analysis::overview(table);
            let summaries = analysis::summarize_all(table);
            write!(out, "{}", render::overview(&view, &summaries))?;
        }
        Command::Trends { metrics } => {
            let metrics = if metrics.is_empty() {
                &config.views.trend_metrics
            } else {
                metrics
            };
            write!(out, "{}", render::trends(&analysis::yearly_means(table), metrics))?;
        }
        Command::Correlations { scatter } => {
            write!(out, "{}", render::correlations(&analysis::correlation_matrix(table)))?;
            if let Some(metric) = scatter {
                writeln!(out)?;
                write!(out, "{}", render::scatter(*metric, &analysis::scatter(table, *metric)))?;
            }
        }
        Command::Team { name, metric } => {
            let team = pick_team(table, name.as_deref(), &config.views.default_team)?;
            let metric = metric
                .or_else(|| config.views.trend_metrics.first().copied())
                .unwrap_or(brasileirao_core::table::Metric::Gols);
            let Some(profile) = analysis::team_profile(table, &team) else {
                bail!("no seasons recorded for {team}");
            };
            let comparison = analysis::compare_with_league(table, &team, metric);
            write!(out, "{}", render::team(&profile, metric, &comparison))?;
        }
        Command::Predict(args) => {
            let params = predict::forest_params(&config.model);
            let prediction =
                predict::predict(table, params, &args.overrides()).context("failed to train the placement model")?;
            write!(out, "{}", render::prediction(&prediction))?;
        }
        Command::Export { format } => {
            export::write(table, *format, &mut *out).context("failed to export table")?;
        }
    }
    Ok(())
}

/// An explicit name must exist. Without one, the configured default is used
/// when present, otherwise the first team alphabetically.
fn pick_team(table: &CanonicalTable, requested: Option<&str>, default_team: &str) -> anyhow::Result<String> {
    if let Some(name) = requested {
        if table.has_team(name) {
            return Ok(name.to_string());
        }
        bail!("unknown team `{name}`; known teams: {}", table.teams().join(", "));
    }
    if table.has_team(default_team) {
        return Ok(default_team.to_string());
    }
    table
        .teams()
        .first()
        .map(|t| t.to_string())
        .context("table has no teams")
}

fn report_warnings(outcome: &LoadOutcome) {
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match &logging.file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            }
            let log_file = std::fs::File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let subscriber = builder.with_writer(log_file).with_ansi(false).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brasileirao_core::table::{CanonicalRecord, MetricValues};

    fn table() -> CanonicalTable {
        let record = |team: &str, year| CanonicalRecord {
            team: team.into(),
            year,
            metrics: MetricValues::new([50.0, 80.0, 4.0, 50.0, 11000.0, 1500.0]),
            final_position: 3.0,
        };
        CanonicalTable::new(vec![record("Santos", 2016), record("Bahia", 2015)]).unwrap()
    }

    #[test]
    fn explicit_team_must_exist() {
        assert_eq!(pick_team(&table(), Some("Santos"), "Flamengo").unwrap(), "Santos");
        let err = pick_team(&table(), Some("Ceará"), "Flamengo").unwrap_err();
        assert!(err.to_string().contains("Bahia, Santos"));
    }

    #[test]
    fn default_team_used_when_present() {
        assert_eq!(pick_team(&table(), None, "Santos").unwrap(), "Santos");
    }

    #[test]
    fn falls_back_to_first_team_alphabetically() {
        assert_eq!(pick_team(&table(), None, "Flamengo").unwrap(), "Bahia");
    }
}
