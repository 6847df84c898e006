// Command-line surface.

use brasileirao_core::export::ExportFormat;
use brasileirao_core::table::Metric;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "brasileirao")]
#[command(about = "Explore Brasileirão team statistics, one CSV per season")]
pub struct Cli {
    /// Directory holding the season files (overrides `[data] dir`).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Row, team and season counts plus per-metric min/median/max.
    Overview {
        /// Print the whole canonical table instead.
        #[arg(long)]
        raw: bool,
    },
    /// League mean of each metric per season.
    Trends {
        /// Metric column to show; repeatable. Defaults to `[views] trend_metrics`.
        #[arg(long = "metric")]
        metrics: Vec<Metric>,
    },
    /// Correlation of every metric with every other and with the final placement.
    Correlations {
        /// Also list (value, placement) pairs for this metric.
        #[arg(long)]
        scatter: Option<Metric>,
    },
    /// One team's placement history and a metric against the league mean.
    Team {
        /// Team name. Defaults to `[views] default_team`.
        name: Option<String>,
        /// Metric to compare. Defaults to the first trend metric.
        #[arg(long)]
        metric: Option<Metric>,
    },
    /// Predict a final placement from season statistics.
    Predict(PredictArgs),
    /// Write the canonical table to stdout.
    Export {
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
}

/// Metric values for a prediction. Anything left out uses the league median.
#[derive(Debug, Clone, Default, Args)]
pub struct PredictArgs {
    #[arg(long)]
    pub gols: Option<f64>,
    #[arg(long)]
    pub cartao_amarelo: Option<f64>,
    #[arg(long)]
    pub cartao_vermelho: Option<f64>,
    #[arg(long)]
    pub posse_de_bola: Option<f64>,
    #[arg(long)]
    pub passes_certos: Option<f64>,
    #[arg(long)]
    pub disputa_aerea: Option<f64>,
}

impl PredictArgs {
    /// Values in `Metric::ALL` order.
    pub fn overrides(&self) -> [Option<f64>; Metric::COUNT] {
        Metric::ALL.map(|metric| match metric {
            Metric::Gols => self.gols,
            Metric::CartaoAmarelo => self.cartao_amarelo,
            Metric::CartaoVermelho => self.cartao_vermelho,
            Metric::PosseDeBola => self.posse_de_bola,
            Metric::PassesCertos => self.passes_certos,
            Metric::DisputaAerea => self.disputa_aerea,
        })
    }
}
