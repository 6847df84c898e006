// Configuration loading and parsing (config/dashboard.toml).

use crate::table::Metric;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file at {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("cannot seed config/ from defaults/: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub views: ViewsConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    /// Directory holding the season files, resolved against the base dir.
    pub dir: PathBuf,
    pub file_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewsConfig {
    pub trend_metrics: Vec<Metric>,
    pub default_team: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            n_estimators: default_n_estimators(),
            seed: default_seed(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    /// Log to this file instead of stderr. Resolved against the base dir.
    pub file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    data: DataSection,
    #[serde(default)]
    views: ViewsSection,
    #[serde(default)]
    model: ModelConfig,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    file_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ViewsSection {
    #[serde(default = "default_trend_metrics")]
    trend_metrics: Vec<String>,
    #[serde(default = "default_team")]
    default_team: String,
}

impl Default for ViewsSection {
    fn default() -> Self {
        ViewsSection {
            trend_metrics: default_trend_metrics(),
            default_team: default_team(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    #[serde(default = "default_log_filter")]
    filter: String,
    #[serde(default)]
    file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        LoggingSection {
            filter: default_log_filter(),
            file: None,
        }
    }
}

fn default_file_prefix() -> String {
    "team_statistics_brasileirao".into()
}

fn default_trend_metrics() -> Vec<String> {
    vec!["gols".into(), "posse_de_bola".into(), "disputa_aerea".into()]
}

fn default_team() -> String {
    "Flamengo".into()
}

fn default_n_estimators() -> usize {
    100
}

fn default_seed() -> u64 {
    42
}

fn default_min_samples_split() -> usize {
    2
}

fn default_min_samples_leaf() -> usize {
    1
}

fn default_log_filter() -> String {
    "brasileirao=info,warn".into()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, base_dir).map_err(|e| match e {
        ConfigError::ParseError { source, .. } => ConfigError::ParseError { path, source },
        other => other,
    })
}

/// Parse and validate config text. Relative paths resolve against `base_dir`.
pub fn parse_config(text: &str, base_dir: &Path) -> Result<Config, ConfigError> {
    let file: DashboardFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: PathBuf::from(CONFIG_FILE),
        source: e,
    })?;

    let mut trend_metrics = Vec::with_capacity(file.views.trend_metrics.len());
    for name in &file.views.trend_metrics {
        let metric = name.parse::<Metric>().map_err(|e| ConfigError::ValidationError {
            field: "views.trend_metrics".into(),
            message: e.to_string(),
        })?;
        trend_metrics.push(metric);
    }

    let config = Config {
        data: DataConfig {
            dir: base_dir.join(file.data.dir),
            file_prefix: file.data.file_prefix,
        },
        views: ViewsConfig {
            trend_metrics,
            default_team: file.views.default_team,
        },
        model: file.model,
        logging: LoggingConfig {
            filter: file.logging.filter,
            file: file.logging.file.map(|f| base_dir.join(f)),
        },
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/` from `defaults/`: every default file without a
/// counterpart in `config/` is copied over, `.example` templates excepted.
/// Existing config files are left untouched. Returns the new files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    match (defaults_dir.is_dir(), config_dir.is_dir()) {
        (false, true) => return Ok(Vec::new()),
        (false, false) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "{} has neither defaults/ nor config/; run brasileirao from the \
                     directory that holds defaults/dashboard.toml",
                    base_dir.display()
                ),
            })
        }
        _ => {}
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| copy_error(&config_dir, e))?;

    let mut sources: Vec<PathBuf> = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_error(&defaults_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_none_or(|ext| ext != "example"))
        .collect();
    sources.sort();

    let mut copied = Vec::new();
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if copy_if_absent(&source, &target)? {
            copied.push(target);
        }
    }
    Ok(copied)
}

/// Copy `source` to `target` unless `target` already exists. The existence
/// check and the create are one step (`create_new`).
fn copy_if_absent(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::File::create_new(target) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error(target, e)),
    };
    let mut src = std::fs::File::open(source).map_err(|e| copy_error(source, e))?;
    std::io::copy(&mut src, &mut dest).map_err(|e| copy_error(target, e))?;
    Ok(true)
}

fn copy_error(path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::DefaultsCopyError {
        message: format!("{}: {e}", path.display()),
    }
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config_at(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

/// `load_config_at` for the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_at(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound { path: path.into() })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let prefix = config.data.file_prefix.trim();
    if prefix.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.file_prefix".into(),
            message: "must not be empty".into(),
        });
    }
    if prefix.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError {
            field: "data.file_prefix".into(),
            message: format!("must be a file name prefix, not a path: {prefix}"),
        });
    }

    if config.views.trend_metrics.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "views.trend_metrics".into(),
            message: "must list at least one metric".into(),
        });
    }

    let model = &config.model;
    if model.n_estimators == 0 {
        return Err(ConfigError::ValidationError {
            field: "model.n_estimators".into(),
            message: "must be > 0".into(),
        });
    }
    if model.min_samples_split < 2 {
        return Err(ConfigError::ValidationError {
            field: "model.min_samples_split".into(),
            message: format!("must be >= 2, got {}", model.min_samples_split),
        });
    }
    if model.min_samples_leaf == 0 {
        return Err(ConfigError::ValidationError {
            field: "model.min_samples_leaf".into(),
            message: "must be > 0".into(),
        });
    }
    if model.max_depth == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "model.max_depth".into(),
            message: "must be > 0 when set".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
