// Read-only views over the canonical table: overview, yearly trends,
// correlations and per-team history.

pub mod correlation;
pub mod overview;
pub mod stats;
pub mod team;
pub mod trends;

pub use correlation::{correlation_matrix, scatter, CorrelationMatrix};
pub use overview::{overview, summarize, summarize_all, MetricSummary, Overview};
pub use team::{compare_with_league, team_profile, ComparisonPoint, TeamProfile};
pub use trends::{league_mean, yearly_means, YearlyMean};
