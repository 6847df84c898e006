// Placement prediction from the canonical table.

use brasileirao_core::analysis::summarize;
use brasileirao_core::config::ModelConfig;
use brasileirao_core::table::{CanonicalTable, Metric};
use brasileirao_model::{
    ranked_importances, Dataset, Estimator, ForestParams, ModelError, RandomForestRegressor, Regressor,
};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Raw model output; render with `render::ordinal`.
    pub placement: f64,
    /// The row fed to the model, with defaults filled in.
    pub inputs: Vec<(Metric, f64)>,
    /// (metric column, weight), heaviest first.
    pub importances: Vec<(String, f64)>,
}

pub fn forest_params(model: &ModelConfig) -> ForestParams {
    ForestParams {
        n_estimators: model.n_estimators,
        seed: model.seed,
        max_depth: model.max_depth,
        min_samples_split: model.min_samples_split,
        min_samples_leaf: model.min_samples_leaf,
    }
}

/// Six metrics as features, final placement as target.
pub fn training_set(table: &CanonicalTable) -> Result<Dataset, ModelError> {
    let (rows, target) = table.training_data();
    let names = Metric::ALL.iter().map(|m| m.column().to_string()).collect();
    Dataset::new(names, rows, target)
}

/// Fill unset metrics with the league median.
pub fn input_row(table: &CanonicalTable, overrides: &[Option<f64>; Metric::COUNT]) -> Vec<(Metric, f64)> {
    Metric::ALL
        .into_iter()
        .zip(overrides)
        .map(|(metric, value)| (metric, value.unwrap_or_else(|| summarize(table, metric).median)))
        .collect()
}

pub fn predict(
    table: &CanonicalTable,
    params: ForestParams,
    overrides: &[Option<f64>; Metric::COUNT],
) -> Result<Prediction, ModelError> {
    let data = training_set(table)?;
    let model = RandomForestRegressor::new(params).fit(&data)?;
    info!("trained {} trees on {} seasons of team data", model.n_trees(), data.len());

    let inputs = input_row(table, overrides);
    let row: Vec<f64> = inputs.iter().map(|(_, v)| *v).collect();
    let placement = model.predict(&row)?;

    Ok(Prediction {
        placement,
        inputs,
        importances: ranked_importances(&model),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use brasileirao_core::table::{CanonicalRecord, MetricValues};

    fn table() -> CanonicalTable {
        let records = (0..10)
            .map(|i| CanonicalRecord {
                team: format!("Time {i}"),
                year: 2016,
                metrics: MetricValues::new([70.0 - 3.0 * i as f64, 80.0, 4.0, 50.0, 11000.0, 1500.0]),
                final_position: f64::from(i + 1),
            })
            .collect();
        CanonicalTable::new(records).unwrap()
    }

    fn params() -> ForestParams {
        ForestParams {
            n_estimators: 20,
            ..ForestParams::default()
        }
    }

    #[test]
    fn params_follow_config() {
        let config = ModelConfig {
            n_estimators: 7,
            seed: 9,
            max_depth: Some(4),
            min_samples_split: 3,
            min_samples_leaf: 2,
        };
        let p = forest_params(&config);
        assert_eq!(p.n_estimators, 7);
        assert_eq!(p.seed, 9);
        assert_eq!(p.max_depth, Some(4));
        assert_eq!(p.min_samples_split, 3);
        assert_eq!(p.min_samples_leaf, 2);
    }

    #[test]
    fn unset_inputs_default_to_median() {
        let mut overrides = [None; Metric::COUNT];
        overrides[Metric::Gols.index()] = Some(66.0);
        let row = input_row(&table(), &overrides);
        assert_eq!(row[Metric::Gols.index()], (Metric::Gols, 66.0));
        assert_eq!(row[Metric::PassesCertos.index()], (Metric::PassesCertos, 11000.0));
    }

    #[test]
    fn more_goals_predicts_better_placement() {
        let table = table();
        let mut strong = [None; Metric::COUNT];
        strong[Metric::Gols.index()] = Some(70.0);
        let mut weak = [None; Metric::COUNT];
        weak[Metric::Gols.index()] = Some(43.0);

        let strong = predict(&table, params(), &strong).unwrap();
        let weak = predict(&table, params(), &weak).unwrap();
        assert!(strong.placement < weak.placement);
        assert_eq!(strong.importances[0].0, "gols");
    }

    #[test]
    fn same_seed_is_reproducible() {
        let overrides = [None; Metric::COUNT];
        let a = predict(&table(), params(), &overrides).unwrap();
        let b = predict(&table(), params(), &overrides).unwrap();
        assert_eq!(a, b);
    }
}
