// Bagged regression trees with a seeded bootstrap.

use crate::dataset::Dataset;
use crate::error::ModelError;
use crate::tree::{RegressionTree, TreeParams};
use crate::{Estimator, Regressor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        ForestParams {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter {
                name: "n_estimators",
                message: "must be > 0".into(),
            });
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter {
                name: "min_samples_split",
                message: format!("must be >= 2, got {}", self.min_samples_split),
            });
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter {
                name: "min_samples_leaf",
                message: "must be > 0".into(),
            });
        }
        if self.max_depth == Some(0) {
            return Err(ModelError::InvalidParameter {
                name: "max_depth",
                message: "must be > 0 when set".into(),
            });
        }
        Ok(())
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RandomForestRegressor {
    params: ForestParams,
}

impl RandomForestRegressor {
    pub fn new(params: ForestParams) -> Self {
        RandomForestRegressor { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }
}

impl Estimator for RandomForestRegressor {
    type Model = RandomForestModel;

    fn fit(&self, data: &Dataset) -> Result<RandomForestModel, ModelError> {
        self.params.validate()?;
        if data.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let n = data.len();
        let tree_params = self.params.tree_params();
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut sample = vec![0; n];

        let trees: Vec<RegressionTree> = (0..self.params.n_estimators)
            .map(|_| {
                for slot in sample.iter_mut() {
                    *slot = rng.random_range(0..n);
                }
                RegressionTree::fit(data, &sample, &tree_params)
            })
            .collect();

        let importances = mean_importances(&trees, data.n_features());
        debug!(
            "fitted {} trees on {} rows x {} features (seed {})",
            trees.len(),
            n,
            data.n_features(),
            self.params.seed
        );

        Ok(RandomForestModel {
            feature_names: data.feature_names().to_vec(),
            trees,
            importances,
        })
    }
}

/// Per-tree decreases normalised to 1, averaged, then normalised again.
/// Trees that never split contribute nothing.
fn mean_importances(trees: &[RegressionTree], n_features: usize) -> Vec<f64> {
    let mut acc = vec![0.0; n_features];
    for tree in trees {
        let decrease = tree.impurity_decrease();
        let total: f64 = decrease.iter().sum();
        if total > 0.0 {
            for (slot, d) in acc.iter_mut().zip(decrease) {
                *slot += d / total;
            }
        }
    }
    let sum: f64 = acc.iter().sum();
    if sum > 0.0 {
        acc.iter_mut().for_each(|v| *v /= sum);
    }
    acc
}

#[derive(Debug, Clone)]
pub struct RandomForestModel {
    feature_names: Vec<String>,
    trees: Vec<RegressionTree>,
    importances: Vec<f64>,
}

impl RandomForestModel {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

impl Regressor for RandomForestModel {
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.feature_names.len() {
            return Err(ModelError::RowLengthMismatch {
                row: 0,
                expected: self.feature_names.len(),
                found: row.len(),
            });
        }
        let total: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        Ok(total / self.trees.len() as f64)
    }

    fn feature_importances(&self) -> Vec<(String, f64)> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.importances.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranked_importances;

    /// Placement driven by goals; the second column is noise.
    fn league() -> Dataset {
        let rows: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![80.0 - 2.0 * i as f64, ((i * 7) % 5) as f64])
            .collect();
        let target = (1..=20).map(f64::from).collect();
        Dataset::new(vec!["gols".into(), "ruido".into()], rows, target).unwrap()
    }

    fn small(n_estimators: usize, seed: u64) -> RandomForestRegressor {
        RandomForestRegressor::new(ForestParams {
            n_estimators,
            seed,
            ..ForestParams::default()
        })
    }

    // -- Parameters --

    #[test]
    fn default_params_match_reference_configuration() {
        let p = ForestParams::default();
        assert_eq!(p.n_estimators, 100);
        assert_eq!(p.seed, 42);
        assert_eq!(p.max_depth, None);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn invalid_params_rejected_at_fit() {
        let err = small(0, 1).fit(&league()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter { name: "n_estimators", .. }));

        let forest = RandomForestRegressor::new(ForestParams {
            min_samples_split: 1,
            ..ForestParams::default()
        });
        assert!(matches!(
            forest.fit(&league()),
            Err(ModelError::InvalidParameter { name: "min_samples_split", .. })
        ));
    }

    // -- Fitting --

    #[test]
    fn same_seed_same_model() {
        let data = league();
        let a = small(10, 7).fit(&data).unwrap();
        let b = small(10, 7).fit(&data).unwrap();
        let row = [61.0, 2.0];
        assert_eq!(a.predict(&row).unwrap(), b.predict(&row).unwrap());
        assert_eq!(a.feature_importances(), b.feature_importances());
    }

    #[test]
    fn prediction_tracks_the_signal() {
        let model = small(25, 42).fit(&league()).unwrap();
        let strong = model.predict(&[78.0, 0.0]).unwrap();
        let weak = model.predict(&[44.0, 0.0]).unwrap();
        assert!(strong < 5.0, "strong = {strong}");
        assert!(weak > 15.0, "weak = {weak}");
    }

    #[test]
    fn importances_sum_to_one_and_rank_signal_first() {
        let model = small(25, 42).fit(&league()).unwrap();
        let total: f64 = model.feature_importances().iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);

        let ranked = ranked_importances(&model);
        assert_eq!(ranked[0].0, "gols");
    }

    #[test]
    fn constant_target_has_zero_importances() {
        let data = Dataset::new(
            vec!["gols".into()],
            vec![vec![1.0], vec![2.0], vec![3.0]],
            vec![4.0, 4.0, 4.0],
        )
        .unwrap();
        let model = small(5, 3).fit(&data).unwrap();
        assert_eq!(model.n_trees(), 5);
        assert_eq!(model.feature_importances(), vec![("gols".to_string(), 0.0)]);
        assert_eq!(model.predict(&[10.0]).unwrap(), 4.0);
    }

    // -- Prediction --

    #[test]
    fn predict_rejects_wrong_row_length() {
        let model = small(3, 1).fit(&league()).unwrap();
        assert_eq!(
            model.predict(&[1.0]),
            Err(ModelError::RowLengthMismatch {
                row: 0,
                expected: 2,
                found: 1
            })
        );
    }
}
