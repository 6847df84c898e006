// Placement regression: a training dataset, the estimator/model seam, and a
// seeded random-forest implementation.

pub mod dataset;
pub mod error;
pub mod forest;
pub mod tree;

pub use dataset::Dataset;
pub use error::ModelError;
pub use forest::{ForestParams, RandomForestModel, RandomForestRegressor};

/// A fitted model.
pub trait Regressor {
    /// Predict the target for one feature row, in training column order.
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError>;

    /// (feature name, weight) pairs in training column order. Weights sum to
    /// 1, or are all zero when the model never split.
    fn feature_importances(&self) -> Vec<(String, f64)>;
}

/// Something that can be fitted to a dataset.
pub trait Estimator {
    type Model: Regressor;

    fn fit(&self, data: &Dataset) -> Result<Self::Model, ModelError>;
}

/// Importances sorted by weight, heaviest first. Ties keep column order.
pub fn ranked_importances(model: &impl Regressor) -> Vec<(String, f64)> {
    let mut ranked = model.feature_importances();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
