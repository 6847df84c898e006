// Validated feature matrix plus target vector.

use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
    target: Vec<f64>,
}

impl Dataset {
    /// Fails when there are no rows, when `rows` and `target` differ in
    /// length, or when a row does not have one value per feature name.
    pub fn new(
        feature_names: Vec<String>,
        rows: Vec<Vec<f64>>,
        target: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if rows.len() != target.len() {
            return Err(ModelError::FeatureCountMismatch {
                rows: rows.len(),
                targets: target.len(),
            });
        }
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let expected = feature_names.len();
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(ModelError::RowLengthMismatch { row, expected, found });
        }
        if let Some(bad) = rows.iter().flatten().chain(&target).find(|v| !v.is_finite()) {
            return Err(ModelError::InvalidParameter {
                name: "dataset",
                message: format!("values must be finite, found {bad}"),
            });
        }

        Ok(Dataset {
            feature_names,
            rows,
            target,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    pub fn value(&self, i: usize, feature: usize) -> f64 {
        self.rows[i][feature]
    }

    pub fn target(&self, i: usize) -> f64 {
        self.target[i]
    }
}
