use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("cannot fit a model on an empty training set")]
    EmptyTrainingSet,

    #[error("row {row} has {found} values, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{rows} feature rows but {targets} target values")]
    FeatureCountMismatch { rows: usize, targets: usize },

    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter { name: &'static str, message: String },
}
