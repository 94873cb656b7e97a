use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: expected {expected} columns, got {actual}")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row}, column {column}: `{value}` is not a number")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },
    #[error("failed to parse matrix container: {0}")]
    Mat(String),
    #[error("matrix container has no variable named `{0}`")]
    MissingVariable(String),
    #[error("unsupported waveform file: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("waveform table shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ViewerError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ViewerError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ViewerError {
    fn from(value: image::ImageError) -> Self {
        ViewerError::Plot(value.to_string())
    }
}
