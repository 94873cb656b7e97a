use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use log::info;
use matfile::{MatFile, NumericData};
use ndarray::Array1;
use crate::config::LoaderConfig;
use crate::signal::{ViewerError, WaveformTable};
const TEXT_COLUMNS: usize = 3;
/// Anything that can turn a file on disk into a waveform table.
pub trait WaveformSource {
    fn load(&self, path: &Path) -> Result<WaveformTable, ViewerError>;
    fn format_name(&self) -> &'static str;
}
/// Comma-delimited text with one header row and `time, ppg, ecg` columns.
pub struct DelimitedTextSource {
    delimiter: u8,
}
impl Default for DelimitedTextSource {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}
impl DelimitedTextSource {
    pub fn read_from<R: Read>(&self, reader: R) -> Result<WaveformTable, ViewerError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut values = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let row = idx + 1;
            if record.len() != TEXT_COLUMNS {
                return Err(ViewerError::ColumnCount {
                    row,
                    expected: TEXT_COLUMNS,
                    actual: record.len(),
                });
            }
            for (column, field) in record.iter().enumerate() {
                let value = field.parse::<f64>().map_err(|_| ViewerError::InvalidNumber {
                    row,
                    column,
                    value: field.to_owned(),
                })?;
                values.push(value);
            }
        }
        WaveformTable::from_flat_rows(values)
    }
}
impl WaveformSource for DelimitedTextSource {
    fn load(&self, path: &Path) -> Result<WaveformTable, ViewerError> {
        self.read_from(BufReader::new(File::open(path)?))
    }
    fn format_name(&self) -> &'static str {
        "delimited text"
    }
}
/// MATLAB Level 5 container holding a single ECG lead.
///
/// The first row of the named matrix becomes the ECG column; time is synthesized
/// from a fixed sampling rate and PPG is all zeros, since the container has none.
pub struct MatrixContainerSource {
    variable: String,
    sample_rate_hz: f64,
}
impl MatrixContainerSource {
    pub fn new(variable: impl Into<String>, sample_rate_hz: f64) -> Self {
        Self {
            variable: variable.into(),
            sample_rate_hz,
        }
    }
    pub fn read_from<R: Read>(&self, reader: R) -> Result<WaveformTable, ViewerError> {
        let mat = MatFile::parse(reader).map_err(|e| ViewerError::Mat(format!("{e:?}")))?;
        let array = mat
            .find_by_name(&self.variable)
            .ok_or_else(|| ViewerError::MissingVariable(self.variable.clone()))?;
        let ecg = first_row(array.size(), numeric_values(array.data()));
        let samples = ecg.len();
        let time = Array1::from_shape_fn(samples, |i| i as f64 / self.sample_rate_hz);
        WaveformTable::from_columns(time, Array1::zeros(samples), Array1::from_vec(ecg))
    }
}
impl WaveformSource for MatrixContainerSource {
    fn load(&self, path: &Path) -> Result<WaveformTable, ViewerError> {
        self.read_from(BufReader::new(File::open(path)?))
    }
    fn format_name(&self) -> &'static str {
        "matrix container"
    }
}
/// Picks a decoder from the file extension.
pub fn source_for_path(
    path: &Path,
    config: &LoaderConfig,
) -> Result<Box<dyn WaveformSource>, ViewerError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => Ok(Box::new(DelimitedTextSource::default())),
        Some("mat") => Ok(Box::new(MatrixContainerSource::new(
            config.mat_variable.clone(),
            config.mat_sample_rate,
        ))),
        _ => Err(ViewerError::UnsupportedFormat(path.to_path_buf())),
    }
}
pub fn load_table(path: &Path, config: &LoaderConfig) -> Result<WaveformTable, ViewerError> {
    let source = source_for_path(path, config)?;
    let table = source.load(path)?;
    info!(
        "loaded {} rows of {} from {}",
        table.len(),
        source.format_name(),
        path.display()
    );
    Ok(table)
}
fn numeric_values(data: &NumericData) -> Vec<f64> {
    match data {
        NumericData::Int8 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt8 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int16 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt16 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int32 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::UInt32 { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Int64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::Single { real, .. } => real.iter().map(|&v| f64::from(v)).collect(),
        NumericData::Double { real, .. } => real.clone(),
    }
}
/// Row 0 of a column-major matrix.
fn first_row(size: &[usize], values: Vec<f64>) -> Vec<f64> {
    let rows = size.first().copied().unwrap_or(1).max(1);
    values.into_iter().step_by(rows).collect()
}
