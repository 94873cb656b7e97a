use std::ops::Range;
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use crate::signal::ViewerError;
const TIME_COLUMN: usize = 0;
const COLUMNS: usize = 3;
/// Signal channels plotted against the shared time column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Ppg,
    Ecg,
}
impl Channel {
    fn column(self) -> usize {
        match self {
            Channel::Ppg => 1,
            Channel::Ecg => 2,
        }
    }
    pub fn title(self) -> &'static str {
        match self {
            Channel::Ppg => "PPG Signal",
            Channel::Ecg => "ECG Signal",
        }
    }
}
/// Time-sorted `(time, ppg, ecg)` records, one row per sample.
#[derive(Clone, Debug)]
pub struct WaveformTable {
    rows: Array2<f64>, // rows x [time, ppg, ecg]
}
impl WaveformTable {
    /// Builds a table from row-major `[time, ppg, ecg, time, ppg, ecg, ...]` values.
    pub fn from_flat_rows(values: Vec<f64>) -> Result<Self, ViewerError> {
        let row_count = values.len() / COLUMNS;
        let rows = Array2::from_shape_vec((row_count, COLUMNS), values)?;
        Ok(Self { rows })
    }
    /// Fails with a shape error unless all three columns have the same length.
    pub fn from_columns(
        time: Array1<f64>,
        ppg: Array1<f64>,
        ecg: Array1<f64>,
    ) -> Result<Self, ViewerError> {
        let rows = ndarray::stack(Axis(1), &[time.view(), ppg.view(), ecg.view()])?;
        Ok(Self { rows })
    }
    pub fn len(&self) -> usize {
        self.rows.nrows()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }
    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.rows.column(TIME_COLUMN)
    }
    pub fn channel(&self, channel: Channel) -> ArrayView1<'_, f64> {
        self.rows.column(channel.column())
    }
    /// Row range covering `duration` seconds from `start` at a fixed sampling rate.
    ///
    /// Bounds are rounded to the nearest row (ties to even) and clamped to the
    /// table, so a span past the end of the recording yields a short or empty
    /// range. Negative bounds clamp to row 0.
    pub fn rows_for_span(&self, start: f64, duration: f64, sample_rate_hz: f64) -> Range<usize> {
        let first = (start * sample_rate_hz).round_ties_even();
        let last = (start * sample_rate_hz + duration * sample_rate_hz).round_ties_even();
        self.clamp_rows(to_index(first)..to_index(last))
    }
    /// Rows whose time lies in `[from, to)`, found by binary search on the time column.
    pub fn rows_in_time(&self, from: f64, to: f64) -> Range<usize> {
        let time = self.time();
        let start = lower_bound(time, from);
        let end = lower_bound(time, to).max(start);
        start..end
    }
    /// Cuts all three columns with the same row bounds.
    pub fn slice(&self, rows: Range<usize>) -> ChannelSlice<'_> {
        let rows = self.clamp_rows(rows);
        ChannelSlice {
            time: self.rows.slice(s![rows.clone(), TIME_COLUMN]),
            ppg: self.rows.slice(s![rows.clone(), Channel::Ppg.column()]),
            ecg: self.rows.slice(s![rows, Channel::Ecg.column()]),
        }
    }
    /// Full-signal y-range of a channel; a flat or empty channel gets a unit pad.
    pub fn value_range(&self, channel: Channel) -> (f64, f64) {
        padded_range(self.channel(channel))
    }
    fn clamp_rows(&self, rows: Range<usize>) -> Range<usize> {
        let end = rows.end.min(self.len());
        rows.start.min(end)..end
    }
}
/// Equal-length views of the three columns over one row range.
#[derive(Clone, Debug)]
pub struct ChannelSlice<'a> {
    pub time: ArrayView1<'a, f64>,
    pub ppg: ArrayView1<'a, f64>,
    pub ecg: ArrayView1<'a, f64>,
}
impl<'a> ChannelSlice<'a> {
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
    pub fn values(&self, channel: Channel) -> ArrayView1<'a, f64> {
        match channel {
            Channel::Ppg => self.ppg,
            Channel::Ecg => self.ecg,
        }
    }
    /// `[time, value]` pairs ready for a line plot.
    pub fn points(&self, channel: Channel) -> Vec<[f64; 2]> {
        self.time
            .iter()
            .zip(self.values(channel).iter())
            .map(|(&t, &v)| [t, v])
            .collect()
    }
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let last = self.len().checked_sub(1)?;
        Some((self.time[0], self.time[last]))
    }
    pub fn value_range(&self, channel: Channel) -> (f64, f64) {
        padded_range(self.values(channel))
    }
}
fn padded_range(values: ArrayView1<'_, f64>) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}
fn to_index(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    }
}
/// First index whose value is not less than `target` (numpy `searchsorted`, side left).
fn lower_bound(sorted: ArrayView1<'_, f64>, target: f64) -> usize {
    let (mut lo, mut hi) = (0, sorted.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if sorted[mid] < target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
#[cfg(test)]
mod tests {
    use super::*;
    fn ramp_table(rows: usize, step: f64) -> WaveformTable {
        let time = Array1::from_shape_fn(rows, |i| i as f64 * step);
        let ppg = Array1::from_shape_fn(rows, |i| (i as f64).sin());
        let ecg = Array1::from_shape_fn(rows, |i| i as f64 * 2.0);
        WaveformTable::from_columns(time, ppg, ecg).unwrap()
    }
    #[test]
    fn span_rows_round_to_nearest_sample() {
        let table = ramp_table(1000, 1.0 / 125.0);
        assert_eq!(table.rows_for_span(0.0, 2.0, 125.0), 0..250);
        assert_eq!(table.rows_for_span(1.0, 1.0, 125.0), 125..250);
        assert_eq!(table.rows_for_span(0.0, 0.5, 125.0), 0..62);
        assert_eq!(table.rows_for_span(0.0, 1.5, 1.0), 0..2);
        assert_eq!(table.rows_for_span(0.0, 2.5, 1.0), 0..2);
        assert_eq!(table.rows_for_span(0.5, 3.0, 1.0), 0..4);
    }
    #[test]
    fn negative_start_clamps_to_first_row() {
        let table = ramp_table(100, 1.0 / 125.0);
        assert_eq!(table.rows_for_span(-1.0, 1.5, 125.0), 0..62);
        assert_eq!(table.rows_for_span(-2.0, 1.0, 125.0), 0..0);
    }
    #[test]
    fn span_past_end_is_truncated() {
        let table = ramp_table(100, 1.0 / 125.0);
        assert_eq!(table.rows_for_span(0.0, 10.0, 125.0), 0..100);
        assert_eq!(table.rows_for_span(5.0, 10.0, 125.0), 100..100);
        assert!(table.slice(table.rows_for_span(5.0, 10.0, 125.0)).is_empty());
    }
    #[test]
    fn slice_keeps_channels_aligned() {
        let table = ramp_table(50, 0.5);
        for rows in [0..0, 0..50, 10..20, 45..80, 60..90] {
            let slice = table.slice(rows);
            assert_eq!(slice.time.len(), slice.ppg.len());
            assert_eq!(slice.time.len(), slice.ecg.len());
            assert_eq!(slice.len(), slice.points(Channel::Ecg).len());
        }
        let slice = table.slice(10..20);
        assert_eq!(slice.len(), 10);
        assert_eq!(slice.time[0], 5.0);
        assert_eq!(slice.ecg[0], 20.0);
    }
    #[test]
    fn time_search_is_half_open() {
        let table = ramp_table(200, 0.1);
        let rows = table.rows_in_time(0.0, 10.0);
        assert_eq!(rows, 0..100);
        let slice = table.slice(rows);
        assert!(slice.time.iter().all(|&t| t < 10.0));
        assert_eq!(table.rows_in_time(25.0, 35.0), 200..200);
    }
    #[test]
    fn header_only_file_gives_empty_table() {
        let table = WaveformTable::from_flat_rows(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.rows_for_span(0.0, 10.0, 125.0), 0..0);
        assert!(!ramp_table(1, 1.0).is_empty());
    }
    #[test]
    fn mismatched_columns_are_rejected() {
        let result = WaveformTable::from_columns(
            Array1::zeros(3),
            Array1::zeros(3),
            Array1::zeros(2),
        );
        assert!(matches!(result, Err(ViewerError::Shape(_))));
        assert!(WaveformTable::from_flat_rows(vec![0.0; 7]).is_err());
    }
    #[test]
    fn flat_channel_gets_padded_range() {
        let table = WaveformTable::from_columns(
            Array1::from_vec(vec![0.0, 1.0, 2.0]),
            Array1::zeros(3),
            Array1::from_vec(vec![-3.0, 4.0, 1.0]),
        )
        .unwrap();
        assert_eq!(table.value_range(Channel::Ppg), (-1.0, 1.0));
        assert_eq!(table.value_range(Channel::Ecg), (-3.0, 4.0));
    }
}
