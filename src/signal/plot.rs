use std::fs;
use std::io::Cursor;
use std::path::Path;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use crate::signal::error::ViewerError;
use crate::signal::{Channel, ChannelSlice};
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub ecg_color: RGBColor,
    pub ppg_color: RGBColor,
    /// Captions, axis labels and grid. Without them only the traces are drawn.
    pub annotate: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background: WHITE,
            ecg_color: BLUE,
            ppg_color: RED,
            annotate: true,
        }
    }
}
/// Renders the ECG panel above the PPG panel, sharing one time axis.
pub fn render_waveform_png(
    slice: &ChannelSlice<'_>,
    style: &PlotStyle,
) -> Result<Vec<u8>, ViewerError> {
    let Some((t0, t1)) = slice.time_range() else {
        return Err(ViewerError::Plot("waveform window has no samples".into()));
    };
    let x_range = if t1 > t0 { t0..t1 } else { t0 - 0.5..t0 + 0.5 };
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let panels = root.split_evenly((2, 1));
        for (area, channel) in panels.iter().zip([Channel::Ecg, Channel::Ppg]) {
            draw_panel(area, slice, channel, x_range.clone(), style)?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
pub fn export_png(
    slice: &ChannelSlice<'_>,
    style: &PlotStyle,
    path: &Path,
) -> Result<(), ViewerError> {
    let png = render_waveform_png(slice, style)?;
    fs::write(path, png)?;
    Ok(())
}
fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    slice: &ChannelSlice<'_>,
    channel: Channel,
    x_range: std::ops::Range<f64>,
    style: &PlotStyle,
) -> Result<(), ViewerError> {
    let (y_min, y_max) = slice.value_range(channel);
    let color = match channel {
        Channel::Ecg => style.ecg_color,
        Channel::Ppg => style.ppg_color,
    };
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if style.annotate {
        builder
            .caption(channel.title(), ("sans-serif", 20).into_font().color(&BLACK))
            .set_label_area_size(LabelAreaPosition::Left, 55)
            .set_label_area_size(LabelAreaPosition::Bottom, 40);
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_min..y_max)?;
    if style.annotate {
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&BLACK.mix(0.1)).y_desc("Amplitude");
        if channel == Channel::Ppg {
            mesh.x_desc("Time (s)");
        }
        mesh.draw()?;
    }
    let values = slice.values(channel);
    let series = slice.time.iter().copied().zip(values.iter().copied());
    chart.draw_series(LineSeries::new(series, &color))?;
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ViewerError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ViewerError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::WaveformTable;
    use ndarray::Array1;
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    fn plain_style() -> PlotStyle {
        PlotStyle {
            width: 320,
            height: 200,
            annotate: false,
            ..PlotStyle::default()
        }
    }
    #[test]
    fn dual_panel_renders_png() {
        let table = WaveformTable::from_columns(
            Array1::from_shape_fn(250, |i| i as f64 / 125.0),
            Array1::from_shape_fn(250, |i| (i as f64 * 0.05).cos()),
            Array1::from_shape_fn(250, |i| (i as f64 * 0.2).sin()),
        )
        .unwrap();
        let png = render_waveform_png(&table.slice(0..250), &plain_style()).unwrap();
        assert_eq!(png[..8], PNG_SIGNATURE);
    }
    #[test]
    fn single_sample_window_still_renders() {
        let table = WaveformTable::from_flat_rows(vec![1.0, 0.0, 0.5]).unwrap();
        let png = render_waveform_png(&table.slice(0..1), &plain_style()).unwrap();
        assert_eq!(png[..8], PNG_SIGNATURE);
    }
    #[test]
    fn empty_window_is_refused() {
        let table = WaveformTable::from_flat_rows(vec![0.0, 0.0, 0.0]).unwrap();
        let err = render_waveform_png(&table.slice(1..1), &plain_style()).unwrap_err();
        assert!(matches!(err, ViewerError::Plot(_)));
    }
}
