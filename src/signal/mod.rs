// src/signal/mod.rs
pub mod error;
pub mod plot;
pub mod source;
pub mod table;
pub use error::ViewerError;
pub use plot::{export_png, PlotStyle};
pub use source::load_table;
pub use table::{Channel, ChannelSlice, WaveformTable};
