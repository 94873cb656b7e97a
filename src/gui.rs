// src/gui.rs
use std::ops::Range;
use std::time::Instant;
use eframe::egui;
use egui::{Color32, Key, Modifiers, RichText};
use egui_plot::{GridInput, GridMark, Line, Plot, PlotBounds, PlotPoints};
use crate::playback::{AnimationClock, Player, SPEED_RANGE};
use crate::signal::{Channel, WaveformTable};
const ECG_COLOR: Color32 = Color32::BLUE;
const PPG_COLOR: Color32 = Color32::RED;
/// Room left above and between the two panels for their titles.
const TITLE_SPACE: f32 = 70.0;
fn channel_color(channel: Channel) -> Color32 {
    match channel {
        Channel::Ecg => ECG_COLOR,
        Channel::Ppg => PPG_COLOR,
    }
}
fn panel_height(ui: &egui::Ui) -> f32 {
    ((ui.available_height() - TITLE_SPACE) / 2.0).max(120.0)
}
fn panel_title(ui: &mut egui::Ui, channel: Channel) {
    ui.label(RichText::new(channel.title()).strong());
}
fn waveform_line(points: Vec<[f64; 2]>, channel: Channel) -> Line {
    Line::new(PlotPoints::new(points))
        .color(channel_color(channel))
        .name(channel.title())
}
/// One fixed window, ECG above PPG, with linked time axes.
pub struct StaticViewerApp {
    ecg: Vec<[f64; 2]>,
    ppg: Vec<[f64; 2]>,
}
impl StaticViewerApp {
    pub fn new(table: &WaveformTable, rows: Range<usize>) -> Self {
        let slice = table.slice(rows);
        Self {
            ecg: slice.points(Channel::Ecg),
            ppg: slice.points(Channel::Ppg),
        }
    }
    fn plot(&self, ui: &mut egui::Ui, channel: Channel, height: f32) {
        let points = match channel {
            Channel::Ecg => self.ecg.clone(),
            Channel::Ppg => self.ppg.clone(),
        };
        let mut plot = Plot::new(channel.title())
            .height(height)
            .link_axis("static_time", true, false)
            .y_axis_label("Amplitude");
        if channel == Channel::Ppg {
            plot = plot.x_axis_label("Time (s)");
        }
        plot.show(ui, |plot_ui| plot_ui.line(waveform_line(points, channel)));
    }
}
impl eframe::App for StaticViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let height = panel_height(ui);
            panel_title(ui, Channel::Ecg);
            self.plot(ui, Channel::Ecg, height);
            panel_title(ui, Channel::Ppg);
            self.plot(ui, Channel::Ppg, height);
        });
    }
}
/// Animated sliding-window viewer.
pub struct PlayerApp {
    title: String,
    player: Player,
    clock: AnimationClock,
}
impl PlayerApp {
    pub fn new(title: String, player: Player, clock: AnimationClock) -> Self {
        Self {
            title,
            player,
            clock,
        }
    }
    /// Keys are consumed before any widget runs, so they act on the player
    /// even while the slider or button has focus.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (space, right, left) = ctx.input_mut(|i| {
            (
                i.consume_key(Modifiers::NONE, Key::Space),
                i.consume_key(Modifiers::NONE, Key::ArrowRight),
                i.consume_key(Modifiers::NONE, Key::ArrowLeft),
            )
        });
        if space {
            self.player.toggle_pause();
        }
        if right {
            self.player.step_forward();
            self.clock.resync(self.player.state().current_frame);
        }
        if left {
            self.player.step_backward();
            self.clock.resync(self.player.state().current_frame);
        }
    }
    fn plot(&self, ui: &mut egui::Ui, channel: Channel, height: f32) {
        let display = self.player.display();
        let (x_min, x_max) = (display.start, display.end);
        let (y_min, y_max) = self.player.y_range(channel);
        let points = self.player.visible().points(channel);
        let mut plot = Plot::new(channel.title())
            .height(height)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .y_axis_label("Amplitude");
        if channel == Channel::Ppg {
            let ticks = display.x_ticks;
            let step_size = display.tick_spacing();
            plot = plot
                .x_axis_label("Time (s)")
                .x_grid_spacer(move |_input: GridInput| {
                    ticks
                        .iter()
                        .map(|&value| GridMark { value, step_size })
                        .collect()
                });
        }
        plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
            plot_ui.line(waveform_line(points, channel));
        });
    }
}
impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        if let Some(frame) = self.clock.poll(Instant::now()) {
            self.player.tick(frame);
        }
        ctx.request_repaint_after(self.clock.interval());
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut speed = self.player.state().play_speed;
                if ui
                    .add(egui::Slider::new(&mut speed, SPEED_RANGE).text("Speed"))
                    .changed()
                {
                    self.player.set_speed(speed);
                }
                ui.add_space(20.0);
                if ui.button("Pause/Play").clicked() {
                    self.player.toggle_pause();
                }
                if self.player.state().is_paused() {
                    ui.label(RichText::new("paused").color(Color32::YELLOW));
                }
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.heading(&self.title));
            let height = panel_height(ui);
            panel_title(ui, Channel::Ecg);
            self.plot(ui, Channel::Ecg, height);
            panel_title(ui, Channel::Ppg);
            self.plot(ui, Channel::Ppg, height);
        });
    }
}
