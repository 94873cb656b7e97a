use std::ops::{Range, RangeInclusive};
use std::time::{Duration, Instant};
use log::debug;
use crate::config::TimeWindow;
use crate::signal::{Channel, ChannelSlice, WaveformTable};
/// Slider range for [`Player::set_speed`], in seconds of signal time per tick.
pub const SPEED_RANGE: RangeInclusive<f64> = 0.1..=3.0;
/// Number of x-axis ticks laid out across the lower panel.
pub const X_TICK_COUNT: usize = 6;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    pub current_frame: usize,
    pub play_speed: f64,
    pub state: PlaybackState,
}
impl ViewerState {
    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }
}
/// Time range and rows currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayWindow {
    pub start: f64,
    pub end: f64,
    pub rows: Range<usize>,
    pub x_ticks: [f64; X_TICK_COUNT],
}
impl DisplayWindow {
    fn new(start: f64, width: f64, rows: Range<usize>) -> Self {
        let step = width / (X_TICK_COUNT - 1) as f64;
        let x_ticks = std::array::from_fn(|i| start + step * i as f64);
        Self {
            start,
            end: start + width,
            rows,
            x_ticks,
        }
    }
    pub fn tick_spacing(&self) -> f64 {
        (self.end - self.start) / (X_TICK_COUNT - 1) as f64
    }
}
/// Sliding-window playback over a loaded recording.
///
/// All mutation goes through `&mut self`, so the GUI loop that owns the player
/// is its only writer.
pub struct Player {
    table: WaveformTable,
    window: TimeWindow,
    state: ViewerState,
    display: DisplayWindow,
    ecg_range: (f64, f64),
    ppg_range: (f64, f64),
}
impl Player {
    pub fn new(table: WaveformTable, window: TimeWindow, play_speed: f64) -> Self {
        let ecg_range = table.value_range(Channel::Ecg);
        let ppg_range = table.value_range(Channel::Ppg);
        let display = DisplayWindow::new(0.0, window.seconds, 0..0);
        Self {
            table,
            window,
            state: ViewerState {
                current_frame: 0,
                play_speed: clamp_speed(play_speed),
                state: PlaybackState::Playing,
            },
            display,
            ecg_range,
            ppg_range,
        }
    }
    pub fn state(&self) -> ViewerState {
        self.state
    }
    pub fn display(&self) -> &DisplayWindow {
        &self.display
    }
    pub fn visible(&self) -> ChannelSlice<'_> {
        self.table.slice(self.display.rows.clone())
    }
    /// Fixed y-limits computed once from the whole recording.
    pub fn y_range(&self, channel: Channel) -> (f64, f64) {
        match channel {
            Channel::Ecg => self.ecg_range,
            Channel::Ppg => self.ppg_range,
        }
    }
    /// Moves the window to `frame`; returns `false` and leaves everything untouched while paused.
    pub fn tick(&mut self, frame: usize) -> bool {
        if self.state.is_paused() {
            return false;
        }
        self.state.current_frame = frame;
        let current_time = frame as f64 * self.state.play_speed;
        let rows = self
            .table
            .rows_in_time(current_time, current_time + self.window.seconds);
        self.display = DisplayWindow::new(current_time, self.window.seconds, rows);
        true
    }
    pub fn toggle_pause(&mut self) {
        self.state.state = match self.state.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => PlaybackState::Playing,
        };
        debug!("playback {:?} at frame {}", self.state.state, self.state.current_frame);
    }
    pub fn set_speed(&mut self, speed: f64) {
        self.state.play_speed = clamp_speed(speed);
        debug!("play speed set to {:.2} s/tick", self.state.play_speed);
    }
    /// Frames that make up roughly one second of signal time; zero above 2 s/tick.
    pub fn frames_per_second(&self) -> usize {
        (1.0 / self.state.play_speed).round() as usize
    }
    pub fn step_forward(&mut self) -> bool {
        self.state.current_frame = self
            .state
            .current_frame
            .saturating_add(self.frames_per_second());
        debug!("step forward to frame {}", self.state.current_frame);
        self.tick(self.state.current_frame)
    }
    pub fn step_backward(&mut self) -> bool {
        self.state.current_frame = self
            .state
            .current_frame
            .saturating_sub(self.frames_per_second());
        debug!("step backward to frame {}", self.state.current_frame);
        self.tick(self.state.current_frame)
    }
}
fn clamp_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        return *SPEED_RANGE.start();
    }
    speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
}
/// Fixed-interval frame counter driving the animation.
///
/// Keeps counting while playback is paused and wraps to frame 0 after
/// `frame_count` frames.
pub struct AnimationClock {
    interval: Duration,
    frame_count: usize,
    frame: usize,
    last_tick: Option<Instant>,
}
impl AnimationClock {
    pub fn new(interval: Duration, frame_count: usize) -> Self {
        Self {
            interval,
            frame_count: frame_count.max(1),
            frame: 0,
            last_tick: None,
        }
    }
    pub fn interval(&self) -> Duration {
        self.interval
    }
    /// Returns the frame to draw if an interval has elapsed since the last tick.
    /// The first poll always fires with frame 0.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                Some(self.frame)
            }
            Some(last) if now.duration_since(last) >= self.interval => {
                self.last_tick = Some(now);
                self.frame = (self.frame + 1) % self.frame_count;
                Some(self.frame)
            }
            Some(_) => None,
        }
    }
    /// Continue counting from `frame` after a manual step.
    pub fn resync(&mut self, frame: usize) {
        self.frame = frame % self.frame_count;
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    fn tenth_second_table(rows: usize) -> WaveformTable {
        let time = Array1::from_shape_fn(rows, |i| i as f64 * 0.1);
        let ppg = Array1::from_shape_fn(rows, |i| (i % 7) as f64);
        let ecg = Array1::from_shape_fn(rows, |i| (i as f64 * 0.3).sin());
        WaveformTable::from_columns(time, ppg, ecg).unwrap()
    }
    fn player() -> Player {
        Player::new(tenth_second_table(200), TimeWindow::new(10.0), 0.2)
    }
    #[test]
    fn first_tick_shows_first_window() {
        let mut player = player();
        assert!(player.tick(0));
        let display = player.display();
        assert_eq!(display.rows, 0..100);
        assert_eq!((display.start, display.end), (0.0, 10.0));
        assert_eq!(display.x_ticks, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let visible = player.visible();
        assert_eq!(visible.len(), 100);
        assert!(visible.time.iter().all(|&t| t < 10.0));
    }
    #[test]
    fn window_slides_with_frame_and_speed() {
        let mut player = player();
        player.set_speed(1.0);
        player.tick(5);
        let display = player.display();
        assert_eq!((display.start, display.end), (5.0, 15.0));
        assert_eq!(display.rows, 50..150);
        assert_eq!(player.state().current_frame, 5);
    }
    #[test]
    fn frames_past_the_recording_give_empty_window() {
        let mut player = player();
        player.set_speed(3.0);
        assert!(player.tick(100));
        assert!(player.visible().is_empty());
        assert_eq!(player.display().start, 300.0);
    }
    #[test]
    fn paused_tick_changes_nothing() {
        let mut player = player();
        player.tick(3);
        let before = player.display().clone();
        player.toggle_pause();
        assert!(!player.tick(40));
        assert_eq!(player.display(), &before);
        assert_eq!(player.state().current_frame, 3);
    }
    #[test]
    fn double_toggle_restores_state() {
        let mut player = player();
        let initial = player.state().state;
        player.toggle_pause();
        assert!(player.state().is_paused());
        player.toggle_pause();
        assert_eq!(player.state().state, initial);
    }
    #[test]
    fn speed_is_clamped_to_slider_range() {
        let mut player = player();
        player.set_speed(10.0);
        assert_eq!(player.state().play_speed, 3.0);
        player.set_speed(0.0);
        assert_eq!(player.state().play_speed, 0.1);
        player.set_speed(0.5);
        assert_eq!(player.state().play_speed, 0.5);
    }
    #[test]
    fn steps_move_about_one_second() {
        let mut player = player();
        assert_eq!(player.frames_per_second(), 5);
        assert!(player.step_forward());
        assert_eq!(player.state().current_frame, 5);
        assert_eq!(player.display().start, 1.0);
        player.step_forward();
        player.step_backward();
        assert_eq!(player.state().current_frame, 5);
    }
    #[test]
    fn fast_speed_steps_in_place() {
        let mut player = player();
        player.set_speed(3.0);
        player.tick(4);
        assert_eq!(player.frames_per_second(), 0);
        assert!(player.step_forward());
        assert_eq!(player.state().current_frame, 4);
        assert!(player.step_backward());
        assert_eq!(player.state().current_frame, 4);
        assert_eq!(player.display().start, 12.0);
    }
    #[test]
    fn step_backward_stops_at_zero() {
        let mut player = player();
        player.step_backward();
        assert_eq!(player.state().current_frame, 0);
        player.tick(2);
        player.step_backward();
        assert_eq!(player.state().current_frame, 0);
        assert_eq!(player.display().start, 0.0);
    }
    #[test]
    fn y_limits_come_from_full_signal() {
        let player = player();
        assert_eq!(player.y_range(Channel::Ppg), (0.0, 6.0));
        let flat = Player::new(
            WaveformTable::from_columns(Array1::zeros(4), Array1::zeros(4), Array1::zeros(4))
                .unwrap(),
            TimeWindow::default(),
            0.2,
        );
        assert_eq!(flat.y_range(Channel::Ppg), (-1.0, 1.0));
    }
    #[test]
    fn clock_fires_once_per_interval_and_wraps() {
        let interval = Duration::from_millis(50);
        let mut clock = AnimationClock::new(interval, 3);
        let start = Instant::now();
        assert_eq!(clock.poll(start), Some(0));
        assert_eq!(clock.poll(start + Duration::from_millis(10)), None);
        assert_eq!(clock.poll(start + interval), Some(1));
        assert_eq!(clock.poll(start + interval * 2), Some(2));
        assert_eq!(clock.poll(start + interval * 3), Some(0));
    }
    #[test]
    fn clock_resync_continues_from_step() {
        let interval = Duration::from_millis(50);
        let mut clock = AnimationClock::new(interval, 100);
        let start = Instant::now();
        clock.poll(start);
        clock.resync(42);
        assert_eq!(clock.poll(start + interval), Some(43));
        clock.resync(250);
        assert_eq!(clock.poll(start + interval * 2), Some(51));
    }
}
