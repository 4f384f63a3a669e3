use super::VALUE_SCALE;
use super::geometry::{Geometry, Zone, angle_of};
use super::listener::{CenterClickListener, SeekBarChangeListener};
use super::text::{Frame, Indicator, ProgressText, TextFormat};
use super::tracker::AngularVelocityTracker;
use crate::config::SeekConfig;
use ringctl::geom::Point;
use ringctl::proto::{PointerEvent, PointerPhase};

/// Value after one velocity step. The value moves by how fast the ring is turned,
/// not by where the pointer sits.
///
/// Clamps to `max` first and then to `min`, so an inverted range settles on `min`.
pub fn update_value(
    current: f64,
    min: f64,
    max: f64,
    max_value: f64,
    speed_multiplier: f64,
    angular_velocity: f64,
) -> f64 {
    let value = current + max_value / VALUE_SCALE * angular_velocity * speed_multiplier;
    value.min(max).max(min)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Held off the ring. `tap` drops once the pointer strays beyond the slop.
    Pressed { origin: Point, tap: bool },
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOutcome {
    pub zone: Zone,
    pub progress: f64,
    pub touch_angle: f64,
    pub should_redraw: bool,
}

pub struct SeekBar {
    min_value: f64,
    max_value: f64,
    speed_multiplier: f64,
    progress: f64,
    ring_width_factor: f64,
    enabled: bool,
    show_indicator: bool,
    show_text: bool,
    show_inner_circle: bool,
    progress_text: Option<ProgressText>,
    text_format: TextFormat,
    tap_slop: f64,
    geometry: Option<Geometry>,
    tracker: AngularVelocityTracker,
    gesture: Gesture,
    touch_angle: f64,
    change_listener: Option<Box<dyn SeekBarChangeListener>>,
    center_click_listener: Option<Box<dyn CenterClickListener>>,
}

impl Default for SeekBar {
    fn default() -> Self {
        Self::new(&SeekConfig::default())
    }
}

impl SeekBar {
    pub fn new(config: &SeekConfig) -> Self {
        Self {
            min_value: config.min,
            max_value: config.max,
            speed_multiplier: config.speed_multiplier,
            progress: config.progress,
            ring_width_factor: config.ring_width_factor,
            enabled: config.enabled,
            show_indicator: config.show_indicator,
            show_text: config.show_text,
            show_inner_circle: config.show_inner_circle,
            progress_text: config.progress_text.clone(),
            text_format: config.text_format,
            tap_slop: config.tap_slop,
            geometry: None,
            tracker: AngularVelocityTracker::default(),
            gesture: Gesture::Idle,
            touch_angle: 0.0,
            change_listener: None,
            center_click_listener: None,
        }
    }

    /// Re-applies configuration in place. Progress and the gesture in flight are
    /// left alone, no listener is notified.
    pub fn apply_config(&mut self, config: &SeekConfig) {
        self.min_value = config.min;
        self.max_value = config.max;
        self.speed_multiplier = config.speed_multiplier;
        self.ring_width_factor = config.ring_width_factor;
        self.enabled = config.enabled;
        self.show_indicator = config.show_indicator;
        self.show_text = config.show_text;
        self.show_inner_circle = config.show_inner_circle;
        self.progress_text = config.progress_text.clone();
        self.text_format = config.text_format;
        self.tap_slop = config.tap_slop;
    }

    /// Must be called whenever the host's bounds change. Rebuilds the tracker
    /// around the new center, dropping any samples.
    pub fn configure_geometry(&mut self, width: f64, height: f64) {
        let geometry = Geometry::new(width, height);
        log::debug!(
            "Geometry {}x{}: outer {}, inner {}",
            width,
            height,
            geometry.outer_radius(),
            geometry.inner_radius(self.ring_width_factor)
        );
        self.tracker = AngularVelocityTracker::new(geometry.center());
        self.geometry = Some(geometry);
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry.unwrap_or_default()
    }

    pub fn zone_of(&self, position: Point) -> Zone {
        self.geometry().zone(position, self.ring_width_factor)
    }

    /// Feeds one pointer sample through the gesture state machine. Returns `None`
    /// when the control is disabled and the event was not consumed.
    pub fn on_pointer_event(&mut self, event: PointerEvent) -> Option<PointerOutcome> {
        if !self.enabled {
            return None;
        }

        let position = event.position;
        let zone = self.zone_of(position);
        log::trace!("{} at {:?} in {}", event.phase, position, zone);
        let before = (self.progress, self.touch_angle, self.is_touching());

        match (event.phase, self.gesture) {
            (PointerPhase::Down, gesture) => {
                if gesture == Gesture::Dragging {
                    self.stop_tracking();
                }
                if zone == Zone::Ring {
                    self.start_tracking(event);
                } else {
                    self.tracker.clear();
                    self.gesture = Gesture::Pressed {
                        origin: position,
                        tap: true,
                    };
                }
            }
            // moves keep dragging in any zone
            (PointerPhase::Move, Gesture::Dragging) => self.track_move(event),
            (PointerPhase::Move, Gesture::Pressed { origin, tap }) => {
                if zone == Zone::Ring {
                    self.start_tracking(event);
                } else {
                    self.tracker.clear();
                    self.gesture = Gesture::Pressed {
                        origin,
                        tap: tap && origin.distance_to(position) <= self.tap_slop,
                    };
                }
            }
            (PointerPhase::Move, Gesture::Idle) => {
                if zone != Zone::Ring {
                    self.tracker.clear();
                }
            }
            (PointerPhase::Up | PointerPhase::Cancel, Gesture::Dragging) => self.stop_tracking(),
            (PointerPhase::Up, Gesture::Pressed { origin, tap }) => {
                self.gesture = Gesture::Idle;
                self.tracker.clear();
                if tap && zone == Zone::Inner && origin.distance_to(position) <= self.tap_slop {
                    self.click_center();
                }
            }
            (PointerPhase::Up | PointerPhase::Cancel, _) => {
                self.gesture = Gesture::Idle;
                self.tracker.clear();
            }
        }

        let after = (self.progress, self.touch_angle, self.is_touching());
        Some(PointerOutcome {
            zone,
            progress: self.progress,
            touch_angle: self.touch_angle,
            should_redraw: before != after,
        })
    }

    fn start_tracking(&mut self, event: PointerEvent) {
        log::debug!("Tracking started at {:?}", event.position);
        self.gesture = Gesture::Dragging;
        self.tracker.clear();
        self.tracker.add_movement(event.position, event.timestamp);
        let velocity = self.tracker.angular_velocity();
        self.update_progress(event.position, velocity);

        if let Some(listener) = self.change_listener.as_mut() {
            listener.on_start_tracking_touch();
        }
    }

    fn track_move(&mut self, event: PointerEvent) {
        self.tracker.add_movement(event.position, event.timestamp);
        let velocity = self.tracker.angular_velocity();
        self.update_progress(event.position, velocity);

        if let Some(listener) = self.change_listener.as_mut() {
            listener.on_progress_changed(self.progress, true);
        }
    }

    fn stop_tracking(&mut self) {
        log::debug!("Tracking stopped at {}", self.progress);
        self.gesture = Gesture::Idle;
        self.tracker.clear();

        if let Some(listener) = self.change_listener.as_mut() {
            listener.on_stop_tracking_touch();
        }
    }

    fn click_center(&mut self) {
        log::debug!("Center clicked at {}", self.progress);
        if let Some(listener) = self.center_click_listener.as_mut() {
            listener.on_center_clicked(self.progress);
        }
    }

    fn update_progress(&mut self, position: Point, speed: f64) {
        self.touch_angle = angle_of(position, self.geometry().center());
        self.progress = update_value(
            self.progress,
            self.min_value,
            self.max_value,
            self.max_value,
            self.speed_multiplier,
            speed,
        );
    }

    pub fn set_change_listener(&mut self, listener: Option<Box<dyn SeekBarChangeListener>>) {
        self.change_listener = listener;
    }

    pub fn set_center_click_listener(&mut self, listener: Option<Box<dyn CenterClickListener>>) {
        self.center_click_listener = listener;
    }

    /// Stores `progress` as given, without clamping, and reports it as a host change.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
        if let Some(listener) = self.change_listener.as_mut() {
            listener.on_progress_changed(self.progress, false);
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress becomes `min(min, progress)`: raising the minimum never pulls
    /// progress up, lowering it below progress pulls progress down.
    pub fn set_min_value(&mut self, min: f64) {
        self.min_value = min;
        self.set_progress(min.min(self.progress));
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Progress becomes `max(max, progress)`.
    pub fn set_max_value(&mut self, max: f64) {
        self.max_value = max;
        self.set_progress(max.max(self.progress));
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn set_speed_multiplier(&mut self, speed_multiplier: f64) {
        self.speed_multiplier = speed_multiplier;
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Thickness of the ring relative to the outer radius.
    pub fn set_ring_width_factor(&mut self, factor: f64) {
        self.ring_width_factor = factor;
    }

    pub fn ring_width_factor(&self) -> f64 {
        self.ring_width_factor
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_show_indicator(&mut self, enable: bool) {
        self.show_indicator = enable;
    }

    pub fn is_indicator_enabled(&self) -> bool {
        self.show_indicator
    }

    pub fn set_show_text(&mut self, enable: bool) {
        self.show_text = enable;
    }

    pub fn is_text_enabled(&self) -> bool {
        self.show_text
    }

    pub fn set_show_inner_circle(&mut self, enable: bool) {
        self.show_inner_circle = enable;
    }

    pub fn is_inner_circle_enabled(&self) -> bool {
        self.show_inner_circle
    }

    pub fn set_progress_text(&mut self, text: Option<ProgressText>) {
        self.progress_text = text;
    }

    pub fn progress_text(&self) -> Option<&ProgressText> {
        self.progress_text.as_ref()
    }

    pub fn set_text_format(&mut self, format: TextFormat) {
        self.text_format = format;
    }

    pub fn text_format(&self) -> TextFormat {
        self.text_format
    }

    pub fn set_tap_slop(&mut self, slop: f64) {
        self.tap_slop = slop;
    }

    pub fn tap_slop(&self) -> f64 {
        self.tap_slop
    }

    pub fn touch_angle(&self) -> f64 {
        self.touch_angle
    }

    pub fn is_touching(&self) -> bool {
        self.gesture == Gesture::Dragging
    }

    pub fn frame(&self) -> Frame {
        let geometry = self.geometry();
        let indicator =
            (self.show_indicator && self.is_touching()).then(|| Indicator::at(self.touch_angle));
        let text = match (&self.progress_text, self.show_text && self.geometry.is_some()) {
            (_, false) => None,
            (Some(custom), true) => Some(custom.to_string()),
            (None, true) => Some(self.text_format.format(self.progress)),
        };

        Frame {
            center: geometry.center(),
            outer_radius: geometry.outer_radius(),
            inner_radius: geometry.inner_radius(self.ring_width_factor),
            show_inner_circle: self.show_inner_circle,
            indicator,
            text,
        }
    }
}
