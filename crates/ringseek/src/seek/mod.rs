pub mod geometry;
pub mod listener;
pub mod model;
pub mod text;
pub mod tracker;

pub use geometry::{Geometry, Zone, angle_of, classify_zone};
pub use listener::{CenterClickListener, SeekBarChangeListener};
pub use model::{PointerOutcome, SeekBar, update_value};
pub use text::{Frame, Indicator, ProgressText, TextFormat};
pub use tracker::AngularVelocityTracker;

pub const WRAP_GUARD_DEGREES: f64 = 20.0; // largest believable rotation between two samples
pub const VALUE_SCALE: f64 = 100.0; // velocity is applied per percent of max
pub const INDICATOR_OFFSET: f64 = -105.0; // arc start relative to the touch angle
pub const INDICATOR_SWEEP: f64 = 30.0;
pub const DEFAULT_TAP_SLOP: f64 = 8.0;
