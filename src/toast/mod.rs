//! Single-message toast: lifecycle state machine and its supporting types.

pub mod color;
pub mod content;
pub mod controller;
pub mod driver;
pub mod options;
pub mod registry;
pub mod timer;

pub use color::{parse_color, ColorToken, Palette, ToastColor};
pub use content::{Content, Segment};
pub use controller::{
    DisplayState, ToastController, ToastSnapshot, TransitionPhase, DEFAULT_DURATION,
    DEFAULT_TRANSITION_DURATION,
};
pub use driver::{DriverError, ToastHandle};
pub use options::{Category, OpenOptions};
pub use registry::{Registration, RegistryError, ToastRegistry};
pub use timer::{TimerHandle, TimerPurpose, TimerSlot};
