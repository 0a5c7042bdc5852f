pub mod activity;
pub mod app;
pub mod event;
pub mod render;
pub mod toast;

pub use activity::{ActivityEntry, ActivityLog};
pub use app::App;
pub use event::{Event, EventHandler};
pub use toast::ToastWidget;
