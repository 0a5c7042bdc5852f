pub mod config;
pub mod toast;
pub mod ui;
