//! UI screens for the application.

pub mod describe;
pub mod settings;

pub use describe::{DescribeAction, DescribeScreen};
pub use settings::{SettingsAction, SettingsScreen};
