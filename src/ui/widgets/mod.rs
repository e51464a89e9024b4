//! UI widgets for reusable components.

pub mod accessible_button;

pub use accessible_button::{AccessibleButton, AccessibleButtonStyle, ButtonVariant};
