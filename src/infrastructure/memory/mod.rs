//! Memory Layer - In-Memory State Management
//!
//! 界面共享状态

mod ui_state;

pub use ui_state::{UiSnapshot, UiState};
