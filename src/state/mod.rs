//! Application state module

mod app_state;
mod export;
mod forms;

pub use app_state::*;
pub use export::students_to_csv;
pub use forms::*;
