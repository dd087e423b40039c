//! Form rendering module
//!
//! - `field_renderer`: field boxes shared by every form
//! - `application_form`: the multi-step application wizard
//! - `review`: the wizard's final, read-only step
//! - `record_form`: login, registration and student record forms

mod application_form;
mod field_renderer;
mod record_form;
mod review;

pub use application_form::draw_application;
pub use record_form::{draw_login, draw_register, draw_student_edit};
