//! Form domain layer
//!
//! The application wizard with its typed draft and per-step validators, and
//! the smaller record forms (login, registration, student edit).

mod draft;
mod field;
mod form_state;
mod validation;
mod wizard;

pub use draft::{ApplicationDraft, DraftField, FieldKind, Step};
pub use field::{FieldValue, FormField};
pub use form_state::{FieldForm, Form, FormState, LoginForm, RegisterForm, StudentEditForm};
pub use wizard::{ApplicationWizard, WizardButton};

#[cfg(test)]
pub use draft::FileAttachment;
