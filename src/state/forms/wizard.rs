//! Multi-step application wizard
//!
//! Owns the draft and the current step. Steps borrow the draft through the
//! wizard's setters, so the wizard is its single writer.

use super::draft::{ApplicationDraft, DraftField, FieldKind, FileAttachment, Step};
use super::form_state::Form;
use super::validation::{validate_step, ErrorMap};
use crate::api::SubmissionPayload;
use std::collections::BTreeMap;

/// Buttons on the wizard's action row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardButton {
    Back,
    Next,
}

#[derive(Debug, Clone)]
pub struct ApplicationWizard {
    draft: ApplicationDraft,
    step: Step,
    errors: ErrorMap,
    pub active_field_index: usize,
    /// Which button is selected when on the buttons row (0=Back, 1=Next/Submit)
    pub selected_button: usize,
    /// Typed paths for file fields of the current step
    file_inputs: BTreeMap<DraftField, String>,
}

impl ApplicationWizard {
    pub fn new() -> Self {
        Self {
            draft: ApplicationDraft::new(),
            step: Step::Personal,
            errors: ErrorMap::new(),
            active_field_index: 0,
            selected_button: 1,
            file_inputs: BTreeMap::new(),
        }
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn fields(&self) -> &'static [DraftField] {
        self.step.fields()
    }

    /// Field under the cursor; `None` on the buttons row
    pub fn active_field(&self) -> Option<DraftField> {
        self.fields().get(self.active_field_index).copied()
    }

    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index >= self.fields().len()
    }

    pub fn selected_button(&self) -> WizardButton {
        if self.selected_button == 0 {
            WizardButton::Back
        } else {
            WizardButton::Next
        }
    }

    pub fn toggle_button(&mut self) {
        self.selected_button = 1 - self.selected_button.min(1);
    }

    /// Path typed for a file field, or the attached file's path
    pub fn file_input(&self, field: DraftField) -> &str {
        self.file_inputs
            .get(&field)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_text(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set_text(field, value);
        self.errors.remove(field);
    }

    pub fn attach(&mut self, field: DraftField, attachment: FileAttachment) {
        self.file_inputs
            .insert(field, attachment.path.display().to_string());
        self.draft.attach(field, attachment);
        self.errors.remove(field);
    }

    /// Type into the active field
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.active_field() else {
            return;
        };
        match field.kind() {
            FieldKind::Choice(_) => {
                if c == ' ' {
                    self.draft.cycle_choice(field, true);
                } else {
                    return;
                }
            }
            FieldKind::File(_) => self.file_inputs.entry(field).or_default().push(c),
            FieldKind::Text | FieldKind::Multiline | FieldKind::Date => {
                self.draft.push_char(field, c)
            }
        }
        self.errors.remove(field);
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.active_field() else {
            return;
        };
        if field.kind().is_file() {
            if let Some(input) = self.file_inputs.get_mut(&field) {
                input.pop();
            }
        } else {
            self.draft.pop_char(field);
        }
        self.errors.remove(field);
    }

    /// Newline in multi-line fields; returns false when the field is single-line
    pub fn newline(&mut self) -> bool {
        match self.active_field() {
            Some(field) if field.kind() == FieldKind::Multiline => {
                self.draft.push_char(field, '\n');
                self.errors.remove(field);
                true
            }
            _ => false,
        }
    }

    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(field) = self.active_field() {
            if matches!(field.kind(), FieldKind::Choice(_)) {
                self.draft.cycle_choice(field, forward);
                self.errors.remove(field);
            }
        }
    }

    /// Attach the file at the typed path of the active file field
    pub fn attach_active_file(&mut self) -> bool {
        let Some(field) = self.active_field().filter(|f| f.kind().is_file()) else {
            return false;
        };
        let input = self.file_input(field).trim().to_string();
        if input.is_empty() {
            self.errors.insert(field, "Type the path of the file to attach");
            return false;
        }
        match FileAttachment::from_path(&input) {
            Ok(attachment) => {
                tracing::debug!(field = field.name(), path = %input, "attached file");
                self.attach(field, attachment);
                true
            }
            Err(e) => {
                self.errors
                    .insert(field, format!("Could not open {}: {}", input, e));
                false
            }
        }
    }

    /// Drop the attachment of the active file field
    pub fn cancel_active_file(&mut self) {
        if let Some(field) = self.active_field().filter(|f| f.kind().is_file()) {
            self.draft.detach(field);
            self.file_inputs.remove(&field);
            self.errors.remove(field);
        }
    }

    /// Empty the active field; file fields drop their attachment
    pub fn clear_active_field(&mut self) {
        match self.active_field() {
            Some(field) if field.kind().is_file() => self.cancel_active_file(),
            Some(field) => self.set_text(field, ""),
            None => {}
        }
    }

    /// Validate the current step and advance. The step does not move when
    /// any rule fails, and Review never advances.
    pub fn next_step(&mut self) -> bool {
        let Some(next) = self.step.next() else {
            return false;
        };
        let errors = validate_step(self.step, &self.draft);
        let first_failed = errors.fields().next();
        if let Some(first) = first_failed {
            self.active_field_index = self
                .fields()
                .iter()
                .position(|f| *f == first)
                .unwrap_or(0);
            self.errors = errors;
            return false;
        }
        self.enter(next);
        true
    }

    /// Go back one step without validating; false on Personal
    pub fn prev_step(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.enter(prev);
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.step.prev().is_some()
    }

    fn enter(&mut self, step: Step) {
        self.step = step;
        self.errors.clear();
        self.active_field_index = 0;
        self.selected_button = 1;
        // File inputs mirror what the draft holds for the new step
        self.file_inputs = step
            .fields()
            .iter()
            .filter_map(|&f| {
                self.draft
                    .attachment(f)
                    .map(|a| (f, a.path.display().to_string()))
            })
            .collect();
    }

    /// Multipart payload of the full draft; only available on Review
    pub fn submission_payload(&self) -> Option<SubmissionPayload> {
        (self.step == Step::Review).then(|| self.draft.to_payload())
    }

    /// Forget the draft and start over at Personal
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ApplicationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for ApplicationWizard {
    fn field_count(&self) -> usize {
        self.fields().len() + 1 // fields + buttons
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.fields().len());
    }
}
