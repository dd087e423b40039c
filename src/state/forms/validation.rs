//! Per-step field rules for the application draft
//!
//! Validators are pure: they read the draft and return an [`ErrorMap`].
//! A step is valid iff its map is empty.

use super::draft::{ApplicationDraft, DraftField, FieldKind, Step};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const PROJECT_MIN_CHARS: usize = 50;
const STATEMENT_MIN_CHARS: usize = 100;

/// Field → message for the fields that failed a rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap(BTreeMap<DraftField, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn remove(&mut self, field: DraftField) {
        self.0.remove(&field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failed fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = DraftField> + '_ {
        self.0.keys().copied()
    }
}

fn phone_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").ok()).as_ref()
}

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").ok())
        .as_ref()
}

/// Exactly ten ASCII digits, nothing else
pub fn is_valid_phone(value: &str) -> bool {
    phone_pattern().is_some_and(|re| re.is_match(value))
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_some_and(|re| re.is_match(value))
}

/// Parse a percentage in [0, 100]
pub fn parse_percentage(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && (0.0..=100.0).contains(p))
}

/// Validate every field of `step`
pub fn validate_step(step: Step, draft: &ApplicationDraft) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for &field in step.fields() {
        if let Some(message) = validate_field(field, draft) {
            errors.insert(field, message);
        }
    }
    errors
}

/// Check one field; `None` when it passes
pub fn validate_field(field: DraftField, draft: &ApplicationDraft) -> Option<String> {
    use DraftField::*;

    let value = draft.text(field);
    match field {
        FirstName => required(value, "First name is required"),
        LastName => required(value, "Last name is required"),
        ContactNumber => required(value, "Contact number is required").or_else(|| {
            (!is_valid_phone(value)).then(|| "Please enter a valid 10-digit number".to_string())
        }),
        Gender => choice(field, value, "Please select a gender"),
        FinalPercentage => required(value, "Final percentage is required").or_else(|| {
            parse_percentage(value)
                .is_none()
                .then(|| "Please enter a valid percentage between 0 and 100".to_string())
        }),
        TentativeRanking => choice(field, value, "Please select your tentative ranking"),
        FinalYearProject => {
            required(value, "Please enter your final year project details").or_else(|| {
                min_chars(
                    value,
                    PROJECT_MIN_CHARS,
                    "Please provide more details about your project (minimum 50 characters)",
                )
            })
        }
        StrongPoints => required(value, "Please enter your strong points"),
        WeakPoints => required(value, "Please enter your weak points"),
        Transcript => attachment(field, draft, "Please upload your transcript"),
        Cv => attachment(field, draft, "Please upload your CV"),
        Photo => attachment(field, draft, "Please upload your photo"),
        PreferredPrograms => required(value, "Please enter your preferred programs"),
        References => required(value, "Please provide references"),
        StatementOfPurpose => {
            required(value, "Please enter your statement of purpose").or_else(|| {
                min_chars(
                    value,
                    STATEMENT_MIN_CHARS,
                    "Statement of purpose should be at least 100 characters long",
                )
            })
        }
        IntendedResearchAreas => required(value, "Please enter your intended research areas"),
        EnglishProficiency => choice(
            field,
            value,
            "Please select your English proficiency level",
        ),
        LeadershipExperience => required(value, "Please describe your leadership experience"),
        AvailabilityToStart => {
            required(value, "Please enter your availability to start").or_else(|| date(value))
        }
        MiddleName | OtherResearch | Publications | Extracurricular | ProfessionalExperience
        | AdditionalCertifications => None,
    }
}

fn required(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

// Counted on the raw value, surrounding whitespace included
fn min_chars(value: &str, min: usize, message: &str) -> Option<String> {
    (value.chars().count() < min).then(|| message.to_string())
}

fn choice(field: DraftField, value: &str, message: &str) -> Option<String> {
    let FieldKind::Choice(options) = field.kind() else {
        return None;
    };
    (!options.contains(&value)).then(|| message.to_string())
}

fn attachment(field: DraftField, draft: &ApplicationDraft, message: &str) -> Option<String> {
    let Some(file) = draft.attachment(field) else {
        return Some(message.to_string());
    };
    let FieldKind::File(allowed) = field.kind() else {
        return None;
    };
    let accepted = file
        .extension()
        .is_some_and(|ext| allowed.contains(&ext.as_str()));
    (!accepted).then(|| format!("{} must be one of: {}", field.label(), allowed.join(", ")))
}

fn date(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .is_err()
        .then(|| "Please enter a date as YYYY-MM-DD".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::draft::FileAttachment;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn file(name: &str) -> FileAttachment {
        FileAttachment {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            size_bytes: 10,
        }
    }

    fn personal_draft() -> ApplicationDraft {
        let mut draft = ApplicationDraft::new();
        draft.set_text(DraftField::FirstName, "Asha");
        draft.set_text(DraftField::LastName, "Karki");
        draft.set_text(DraftField::ContactNumber, "9812345678");
        draft.set_text(DraftField::Gender, "Female");
        draft
    }

    mod personal {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_personal_step() {
            assert!(validate_step(Step::Personal, &personal_draft()).is_empty());
        }

        #[test]
        fn test_empty_draft_reports_every_required_field() {
            let errors = validate_step(Step::Personal, &ApplicationDraft::new());
            assert_eq!(errors.get(DraftField::FirstName), Some("First name is required"));
            assert_eq!(errors.get(DraftField::LastName), Some("Last name is required"));
            assert_eq!(
                errors.get(DraftField::ContactNumber),
                Some("Contact number is required")
            );
            assert_eq!(errors.get(DraftField::Gender), Some("Please select a gender"));
            assert!(errors.get(DraftField::MiddleName).is_none());
            assert_eq!(errors.len(), 4);
        }

        #[test]
        fn test_whitespace_only_is_missing() {
            let mut draft = personal_draft();
            draft.set_text(DraftField::FirstName, "   ");
            let errors = validate_step(Step::Personal, &draft);
            assert_eq!(errors.get(DraftField::FirstName), Some("First name is required"));
        }

        #[test]
        fn test_phone_rule() {
            assert!(is_valid_phone("9812345678"));
            assert!(!is_valid_phone("98123"));
            assert!(!is_valid_phone("98123456789"));
            assert!(!is_valid_phone("98123456a8"));
            assert!(!is_valid_phone(" 9812345678"));
            // Non-ASCII digits are rejected
            assert!(!is_valid_phone("٩٨١٢٣٤٥٦٧٨"));
        }

        #[test]
        fn test_short_phone_message() {
            let mut draft = personal_draft();
            draft.set_text(DraftField::ContactNumber, "98123");
            let errors = validate_step(Step::Personal, &draft);
            assert_eq!(
                errors.get(DraftField::ContactNumber),
                Some("Please enter a valid 10-digit number")
            );
        }

        #[test]
        fn test_gender_must_be_listed_option() {
            let mut draft = personal_draft();
            draft.set_text(DraftField::Gender, "Unknown");
            assert!(validate_step(Step::Personal, &draft).get(DraftField::Gender).is_some());
        }
    }

    mod academic {
        use super::*;
        use pretty_assertions::assert_eq;

        fn academic_draft() -> ApplicationDraft {
            let mut draft = ApplicationDraft::new();
            draft.set_text(DraftField::FinalPercentage, "78.4");
            draft.set_text(DraftField::TentativeRanking, "Top 10%");
            draft.set_text(DraftField::FinalYearProject, "p".repeat(50));
            draft.set_text(DraftField::StrongPoints, "Curious");
            draft.set_text(DraftField::WeakPoints, "Impatient");
            draft.attach(DraftField::Transcript, file("transcript.pdf"));
            draft.attach(DraftField::Cv, file("cv.docx"));
            draft.attach(DraftField::Photo, file("photo.JPG"));
            draft
        }

        #[test]
        fn test_valid_academic_step() {
            assert_eq!(validate_step(Step::Academic, &academic_draft()), ErrorMap::new());
        }

        #[test]
        fn test_percentage_bounds() {
            assert_eq!(parse_percentage("0"), Some(0.0));
            assert_eq!(parse_percentage("100"), Some(100.0));
            assert_eq!(parse_percentage(" 55.5 "), Some(55.5));
            assert_eq!(parse_percentage("100.01"), None);
            assert_eq!(parse_percentage("-1"), None);
            assert_eq!(parse_percentage("abc"), None);
            assert_eq!(parse_percentage("NaN"), None);
            assert_eq!(parse_percentage("inf"), None);
        }

        #[test]
        fn test_percentage_messages() {
            let mut draft = academic_draft();
            draft.set_text(DraftField::FinalPercentage, "");
            assert_eq!(
                validate_field(DraftField::FinalPercentage, &draft).as_deref(),
                Some("Final percentage is required")
            );
            draft.set_text(DraftField::FinalPercentage, "101");
            assert_eq!(
                validate_field(DraftField::FinalPercentage, &draft).as_deref(),
                Some("Please enter a valid percentage between 0 and 100")
            );
        }

        #[test]
        fn test_project_minimum_length() {
            let mut draft = academic_draft();
            draft.set_text(DraftField::FinalYearProject, "p".repeat(49));
            assert!(validate_field(DraftField::FinalYearProject, &draft).is_some());
            draft.set_text(DraftField::FinalYearProject, "p".repeat(50));
            assert!(validate_field(DraftField::FinalYearProject, &draft).is_none());
        }

        #[test]
        fn test_missing_files_are_reported() {
            let mut draft = academic_draft();
            draft.detach(DraftField::Cv);
            let errors = validate_step(Step::Academic, &draft);
            assert_eq!(errors.get(DraftField::Cv), Some("Please upload your CV"));
            assert_eq!(errors.len(), 1);
        }

        #[test]
        fn test_file_extension_is_checked() {
            let mut draft = academic_draft();
            draft.attach(DraftField::Photo, file("photo.gif"));
            draft.attach(DraftField::Transcript, file("transcript"));
            let errors = validate_step(Step::Academic, &draft);
            assert_eq!(
                errors.get(DraftField::Photo),
                Some("Photo must be one of: jpg, jpeg, png")
            );
            assert_eq!(
                errors.get(DraftField::Transcript),
                Some("Transcript must be one of: pdf, doc, docx")
            );
        }
    }

    mod additional {
        use super::*;
        use pretty_assertions::assert_eq;

        fn additional_draft() -> ApplicationDraft {
            let mut draft = ApplicationDraft::new();
            draft.set_text(DraftField::PreferredPrograms, "MSc Computer Science");
            draft.set_text(DraftField::References, "Dr. Sharma");
            draft.set_text(DraftField::StatementOfPurpose, "s".repeat(100));
            draft.set_text(DraftField::IntendedResearchAreas, "Distributed systems");
            draft.set_text(DraftField::EnglishProficiency, "Fluent");
            draft.set_text(DraftField::LeadershipExperience, "Club president");
            draft.set_text(DraftField::AvailabilityToStart, "2025-09-01");
            draft
        }

        #[test]
        fn test_valid_additional_step() {
            assert!(validate_step(Step::Additional, &additional_draft()).is_empty());
        }

        #[test]
        fn test_statement_minimum_length() {
            let mut draft = additional_draft();
            draft.set_text(DraftField::StatementOfPurpose, "s".repeat(99));
            assert_eq!(
                validate_field(DraftField::StatementOfPurpose, &draft).as_deref(),
                Some("Statement of purpose should be at least 100 characters long")
            );
            draft.set_text(DraftField::StatementOfPurpose, "s".repeat(100));
            assert_eq!(validate_field(DraftField::StatementOfPurpose, &draft), None);
        }

        #[test]
        fn test_length_counts_characters_not_bytes() {
            let mut draft = additional_draft();
            draft.set_text(DraftField::StatementOfPurpose, "é".repeat(99));
            assert!(validate_field(DraftField::StatementOfPurpose, &draft).is_some());
        }

        #[test]
        fn test_availability_date_is_required() {
            let mut draft = additional_draft();
            draft.set_text(DraftField::AvailabilityToStart, "");
            let errors = validate_step(Step::Additional, &draft);
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.get(DraftField::AvailabilityToStart),
                Some("Please enter your availability to start")
            );
        }

        #[test]
        fn test_availability_date_must_parse() {
            let mut draft = additional_draft();
            assert!(validate_field(DraftField::AvailabilityToStart, &draft).is_none());
            draft.set_text(DraftField::AvailabilityToStart, "01/09/2025");
            assert_eq!(
                validate_field(DraftField::AvailabilityToStart, &draft).as_deref(),
                Some("Please enter a date as YYYY-MM-DD")
            );
        }

        #[test]
        fn test_review_step_has_no_rules() {
            assert!(validate_step(Step::Review, &ApplicationDraft::new()).is_empty());
        }
    }

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("asha.k@uni.edu.np"));
        assert!(!is_valid_email("asha@uni"));
        assert!(!is_valid_email("not an email"));
    }
}
