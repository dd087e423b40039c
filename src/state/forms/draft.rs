//! Typed application draft
//!
//! The draft is the accumulated, not-yet-submitted application. Every field
//! is addressed through [`DraftField`], so a step can only ever touch the
//! keys it names and never overwrites another step's data.

use crate::api::{FilePart, SubmissionPayload};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];
pub const RANKING_OPTIONS: &[&str] = &["Top 5%", "Top 10%", "Top 20%", "Top 30%", "Top 40%"];
pub const PROFICIENCY_OPTIONS: &[&str] = &["Native", "Fluent", "Intermediate", "Basic"];

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Position in the linear application chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    Personal,
    Academic,
    Additional,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::Personal,
        Step::Academic,
        Step::Additional,
        Step::Review,
    ];

    /// 1-based step number as shown to the user
    pub fn number(self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::Academic => 2,
            Self::Additional => 3,
            Self::Review => 4,
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Self::Personal => Some(Self::Academic),
            Self::Academic => Some(Self::Additional),
            Self::Additional => Some(Self::Review),
            Self::Review => None,
        }
    }

    pub fn prev(self) -> Option<Step> {
        match self {
            Self::Personal => None,
            Self::Academic => Some(Self::Personal),
            Self::Additional => Some(Self::Academic),
            Self::Review => Some(Self::Additional),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal Details",
            Self::Academic => "Academic Information",
            Self::Additional => "Additional Information",
            Self::Review => "Review & Submit",
        }
    }

    /// Editable fields of this step, in display order
    pub fn fields(self) -> &'static [DraftField] {
        use DraftField::*;
        match self {
            Self::Personal => &[FirstName, MiddleName, LastName, ContactNumber, Gender],
            Self::Academic => &[
                FinalPercentage,
                TentativeRanking,
                FinalYearProject,
                OtherResearch,
                Publications,
                Extracurricular,
                ProfessionalExperience,
                StrongPoints,
                WeakPoints,
                Transcript,
                Cv,
                Photo,
            ],
            Self::Additional => &[
                PreferredPrograms,
                References,
                StatementOfPurpose,
                IntendedResearchAreas,
                EnglishProficiency,
                LeadershipExperience,
                AvailabilityToStart,
                AdditionalCertifications,
            ],
            Self::Review => &[],
        }
    }
}

/// How a field is entered and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Choice(&'static [&'static str]),
    /// Calendar date entered as YYYY-MM-DD
    Date,
    /// Binary attachment with the accepted extensions
    File(&'static [&'static str]),
}

impl FieldKind {
    pub fn is_file(self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// Every key of the application draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    // Personal
    FirstName,
    MiddleName,
    LastName,
    ContactNumber,
    Gender,
    // Academic
    FinalPercentage,
    TentativeRanking,
    FinalYearProject,
    OtherResearch,
    Publications,
    Extracurricular,
    ProfessionalExperience,
    StrongPoints,
    WeakPoints,
    Transcript,
    Cv,
    Photo,
    // Additional
    PreferredPrograms,
    References,
    StatementOfPurpose,
    IntendedResearchAreas,
    EnglishProficiency,
    LeadershipExperience,
    AvailabilityToStart,
    AdditionalCertifications,
}

impl DraftField {
    pub const ALL: [DraftField; 25] = [
        Self::FirstName,
        Self::MiddleName,
        Self::LastName,
        Self::ContactNumber,
        Self::Gender,
        Self::FinalPercentage,
        Self::TentativeRanking,
        Self::FinalYearProject,
        Self::OtherResearch,
        Self::Publications,
        Self::Extracurricular,
        Self::ProfessionalExperience,
        Self::StrongPoints,
        Self::WeakPoints,
        Self::Transcript,
        Self::Cv,
        Self::Photo,
        Self::PreferredPrograms,
        Self::References,
        Self::StatementOfPurpose,
        Self::IntendedResearchAreas,
        Self::EnglishProficiency,
        Self::LeadershipExperience,
        Self::AvailabilityToStart,
        Self::AdditionalCertifications,
    ];

    /// Key used in the multipart submission
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::MiddleName => "middle_name",
            Self::LastName => "last_name",
            Self::ContactNumber => "contact_number",
            Self::Gender => "gender",
            Self::FinalPercentage => "final_percentage",
            Self::TentativeRanking => "tentative_ranking",
            Self::FinalYearProject => "final_year_project",
            Self::OtherResearch => "other_research",
            Self::Publications => "publications",
            Self::Extracurricular => "extracurricular",
            Self::ProfessionalExperience => "professional_experience",
            Self::StrongPoints => "strong_points",
            Self::WeakPoints => "weak_points",
            Self::Transcript => "transcript",
            Self::Cv => "cv",
            Self::Photo => "photo",
            Self::PreferredPrograms => "preferred_programs",
            Self::References => "references",
            Self::StatementOfPurpose => "statement_of_purpose",
            Self::IntendedResearchAreas => "intended_research_areas",
            Self::EnglishProficiency => "english_proficiency",
            Self::LeadershipExperience => "leadership_experience",
            Self::AvailabilityToStart => "availability_to_start",
            Self::AdditionalCertifications => "additional_certifications",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::MiddleName => "Middle Name",
            Self::LastName => "Last Name",
            Self::ContactNumber => "Contact Number",
            Self::Gender => "Gender",
            Self::FinalPercentage => "Final Percentage",
            Self::TentativeRanking => "Tentative Ranking",
            Self::FinalYearProject => "Final Year Project",
            Self::OtherResearch => "Other Research or Project Work",
            Self::Publications => "Publications",
            Self::Extracurricular => "Extracurricular Activities and Awards",
            Self::ProfessionalExperience => "Professional Experience",
            Self::StrongPoints => "Strong Points",
            Self::WeakPoints => "Weak Points",
            Self::Transcript => "Transcript",
            Self::Cv => "CV",
            Self::Photo => "Photo",
            Self::PreferredPrograms => "Preferred Programs",
            Self::References => "References",
            Self::StatementOfPurpose => "Statement of Purpose",
            Self::IntendedResearchAreas => "Intended Research Areas",
            Self::EnglishProficiency => "English Proficiency",
            Self::LeadershipExperience => "Leadership Experience",
            Self::AvailabilityToStart => "Availability to Start",
            Self::AdditionalCertifications => "Additional Certifications",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Gender => FieldKind::Choice(GENDER_OPTIONS),
            Self::TentativeRanking => FieldKind::Choice(RANKING_OPTIONS),
            Self::EnglishProficiency => FieldKind::Choice(PROFICIENCY_OPTIONS),
            Self::Transcript | Self::Cv => FieldKind::File(DOCUMENT_EXTENSIONS),
            Self::Photo => FieldKind::File(PHOTO_EXTENSIONS),
            Self::AvailabilityToStart => FieldKind::Date,
            Self::FinalYearProject
            | Self::OtherResearch
            | Self::Publications
            | Self::Extracurricular
            | Self::ProfessionalExperience
            | Self::StrongPoints
            | Self::WeakPoints
            | Self::PreferredPrograms
            | Self::References
            | Self::StatementOfPurpose
            | Self::IntendedResearchAreas
            | Self::LeadershipExperience
            | Self::AdditionalCertifications => FieldKind::Multiline,
            Self::FirstName
            | Self::MiddleName
            | Self::LastName
            | Self::ContactNumber
            | Self::FinalPercentage => FieldKind::Text,
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Self::MiddleName
                | Self::OtherResearch
                | Self::Publications
                | Self::Extracurricular
                | Self::ProfessionalExperience
                | Self::AdditionalCertifications
        )
    }
}

/// A file chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

impl FileAttachment {
    /// Describe the regular file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size_bytes: metadata.len(),
        })
    }

    /// Lowercased extension without the dot
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("pdf") => "application/pdf",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
    }

    pub fn display(&self) -> String {
        let size = self.size_bytes as f64;
        if size >= 1024.0 * 1024.0 {
            format!("{} ({:.1} MB)", self.file_name, size / (1024.0 * 1024.0))
        } else if size >= 1024.0 {
            format!("{} ({:.1} KB)", self.file_name, size / 1024.0)
        } else {
            format!("{} ({} B)", self.file_name, self.size_bytes)
        }
    }
}

/// The accumulated application record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationDraft {
    text: BTreeMap<DraftField, String>,
    files: BTreeMap<DraftField, FileAttachment>,
}

impl ApplicationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text value of a scalar field; empty when never set
    pub fn text(&self, field: DraftField) -> &str {
        self.text.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn attachment(&self, field: DraftField) -> Option<&FileAttachment> {
        self.files.get(&field)
    }

    /// Replace the value of one scalar field. File fields are ignored.
    pub fn set_text(&mut self, field: DraftField, value: impl Into<String>) {
        debug_assert!(!field.kind().is_file(), "{} is a file field", field.name());
        if field.kind().is_file() {
            return;
        }
        self.text.insert(field, value.into());
    }

    pub fn push_char(&mut self, field: DraftField, c: char) {
        if !field.kind().is_file() {
            self.text.entry(field).or_default().push(c);
        }
    }

    pub fn pop_char(&mut self, field: DraftField) {
        if let Some(value) = self.text.get_mut(&field) {
            value.pop();
        }
    }

    /// Step a choice field to the next (or previous) option
    pub fn cycle_choice(&mut self, field: DraftField, forward: bool) {
        let FieldKind::Choice(options) = field.kind() else {
            return;
        };
        let current = options.iter().position(|o| *o == self.text(field));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        self.set_text(field, options[next]);
    }

    /// Store an attachment for a file field. Scalar fields are ignored.
    pub fn attach(&mut self, field: DraftField, attachment: FileAttachment) {
        debug_assert!(field.kind().is_file(), "{} is not a file field", field.name());
        if field.kind().is_file() {
            self.files.insert(field, attachment);
        }
    }

    pub fn detach(&mut self, field: DraftField) -> Option<FileAttachment> {
        self.files.remove(&field)
    }

    /// Whether the field holds a non-blank value or an attachment
    pub fn has_value(&self, field: DraftField) -> bool {
        if field.kind().is_file() {
            self.files.contains_key(&field)
        } else {
            !self.text(field).trim().is_empty()
        }
    }

    /// Review projection of a field
    pub fn display_value(&self, field: DraftField) -> String {
        if field.kind().is_file() {
            return self
                .attachment(field)
                .map(|a| a.file_name.clone())
                .unwrap_or_else(|| "N/A".to_string());
        }
        let value = self.text(field);
        if value.trim().is_empty() {
            "N/A".to_string()
        } else if field == DraftField::FinalPercentage {
            format!("{}%", value.trim())
        } else {
            value.to_string()
        }
    }

    /// Build the multipart payload. Every draft key is present: scalar
    /// fields as text parts, attachments as file parts, missing attachments
    /// as empty text parts.
    pub fn to_payload(&self) -> SubmissionPayload {
        let mut payload = SubmissionPayload::default();
        for field in DraftField::ALL {
            match self.attachment(field) {
                Some(file) => payload.file_parts.push(FilePart {
                    name: field.name().to_string(),
                    path: file.path.clone(),
                    file_name: file.file_name.clone(),
                    mime_type: file.mime_type().to_string(),
                }),
                None => payload
                    .text_parts
                    .push((field.name().to_string(), self.text(field).to_string())),
            }
        }
        payload
    }
}
