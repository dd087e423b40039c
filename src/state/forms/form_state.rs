//! Form state management and form structs

use super::field::FormField;
use super::validation::{is_valid_email, parse_percentage};
use crate::api::{RecordId, Role, Student, StudentInput};

const ROLE_OPTIONS: &[&str] = &["Student", "Admin"];

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Record forms that hold a list of [`FormField`]s followed by a submit row
pub trait FieldForm: Form {
    fn fields(&self) -> Vec<&FormField>;
    fn field_mut(&mut self, index: usize) -> Option<&mut FormField>;

    fn is_submit_row_active(&self) -> bool {
        self.active_field() >= self.fields().len()
    }

    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        let index = self.active_field();
        self.field_mut(index)
    }
}

/// The record form currently on screen
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    None,
    Login(LoginForm),
    Register(RegisterForm),
    StudentEdit(StudentEditForm),
}

impl FormState {
    fn as_form_mut(&mut self) -> Option<&mut dyn FieldForm> {
        match self {
            FormState::None => None,
            FormState::Login(f) => Some(f),
            FormState::Register(f) => Some(f),
            FormState::StudentEdit(f) => Some(f),
        }
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.as_form_mut() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.as_form_mut() {
            form.prev_field();
        }
    }

    pub fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        self.as_form_mut()?.get_active_field_mut()
    }

    pub fn is_submit_row_active(&mut self) -> bool {
        self.as_form_mut()
            .is_some_and(|form| form.is_submit_row_active())
    }

    /// Message shown under the form after a failed check
    pub fn set_error(&mut self, message: Option<String>) {
        match self {
            FormState::None => {}
            FormState::Login(f) => f.error = message,
            FormState::Register(f) => f.error = message,
            FormState::StudentEdit(f) => f.error = message,
        }
    }
}

// Login Form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: FormField,
    pub password: FormField,
    pub role: FormField,
    pub active_field_index: usize,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(default_role: Role) -> Self {
        let selected = usize::from(default_role == Role::Admin);
        Self {
            email: FormField::text("email", "Email"),
            password: FormField::masked("password", "Password"),
            role: FormField::choice("role", "Login as", ROLE_OPTIONS, selected),
            active_field_index: 0,
            error: None,
        }
    }

    pub fn selected_role(&self) -> Role {
        self.role.as_text().parse().unwrap_or(Role::Student)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.email.as_text().trim().is_empty() || self.password.as_text().is_empty() {
            return Err("Email and password are required".to_string());
        }
        Ok(())
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        4 // email, password, role, submit
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(3);
    }
}

impl FieldForm for LoginForm {
    fn fields(&self) -> Vec<&FormField> {
        vec![&self.email, &self.password, &self.role]
    }
    fn field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        match index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            2 => Some(&mut self.role),
            _ => None,
        }
    }
}

// Register Form
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: FormField,
    pub email: FormField,
    pub password: FormField,
    pub active_field_index: usize,
    pub error: Option<String>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            name: FormField::text("name", "Full Name"),
            email: FormField::text("email", "Email"),
            password: FormField::masked("password", "Password"),
            active_field_index: 0,
            error: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.as_text().trim().is_empty()
            || self.email.as_text().trim().is_empty()
            || self.password.as_text().is_empty()
        {
            return Err("Name, email, and password are required".to_string());
        }
        if !is_valid_email(self.email.as_text().trim()) {
            return Err("Invalid email format".to_string());
        }
        Ok(())
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for RegisterForm {
    fn field_count(&self) -> usize {
        4 // name, email, password, submit
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(3);
    }
}

impl FieldForm for RegisterForm {
    fn fields(&self) -> Vec<&FormField> {
        vec![&self.name, &self.email, &self.password]
    }
    fn field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.email),
            2 => Some(&mut self.password),
            _ => None,
        }
    }
}

// Student Edit Form
#[derive(Debug, Clone)]
pub struct StudentEditForm {
    /// `None` when creating a new record
    pub student_id: Option<RecordId>,
    pub name: FormField,
    pub email: FormField,
    pub university: FormField,
    pub be_percentage: FormField,
    pub be_ranking: FormField,
    pub location: FormField,
    pub active_field_index: usize,
    pub error: Option<String>,
}

impl StudentEditForm {
    pub fn new() -> Self {
        Self {
            student_id: None,
            name: FormField::text("name", "Name"),
            email: FormField::text("email", "Email"),
            university: FormField::text("university", "University"),
            be_percentage: FormField::text("be_percentage", "BE Percentage"),
            be_ranking: FormField::text("be_ranking", "BE Ranking"),
            location: FormField::text("location", "Location"),
            active_field_index: 0,
            error: None,
        }
    }

    pub fn from_student(student: &Student) -> Self {
        Self {
            student_id: Some(student.id.clone()),
            name: FormField::text_with_value("name", "Name", student.name.clone()),
            email: FormField::text_with_value("email", "Email", student.email.clone()),
            university: FormField::text_with_value(
                "university",
                "University",
                student.university.clone(),
            ),
            be_percentage: FormField::text_with_value(
                "be_percentage",
                "BE Percentage",
                student
                    .be_percentage
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
            ),
            be_ranking: FormField::text_with_value(
                "be_ranking",
                "BE Ranking",
                student.be_ranking.map(|r| r.to_string()).unwrap_or_default(),
            ),
            location: FormField::text_with_value(
                "location",
                "Location",
                student.location.clone(),
            ),
            active_field_index: 0,
            error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.student_id.is_none()
    }

    /// Check the form and build the request body
    pub fn to_input(&self) -> Result<StudentInput, String> {
        let name = self.name.as_text().trim();
        let email = self.email.as_text().trim();
        if name.is_empty() || email.is_empty() {
            return Err("Name and Email are required".to_string());
        }
        let percentage = self.be_percentage.as_text().trim();
        let be_percentage = if percentage.is_empty() {
            None
        } else {
            Some(parse_percentage(percentage).ok_or_else(|| {
                "Please enter a valid percentage between 0 and 100".to_string()
            })?)
        };
        let ranking = self.be_ranking.as_text().trim();
        let be_ranking = if ranking.is_empty() {
            None
        } else {
            Some(
                ranking
                    .parse::<i64>()
                    .ok()
                    .filter(|r| *r > 0)
                    .ok_or_else(|| "BE ranking must be a positive whole number".to_string())?,
            )
        };
        Ok(StudentInput {
            name: name.to_string(),
            email: email.to_string(),
            university: self.university.as_text().trim().to_string(),
            be_percentage,
            be_ranking,
            location: self.location.as_text().trim().to_string(),
        })
    }
}

impl Default for StudentEditForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for StudentEditForm {
    fn field_count(&self) -> usize {
        7 // six fields + save
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(6);
    }
}

impl FieldForm for StudentEditForm {
    fn fields(&self) -> Vec<&FormField> {
        vec![
            &self.name,
            &self.email,
            &self.university,
            &self.be_percentage,
            &self.be_ranking,
            &self.location,
        ]
    }
    fn field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        match index {
            0 => Some(&mut self.name),
            1 => Some(&mut self.email),
            2 => Some(&mut self.university),
            3 => Some(&mut self.be_percentage),
            4 => Some(&mut self.be_ranking),
            5 => Some(&mut self.location),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApplicationStatus;
    use pretty_assertions::assert_eq;

    fn create_test_student() -> Student {
        Student {
            id: RecordId::from("42"),
            name: "Asha Karki".to_string(),
            email: "asha@uni.edu".to_string(),
            university: "Tribhuvan University".to_string(),
            be_percentage: Some(81.5),
            be_ranking: Some(12),
            status: ApplicationStatus::Pending,
            location: "Kathmandu".to_string(),
        }
    }

    fn type_into(field: &mut FormField, text: &str) {
        for c in text.chars() {
            field.push_char(c);
        }
    }

    mod login_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_uses_default_role() {
            assert_eq!(LoginForm::new(Role::Student).selected_role(), Role::Student);
            assert_eq!(LoginForm::new(Role::Admin).selected_role(), Role::Admin);
        }

        #[test]
        fn test_requires_email_and_password() {
            let mut form = LoginForm::new(Role::Student);
            assert_eq!(
                form.validate(),
                Err("Email and password are required".to_string())
            );
            type_into(&mut form.email, "asha@uni.edu");
            type_into(&mut form.password, "pw");
            assert_eq!(form.validate(), Ok(()));
        }

        #[test]
        fn test_field_navigation_wraps() {
            let mut form = LoginForm::new(Role::Student);
            form.prev_field();
            assert!(form.is_submit_row_active());
            assert!(form.get_active_field_mut().is_none());
            form.next_field();
            assert_eq!(form.active_field(), 0);
        }

        #[test]
        fn test_role_field_cycles() {
            let mut form = LoginForm::new(Role::Student);
            form.set_active_field(2);
            if let Some(field) = form.get_active_field_mut() {
                field.cycle(true);
            }
            assert_eq!(form.selected_role(), Role::Admin);
        }
    }

    mod register_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_all_fields_required() {
            let mut form = RegisterForm::new();
            type_into(&mut form.name, "Asha");
            type_into(&mut form.email, "asha@uni.edu");
            assert_eq!(
                form.validate(),
                Err("Name, email, and password are required".to_string())
            );
        }

        #[test]
        fn test_email_format() {
            let mut form = RegisterForm::new();
            type_into(&mut form.name, "Asha");
            type_into(&mut form.email, "asha-at-uni");
            type_into(&mut form.password, "secret");
            assert_eq!(form.validate(), Err("Invalid email format".to_string()));

            form.email.clear();
            type_into(&mut form.email, "asha@uni.edu");
            assert_eq!(form.validate(), Ok(()));
        }
    }

    mod student_edit_form {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_from_student_prefills_fields() {
            let form = StudentEditForm::from_student(&create_test_student());
            assert!(!form.is_new());
            assert_eq!(form.name.as_text(), "Asha Karki");
            assert_eq!(form.be_percentage.as_text(), "81.5");
            assert_eq!(form.be_ranking.as_text(), "12");
            assert_eq!(form.fields().len(), 6);
        }

        #[test]
        fn test_to_input_round_trips_values() {
            let form = StudentEditForm::from_student(&create_test_student());
            let input = form.to_input().unwrap();
            assert_eq!(input.be_percentage, Some(81.5));
            assert_eq!(input.be_ranking, Some(12));
            assert_eq!(input.location, "Kathmandu");
        }

        #[test]
        fn test_name_and_email_required() {
            let form = StudentEditForm::new();
            assert!(form.is_new());
            assert_eq!(
                form.to_input(),
                Err("Name and Email are required".to_string())
            );
        }

        #[test]
        fn test_optional_numbers() {
            let mut form = StudentEditForm::new();
            type_into(&mut form.name, "Bibek");
            type_into(&mut form.email, "b@uni.edu");
            let input = form.to_input().unwrap();
            assert_eq!(input.be_percentage, None);
            assert_eq!(input.be_ranking, None);

            type_into(&mut form.be_percentage, "120");
            assert!(form.to_input().is_err());
            form.be_percentage.clear();
            type_into(&mut form.be_ranking, "-3");
            assert!(form.to_input().is_err());
        }
    }

    #[test]
    fn test_form_state_dispatch() {
        let mut state = FormState::Register(RegisterForm::new());
        if let Some(field) = state.get_active_field_mut() {
            field.push_char('A');
        }
        state.next_field();
        state.set_error(Some("oops".to_string()));
        match &state {
            FormState::Register(f) => {
                assert_eq!(f.name.as_text(), "A");
                assert_eq!(f.active_field_index, 1);
                assert_eq!(f.error.as_deref(), Some("oops"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(FormState::None.get_active_field_mut().is_none());
    }
}
