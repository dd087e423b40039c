//! Application state types

use super::forms::{ApplicationWizard, FormState};
use crate::api::{
    ApplicationRecord, ApplicationStatus, DashboardStats, RecordId, Role, Student,
};
use crate::auth::StoredSession;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Login,
    Register,
    /// Multi-step application wizard
    Apply,
    StudentDashboard,
    /// Admin dashboard with the student list
    AdminDashboard,
    /// Create or edit a student record
    StudentEdit,
}

impl View {
    /// Form views are skipped when going back
    pub fn is_form_view(&self) -> bool {
        matches!(
            self,
            View::Login | View::Register | View::Apply | View::StudentEdit
        )
    }

    /// Role a session must hold to open this view
    pub fn required_role(&self) -> Option<Role> {
        match self {
            View::StudentDashboard => Some(Role::Student),
            View::AdminDashboard | View::StudentEdit => Some(Role::Admin),
            View::Home | View::Login | View::Register | View::Apply => None,
        }
    }

    /// Landing view for a role
    pub fn dashboard_for(role: Role) -> View {
        match role {
            Role::Student => View::StudentDashboard,
            Role::Admin => View::AdminDashboard,
            Role::Unknown => View::Login,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Login => "Login",
            View::Register => "Register",
            View::Apply => "Application",
            View::StudentDashboard => "Student Dashboard",
            View::AdminDashboard => "Admin Dashboard",
            View::StudentEdit => "Student Record",
        }
    }
}

/// Status filter on the admin student list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Approved,
            Self::Approved => Self::Rejected,
            Self::Rejected => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn matches(&self, status: ApplicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == ApplicationStatus::Pending,
            Self::Approved => status == ApplicationStatus::Approved,
            Self::Rejected => status == ApplicationStatus::Rejected,
        }
    }
}

/// Entries of the home menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    Apply,
    Login,
    Register,
    Dashboard,
    Logout,
    Quit,
}

impl HomeItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Apply => "Start your application",
            Self::Login => "Login",
            Self::Register => "Create an account",
            Self::Dashboard => "Open dashboard",
            Self::Logout => "Logout",
            Self::Quit => "Quit",
        }
    }
}

/// Destructive action waiting for confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum PendingConfirm {
    DeleteStudent { id: RecordId, name: String },
}

impl PendingConfirm {
    pub fn message(&self) -> String {
        match self {
            Self::DeleteStudent { name, .. } => {
                format!("Are you sure you want to delete {}?", name)
            }
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Session
    pub session: Option<StoredSession>,

    // Forms
    pub wizard: ApplicationWizard,
    pub form: FormState,

    // Data
    pub students: Vec<Student>,
    pub stats: Option<DashboardStats>,
    pub my_application: Option<ApplicationRecord>,
    /// Whether `my_application` reflects a completed fetch
    pub application_loaded: bool,

    // Selection
    pub selected_index: usize,
    pub home_index: usize,

    // Student list filters
    pub search_term: String,
    pub search_active: bool,
    pub status_filter: StatusFilter,

    // Dialogs
    errors: VecDeque<String>,
    pub confirm: Option<PendingConfirm>,
}

impl AppState {
    /// Fresh state around a restored session
    pub fn with_session(session: Option<StoredSession>) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(StoredSession::role)
    }

    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Oldest error not yet dismissed
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Home menu entries for the current session
    pub fn home_items(&self) -> Vec<HomeItem> {
        if self.session.is_some() {
            vec![
                HomeItem::Apply,
                HomeItem::Dashboard,
                HomeItem::Logout,
                HomeItem::Quit,
            ]
        } else {
            vec![
                HomeItem::Apply,
                HomeItem::Login,
                HomeItem::Register,
                HomeItem::Quit,
            ]
        }
    }

    /// Students matching the search term and status filter
    pub fn filtered_students(&self) -> Vec<&Student> {
        let term = self.search_term.trim().to_lowercase();
        self.students
            .iter()
            .filter(|s| self.status_filter.matches(s.status))
            .filter(|s| {
                term.is_empty()
                    || s.name.to_lowercase().contains(&term)
                    || s.email.to_lowercase().contains(&term)
                    || s.university.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.filtered_students().get(self.selected_index).copied()
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Keep the selection inside the filtered list
    pub fn clamp_selection(&mut self) {
        let len = self.filtered_students().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn clear_form(&mut self) {
        self.form = FormState::None;
    }

    /// Forget everything tied to the signed-in user
    pub fn clear_session_data(&mut self) {
        self.session = None;
        self.students.clear();
        self.stats = None;
        self.my_application = None;
        self.application_loaded = false;
        self.search_term.clear();
        self.search_active = false;
        self.status_filter = StatusFilter::default();
        self.reset_selection();
    }
}
