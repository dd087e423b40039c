//! Application state and key handling

use crate::api::{ApiError, ApplicationStatus, PortalApi, PortalClient, Role};
use crate::auth::{check_access, GuardDecision, SessionStore, StoredSession};
use crate::config::TuiConfig;
use crate::state::{
    students_to_csv, AppState, FieldKind, Form, FormState, HomeItem, LoginForm,
    PendingConfirm, RegisterForm, Step, StudentEditForm, View, WizardButton,
};
use anyhow::Result;
use chrono::{Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Client for the admissions backend
    api: Box<dyn PortalApi>,
    /// Where the login session is persisted
    sessions: SessionStore,
    config: TuiConfig,
    /// Where `config` is saved; `None` keeps changes in memory
    config_path: Option<PathBuf>,
    /// Whether the app should quit
    quit: bool,
    /// One-line feedback shown in the status bar until the next key press
    pub status_message: Option<String>,
}

impl App {
    /// Create a new App instance talking to the configured backend
    pub fn new(config: TuiConfig) -> Result<Self> {
        let client = PortalClient::new(&config.api_base_url(), config.request_timeout())?;
        tracing::info!(base_url = client.base_url(), "using admissions backend");
        let sessions = SessionStore::open_default();
        tracing::debug!(path = ?sessions.path(), "session store");
        Ok(Self::with_parts(
            Box::new(client),
            sessions,
            config,
            TuiConfig::config_path(),
        ))
    }

    /// Assemble an App from its collaborators, restoring any stored session
    pub fn with_parts(
        mut api: Box<dyn PortalApi>,
        sessions: SessionStore,
        config: TuiConfig,
        config_path: Option<PathBuf>,
    ) -> Self {
        let session = sessions.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load stored session: {}", e);
            None
        });
        api.set_token(session.as_ref().and_then(|s| s.token.clone()));
        if let Some(session) = &session {
            tracing::info!(user = %session.user.email, "restored session");
        }

        let state = AppState::with_session(session);

        Self {
            state,
            api,
            sessions,
            config,
            config_path,
            quit: false,
            status_message: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Handle confirm dialog (modal)
        if self.state.confirm.is_some() {
            self.handle_confirm_key(key).await;
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        match self.state.current_view {
            View::Home => self.handle_home_key(key).await,
            View::Login | View::Register | View::StudentEdit => {
                self.handle_record_form_key(key).await
            }
            View::Apply => self.handle_apply_key(key).await,
            View::StudentDashboard => self.handle_student_dashboard_key(key).await,
            View::AdminDashboard => self.handle_admin_dashboard_key(key).await,
        }

        Ok(())
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        self.state
            .view_history
            .push(self.state.current_view);
        self.state.current_view = view;
        self.state.reset_selection();
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        // Skip form views in history to go back to the last non-form view
        while let Some(view) = self.state.view_history.pop() {
            if view.is_form_view() {
                continue;
            }
            self.state.current_view = view;
            return;
        }
        self.state.current_view = View::Home;
    }

    /// Open a view through the route guard and load its data
    pub async fn open_view(&mut self, view: View) {
        let mut target = view;
        loop {
            match check_access(target, self.state.session.as_ref(), Utc::now()) {
                GuardDecision::Allow => break,
                GuardDecision::Redirect(next) => {
                    tracing::debug!(from = ?target, to = ?next, "route guard redirect");
                    target = next;
                }
                GuardDecision::SignOut => {
                    tracing::info!("stored session rejected by route guard");
                    self.end_session();
                    target = View::Login;
                }
            }
        }

        match target {
            View::Login => {
                self.state.form = FormState::Login(LoginForm::new(self.config.default_role()))
            }
            View::Register => self.state.form = FormState::Register(RegisterForm::new()),
            View::StudentEdit => {
                if !matches!(self.state.form, FormState::StudentEdit(_)) {
                    self.state.form = FormState::StudentEdit(StudentEditForm::new());
                }
            }
            _ => self.state.clear_form(),
        }

        self.navigate(target);

        match target {
            View::StudentDashboard => self.load_my_application().await,
            View::AdminDashboard => self.refresh_students().await,
            _ => {}
        }
    }

    /// Drop the local session and everything loaded for it
    fn end_session(&mut self) {
        if let Err(e) = self.sessions.clear() {
            tracing::warn!("Failed to remove session file: {}", e);
        }
        self.api.set_token(None);
        self.state.clear_session_data();
        self.state.view_history.clear();
    }

    /// Report a failed backend call. A refused session signs the user out.
    fn report_api_error(&mut self, context: &str, err: ApiError) {
        tracing::warn!(kind = err.kind(), "{}: {}", context, err);
        if err.is_unauthorized() {
            self.end_session();
            self.state.form = FormState::Login(LoginForm::new(self.config.default_role()));
            self.state.current_view = View::Login;
            self.push_error(format!("{}: {}\nPlease log in again.", context, err));
        } else {
            self.push_error(format!("{}: {}", context, err));
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(action) = self.state.confirm.take() {
                    self.perform_confirmed(action).await;
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.state.confirm = None,
            _ => {}
        }
    }

    async fn perform_confirmed(&mut self, action: PendingConfirm) {
        match action {
            PendingConfirm::DeleteStudent { id, name } => {
                match self.api.delete_student(&id).await {
                    Ok(()) => {
                        tracing::info!(%id, "deleted student");
                        self.state.students.retain(|s| s.id != id);
                        self.state.clamp_selection();
                        self.refresh_stats().await;
                        self.status_message = Some(format!("Deleted {}", name));
                    }
                    Err(e) => self.report_api_error("Failed to delete student", e),
                }
            }
        }
    }

    /// Handle keys in Home view
    async fn handle_home_key(&mut self, key: KeyEvent) {
        let items = self.state.home_items();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.home_index + 1 < items.len() {
                    self.state.home_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.home_index = self.state.home_index.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(item) = items.get(self.state.home_index).copied() {
                    self.activate_home_item(item).await;
                }
            }
            KeyCode::Char('a') => self.open_view(View::Apply).await,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    async fn activate_home_item(&mut self, item: HomeItem) {
        match item {
            HomeItem::Apply => self.open_view(View::Apply).await,
            HomeItem::Login => self.open_view(View::Login).await,
            HomeItem::Register => self.open_view(View::Register).await,
            HomeItem::Dashboard => {
                let role = self.state.role().unwrap_or(Role::Unknown);
                self.open_view(View::dashboard_for(role)).await;
            }
            HomeItem::Logout => self.logout().await,
            HomeItem::Quit => self.quit = true,
        }
        // The menu changes with the session
        self.state.home_index = self
            .state
            .home_index
            .min(self.state.home_items().len().saturating_sub(1));
    }

    /// Handle keys in the login, registration and student edit forms
    async fn handle_record_form_key(&mut self, key: KeyEvent) {
        let on_submit = self.state.form.is_submit_row_active();
        let on_choice = self
            .state
            .form
            .get_active_field_mut()
            .is_some_and(|f| f.is_choice());

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.state.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.prev_field(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit_record_form().await
            }
            KeyCode::Enter => self.submit_record_form().await,
            KeyCode::Esc => {
                self.state.clear_form();
                self.go_back();
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if on_choice => {
                let forward = key.code != KeyCode::Left;
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.cycle(forward);
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.clear();
                }
            }
            KeyCode::Char(c) if !on_submit => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.push_char(c);
                }
                self.state.form.set_error(None);
            }
            KeyCode::Backspace if !on_submit => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.pop_char();
                }
            }
            _ => {}
        }
    }

    async fn submit_record_form(&mut self) {
        match self.state.current_view {
            View::Login => self.submit_login().await,
            View::Register => self.submit_register().await,
            View::StudentEdit => self.save_student().await,
            _ => {}
        }
    }

    async fn submit_login(&mut self) {
        let FormState::Login(form) = &self.state.form else {
            return;
        };
        if let Err(message) = form.validate() {
            self.state.form.set_error(Some(message));
            return;
        }
        let email = form.email.as_text().trim().to_string();
        let password = form.password.as_text().to_string();
        let role = form.selected_role();

        match self.api.login(&email, &password, role).await {
            Ok(response) => {
                let session = StoredSession::new(response.token, response.user);
                let role = session.role();
                if role == Role::Unknown {
                    self.state
                        .form
                        .set_error(Some("This account has no recognised role".to_string()));
                    return;
                }
                if let Err(e) = self.sessions.save(&session) {
                    tracing::warn!("Failed to save session: {}", e);
                }
                self.api.set_token(session.token.clone());
                tracing::info!(user = %session.user.email, role = role.label(), "logged in");
                self.status_message = Some(format!("Welcome, {}!", session.user.name));
                self.state.session = Some(session);
                self.remember_role(role);
                self.open_view(View::dashboard_for(role)).await;
            }
            Err(ApiError::Unauthorized { message, .. } | ApiError::Rejected { message, .. }) => {
                self.state.form.set_error(Some(message));
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), "login failed: {}", e);
                self.push_error(format!("Login failed: {}", e));
            }
        }
    }

    /// Preselect the last used role on the next login form
    fn remember_role(&mut self, role: Role) {
        let value = role.label().to_lowercase();
        if self.config.default_role.as_deref() == Some(value.as_str()) {
            return;
        }
        self.config.default_role = Some(value);
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                tracing::warn!("Failed to save config: {}", e);
            }
        }
    }

    async fn submit_register(&mut self) {
        let FormState::Register(form) = &self.state.form else {
            return;
        };
        if let Err(message) = form.validate() {
            self.state.form.set_error(Some(message));
            return;
        }
        let name = form.name.as_text().trim().to_string();
        let email = form.email.as_text().trim().to_string();
        let password = form.password.as_text().to_string();

        match self.api.signup(&name, &email, &password).await {
            Ok(()) => {
                tracing::info!(%email, "registered account");
                self.open_view(View::Login).await;
                if let FormState::Login(login) = &mut self.state.form {
                    login.email.value = crate::state::FieldValue::Text(email);
                    login.active_field_index = 1;
                }
                self.status_message = Some("Registration successful! Please log in.".to_string());
            }
            Err(ApiError::Unauthorized { message, .. } | ApiError::Rejected { message, .. }) => {
                self.state.form.set_error(Some(message));
            }
            Err(e) => self.report_api_error("Registration failed", e),
        }
    }

    async fn save_student(&mut self) {
        let FormState::StudentEdit(form) = &self.state.form else {
            return;
        };
        let input = match form.to_input() {
            Ok(input) => input,
            Err(message) => {
                self.state.form.set_error(Some(message));
                return;
            }
        };
        let id = form.student_id.clone();

        let result = match &id {
            Some(id) => self.api.update_student(id, &input).await,
            None => self.api.create_student(&input).await,
        };
        match result {
            Ok(()) => {
                self.status_message = Some(if id.is_some() {
                    "Student updated successfully".to_string()
                } else {
                    "Student added successfully".to_string()
                });
                self.state.clear_form();
                self.go_back();
                self.refresh_students().await;
            }
            Err(ApiError::Rejected { message, .. }) => {
                self.state.form.set_error(Some(message));
            }
            Err(e) => self.report_api_error("Failed to save student", e),
        }
    }

    /// Handle keys in the application wizard
    async fn handle_apply_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let wizard = &mut self.state.wizard;
        let on_buttons = wizard.is_buttons_row_active();
        let on_review = wizard.step() == Step::Review;
        let active_kind = wizard.active_field().map(|f| f.kind());

        match key.code {
            KeyCode::Char('n') if ctrl => self.advance_wizard(),
            KeyCode::Char('b') if ctrl => self.wizard_back(),
            KeyCode::Char('s') if ctrl && on_review => self.submit_application().await,
            KeyCode::Esc => self.wizard_back(),
            KeyCode::Tab | KeyCode::Down => wizard.next_field(),
            KeyCode::BackTab | KeyCode::Up => wizard.prev_field(),
            KeyCode::Left | KeyCode::Right if on_buttons => wizard.toggle_button(),
            KeyCode::Left => wizard.cycle_choice(false),
            KeyCode::Right => wizard.cycle_choice(true),
            KeyCode::Enter if on_buttons => match wizard.selected_button() {
                WizardButton::Back => self.wizard_back(),
                WizardButton::Next if on_review => self.submit_application().await,
                WizardButton::Next => self.advance_wizard(),
            },
            KeyCode::Enter => match active_kind {
                Some(FieldKind::File(_)) => {
                    if wizard.attach_active_file() {
                        wizard.next_field();
                    }
                }
                Some(FieldKind::Multiline) => {
                    wizard.newline();
                }
                _ => wizard.next_field(),
            },
            KeyCode::Delete => wizard.cancel_active_file(),
            KeyCode::Char('u') if ctrl => wizard.clear_active_field(),
            KeyCode::Backspace => wizard.backspace(),
            KeyCode::Char(c) if !ctrl => wizard.input_char(c),
            _ => {}
        }
    }

    fn advance_wizard(&mut self) {
        let wizard = &mut self.state.wizard;
        if wizard.step() == Step::Review {
            return;
        }
        if wizard.next_step() {
            tracing::debug!(step = ?wizard.step(), "advanced application step");
        } else {
            let count = wizard.errors().len();
            self.status_message = Some(format!(
                "Please fix {} field{} before continuing",
                count,
                if count == 1 { "" } else { "s" }
            ));
        }
    }

    /// One step back; leaving from the first step keeps the draft
    fn wizard_back(&mut self) {
        if !self.state.wizard.prev_step() {
            self.go_back();
        }
    }

    async fn submit_application(&mut self) {
        let Some(payload) = self.state.wizard.submission_payload() else {
            return;
        };
        match self.api.submit_application(&payload).await {
            Ok(()) => {
                tracing::info!("application submitted");
                self.state.wizard.reset();
                self.state.view_history.clear();
                self.state.current_view = View::Home;
                let target = match self.state.role() {
                    Some(Role::Student) => View::StudentDashboard,
                    _ => View::Home,
                };
                if target != View::Home {
                    self.open_view(target).await;
                }
                self.status_message = Some("Application submitted successfully!".to_string());
            }
            Err(e) => self.report_api_error("Failed to submit the application", e),
        }
    }

    /// Handle keys in the student dashboard
    async fn handle_student_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.open_view(View::Apply).await,
            KeyCode::Char('r') => self.load_my_application().await,
            KeyCode::Char('l') => self.logout().await,
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc | KeyCode::Char('h') => self.go_back(),
            _ => {}
        }
    }

    /// Handle keys in the admin dashboard
    async fn handle_admin_dashboard_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.state.search_active = false,
                KeyCode::Backspace => {
                    self.state.search_term.pop();
                    self.state.clamp_selection();
                }
                KeyCode::Char(c) => {
                    self.state.search_term.push(c);
                    self.state.clamp_selection();
                }
                _ => {}
            }
            return;
        }

        let total = self.state.filtered_students().len();
        match key.code {
            KeyCode::Char('e') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.export_students()
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(total),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('/') => self.state.search_active = true,
            KeyCode::Char('f') => {
                self.state.status_filter = self.state.status_filter.next();
                self.state.clamp_selection();
            }
            KeyCode::Char('a') => self.set_selected_status(ApplicationStatus::Approved).await,
            KeyCode::Char('r') => self.set_selected_status(ApplicationStatus::Rejected).await,
            KeyCode::Char('p') => self.set_selected_status(ApplicationStatus::Pending).await,
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(student) = self.state.selected_student() {
                    self.state.form = FormState::StudentEdit(StudentEditForm::from_student(student));
                    self.open_view(View::StudentEdit).await;
                }
            }
            KeyCode::Char('n') => {
                self.state.form = FormState::StudentEdit(StudentEditForm::new());
                self.open_view(View::StudentEdit).await;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(student) = self.state.selected_student() {
                    self.state.confirm = Some(PendingConfirm::DeleteStudent {
                        id: student.id.clone(),
                        name: student.name.clone(),
                    });
                }
            }
            KeyCode::Char('R') => self.refresh_students().await,
            KeyCode::Char('l') => self.logout().await,
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    async fn set_selected_status(&mut self, status: ApplicationStatus) {
        let Some(id) = self.state.selected_student().map(|s| s.id.clone()) else {
            return;
        };
        match self.api.update_student_status(&id, status).await {
            Ok(()) => {
                tracing::info!(%id, status = status.label(), "updated application status");
                if let Some(student) = self.state.students.iter_mut().find(|s| s.id == id) {
                    student.status = status;
                }
                self.state.clamp_selection();
                self.status_message = Some(format!("Status updated to {}", status.label()));
                self.refresh_stats().await;
            }
            Err(e) => self.report_api_error("Failed to update status", e),
        }
    }

    /// Write the filtered list to a CSV file and the clipboard
    fn export_students(&mut self) {
        let students = self.state.filtered_students();
        let count = students.len();
        let csv = students_to_csv(students);
        let file_name = format!("students_data_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));

        if let Err(e) = std::fs::write(&file_name, &csv) {
            self.push_error(format!("Failed to export students: {}", e));
            return;
        }
        let copied = match self.copy_to_clipboard(&csv) {
            Ok(()) => " and copied to clipboard",
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                ""
            }
        };
        tracing::info!(count, file = %file_name, "exported students");
        self.status_message = Some(format!(
            "Exported {} students to {}{}",
            count, file_name, copied
        ));
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    async fn refresh_students(&mut self) {
        match self.api.list_students().await {
            Ok(students) => {
                tracing::debug!(count = students.len(), "loaded students");
                self.state.students = students;
                self.state.clamp_selection();
            }
            Err(e) => {
                self.report_api_error("Failed to fetch students", e);
                return;
            }
        }
        self.refresh_stats().await;
    }

    async fn refresh_stats(&mut self) {
        match self.api.dashboard_stats().await {
            Ok(stats) => self.state.stats = Some(stats),
            Err(e) => self.report_api_error("Failed to fetch dashboard stats", e),
        }
    }

    async fn load_my_application(&mut self) {
        match self.api.get_my_application().await {
            Ok(record) => {
                self.state.my_application = record;
                self.state.application_loaded = true;
            }
            Err(e) => self.report_api_error("Failed to load your application", e),
        }
    }

    async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!(kind = e.kind(), "logout request failed: {}", e);
        }
        self.end_session();
        self.state.clear_form();
        self.state.current_view = View::Home;
        self.state.home_index = 0;
        self.status_message = Some("Logged out".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        DashboardStats, LoginResponse, MockPortalApi, RecordId, Student, UserRecord,
    };
    use crate::auth::session_fixtures::user;
    use crate::state::{DraftField, FileAttachment};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    fn build_app(mut mock: MockPortalApi, dir: &TempDir) -> App {
        mock.expect_set_token().return_const(());
        App::with_parts(
            Box::new(mock),
            SessionStore::at(dir.path().join("session.json")),
            TuiConfig::default(),
            Some(dir.path().join("config.json")),
        )
    }

    fn store_session(dir: &TempDir, role: Role) {
        SessionStore::at(dir.path().join("session.json"))
            .save(&StoredSession::new(None, user(role)))
            .unwrap();
    }

    fn student(id: &str, name: &str) -> Student {
        Student {
            id: RecordId::from(id),
            name: name.to_string(),
            email: format!("{}@uni.edu", name.to_lowercase()),
            university: "Kathmandu University".to_string(),
            be_percentage: Some(80.0),
            be_ranking: None,
            status: ApplicationStatus::Pending,
            location: String::new(),
        }
    }

    /// Fill every step with minimal valid data and move to Review
    async fn complete_wizard(app: &mut App, dir: &TempDir) {
        app.open_view(View::Apply).await;
        let wizard = &mut app.state.wizard;
        wizard.set_text(DraftField::FirstName, "Asha");
        wizard.set_text(DraftField::LastName, "Karki");
        wizard.set_text(DraftField::ContactNumber, "9812345678");
        wizard.set_text(DraftField::Gender, "Female");
        app.handle_key(ctrl('n')).await.unwrap();
        assert_eq!(app.state.wizard.step(), Step::Academic);

        let wizard = &mut app.state.wizard;
        wizard.set_text(DraftField::FinalPercentage, "75");
        wizard.set_text(DraftField::TentativeRanking, "Top 20%");
        wizard.set_text(DraftField::FinalYearProject, "p".repeat(50));
        wizard.set_text(DraftField::StrongPoints, "Persistence");
        wizard.set_text(DraftField::WeakPoints, "Public speaking");
        for (field, name) in [
            (DraftField::Transcript, "transcript.pdf"),
            (DraftField::Cv, "cv.doc"),
            (DraftField::Photo, "photo.jpeg"),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"file").unwrap();
            wizard.attach(field, FileAttachment::from_path(&path).unwrap());
        }
        app.handle_key(ctrl('n')).await.unwrap();
        assert_eq!(app.state.wizard.step(), Step::Additional);

        let wizard = &mut app.state.wizard;
        wizard.set_text(DraftField::PreferredPrograms, "MSc Data Science");
        wizard.set_text(DraftField::References, "Prof. Adhikari");
        wizard.set_text(DraftField::StatementOfPurpose, "s".repeat(100));
        wizard.set_text(DraftField::IntendedResearchAreas, "Machine learning");
        wizard.set_text(DraftField::EnglishProficiency, "Fluent");
        wizard.set_text(DraftField::LeadershipExperience, "Led the robotics club");
        wizard.set_text(DraftField::AvailabilityToStart, "2025-09-01");
        app.handle_key(ctrl('n')).await.unwrap();
        assert_eq!(app.state.wizard.step(), Step::Review);
    }

    #[tokio::test]
    async fn test_full_application_submits_once_with_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock = MockPortalApi::new();
        mock.expect_submit_application()
            .withf(|payload| {
                DraftField::ALL.iter().all(|f| payload.contains(f.name()))
                    && payload.text_value("first_name") == Some("Asha")
                    && payload.file_parts.len() == 3
            })
            .times(1)
            .returning(|_| Ok(()));
        let mut app = build_app(mock, &dir);

        complete_wizard(&mut app, &dir).await;
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::Home);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Application submitted successfully!")
        );
        assert_eq!(app.state.wizard.step(), Step::Personal);
        assert_eq!(app.state.wizard.draft().text(DraftField::FirstName), "");
    }

    #[tokio::test]
    async fn test_enter_on_review_confirms() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock = MockPortalApi::new();
        mock.expect_submit_application()
            .times(1)
            .returning(|_| Ok(()));
        let mut app = build_app(mock, &dir);

        complete_wizard(&mut app, &dir).await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.state.current_view, View::Home);
    }

    #[tokio::test]
    async fn test_student_goes_to_dashboard_after_submitting() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Student);
        let mut mock = MockPortalApi::new();
        mock.expect_submit_application().times(1).returning(|_| Ok(()));
        mock.expect_get_my_application()
            .times(1)
            .returning(|| Ok(None));
        let mut app = build_app(mock, &dir);

        complete_wizard(&mut app, &dir).await;
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::StudentDashboard);
        assert!(app.state.application_loaded);
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_draft_on_review() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock = MockPortalApi::new();
        mock.expect_submit_application().times(1).returning(|_| {
            Err(ApiError::Server {
                status: 500,
                message: "Error storing details".to_string(),
            })
        });
        let mut app = build_app(mock, &dir);

        complete_wizard(&mut app, &dir).await;
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::Apply);
        assert_eq!(app.state.wizard.step(), Step::Review);
        assert_eq!(app.state.wizard.draft().text(DraftField::FirstName), "Asha");
        let error = app.state.current_error().unwrap();
        assert!(error.starts_with("Failed to submit the application"), "{error}");

        // Dismissing the dialog leaves the wizard ready for a retry
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(!app.state.has_errors());
        assert_eq!(app.state.wizard.step(), Step::Review);
    }

    #[tokio::test]
    async fn test_unauthorized_submission_signs_out_but_keeps_draft() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Student);
        let mut mock = MockPortalApi::new();
        mock.expect_submit_application().times(1).returning(|_| {
            Err(ApiError::Unauthorized {
                status: 401,
                message: "Authentication required".to_string(),
            })
        });
        let mut app = build_app(mock, &dir);

        complete_wizard(&mut app, &dir).await;
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::Login);
        assert!(app.state.session.is_none());
        assert!(!dir.path().join("session.json").exists());
        assert_eq!(app.state.wizard.step(), Step::Review);
        assert_eq!(app.state.wizard.draft().text(DraftField::LastName), "Karki");
    }

    #[tokio::test]
    async fn test_invalid_step_does_not_advance_or_call_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = build_app(MockPortalApi::new(), &dir);
        app.open_view(View::Apply).await;

        type_text(&mut app, "Asha").await;
        app.handle_key(ctrl('n')).await.unwrap();

        assert_eq!(app.state.wizard.step(), Step::Personal);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Please fix 3 fields before continuing")
        );
        assert_eq!(app.state.wizard.draft().text(DraftField::FirstName), "Asha");
    }

    #[tokio::test]
    async fn test_esc_on_first_step_leaves_and_keeps_draft() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = build_app(MockPortalApi::new(), &dir);
        app.open_view(View::Apply).await;
        type_text(&mut app, "Asha").await;

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state.current_view, View::Home);

        app.open_view(View::Apply).await;
        assert_eq!(app.state.wizard.draft().text(DraftField::FirstName), "Asha");
    }

    #[tokio::test]
    async fn test_guard_redirects_anonymous_user_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = build_app(MockPortalApi::new(), &dir);

        app.open_view(View::AdminDashboard).await;
        assert_eq!(app.state.current_view, View::Login);
        assert!(matches!(app.state.form, FormState::Login(_)));
    }

    #[tokio::test]
    async fn test_guard_redirects_student_away_from_admin_views() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Student);
        let mut mock = MockPortalApi::new();
        mock.expect_get_my_application().times(1).returning(|| Ok(None));
        let mut app = build_app(mock, &dir);

        app.open_view(View::AdminDashboard).await;
        assert_eq!(app.state.current_view, View::StudentDashboard);
    }

    #[tokio::test]
    async fn test_unknown_role_session_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Unknown);
        let mut app = build_app(MockPortalApi::new(), &dir);
        assert!(app.state.session.is_some());

        app.open_view(View::StudentDashboard).await;
        assert_eq!(app.state.current_view, View::Login);
        assert!(app.state.session.is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_login_flow_stores_session_and_opens_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock = MockPortalApi::new();
        mock.expect_login()
            .withf(|email, password, role| {
                email == "admin@uni.edu" && password == "s3cret" && *role == Role::Admin
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(LoginResponse {
                    token: Some("opaque-token".to_string()),
                    user: UserRecord {
                        id: RecordId::from("1"),
                        name: "Registrar".to_string(),
                        email: "admin@uni.edu".to_string(),
                        role: Role::Admin,
                    },
                })
            });
        mock.expect_list_students()
            .times(1)
            .returning(|| Ok(vec![student("1", "Asha")]));
        mock.expect_dashboard_stats()
            .times(1)
            .returning(|| Ok(DashboardStats::default()));
        let mut app = build_app(mock, &dir);

        app.open_view(View::Login).await;
        type_text(&mut app, "admin@uni.edu").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut app, "s3cret").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        app.handle_key(key(KeyCode::Right)).await.unwrap();
        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.state.current_view, View::AdminDashboard);
        assert_eq!(app.state.students.len(), 1);
        assert_eq!(app.state.role(), Some(Role::Admin));
        let stored = SessionStore::at(dir.path().join("session.json"))
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(stored.token.as_deref(), Some("opaque-token"));
        // Last used role is remembered
        let config = TuiConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.default_role(), Role::Admin);
    }

    #[tokio::test]
    async fn test_signed_in_student_skips_login_form() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Student);
        let mut mock = MockPortalApi::new();
        mock.expect_get_my_application()
            .times(1)
            .returning(|| Ok(None));
        let mut app = build_app(mock, &dir);

        app.open_view(View::Login).await;
        assert_eq!(app.state.current_view, View::StudentDashboard);
        assert!(app.state.application_loaded);
        assert!(matches!(app.state.form, FormState::None));
    }

    #[tokio::test]
    async fn test_ctrl_u_clears_the_active_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = build_app(MockPortalApi::new(), &dir);

        app.open_view(View::Login).await;
        type_text(&mut app, "typo@uni.edu").await;
        app.handle_key(ctrl('u')).await.unwrap();
        match &app.state.form {
            FormState::Login(form) => assert_eq!(form.email.as_text(), ""),
            other => panic!("unexpected {other:?}"),
        }

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        app.open_view(View::Apply).await;
        type_text(&mut app, "Asha").await;
        app.handle_key(ctrl('u')).await.unwrap();
        assert_eq!(app.state.wizard.draft().text(DraftField::FirstName), "");
    }

    #[tokio::test]
    async fn test_login_with_empty_fields_shows_form_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = build_app(MockPortalApi::new(), &dir);
        app.open_view(View::Login).await;

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        match &app.state.form {
            FormState::Login(form) => assert_eq!(
                form.error.as_deref(),
                Some("Email and password are required")
            ),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_credentials_stay_on_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut mock = MockPortalApi::new();
        mock.expect_login().times(1).returning(|_, _, _| {
            Err(ApiError::Unauthorized {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        });
        let mut app = build_app(mock, &dir);
        app.open_view(View::Login).await;
        type_text(&mut app, "a@b.co").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut app, "wrong").await;
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::Login);
        match &app.state.form {
            FormState::Login(form) => {
                assert_eq!(form.error.as_deref(), Some("Invalid credentials"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Student);
        let mut mock = MockPortalApi::new();
        mock.expect_logout().times(1).returning(|| Ok(()));
        let mut app = build_app(mock, &dir);

        app.activate_home_item(HomeItem::Logout).await;
        assert!(app.state.session.is_none());
        assert!(!dir.path().join("session.json").exists());
        assert_eq!(app.status_message.as_deref(), Some("Logged out"));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Admin);
        let mut mock = MockPortalApi::new();
        mock.expect_list_students()
            .returning(|| Ok(vec![student("1", "Asha"), student("2", "Bibek")]));
        let mut remaining = 3;
        mock.expect_dashboard_stats().times(2).returning(move || {
            remaining -= 1;
            Ok(DashboardStats {
                total_students: remaining,
                ..DashboardStats::default()
            })
        });
        mock.expect_delete_student()
            .withf(|id| id.as_str() == "2")
            .times(1)
            .returning(|_| Ok(()));
        let mut app = build_app(mock, &dir);
        app.open_view(View::AdminDashboard).await;

        app.handle_key(key(KeyCode::Down)).await.unwrap();
        app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
        assert!(app.state.confirm.is_some());
        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.state.confirm.is_none());
        assert_eq!(app.state.students.len(), 2);

        app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
        app.handle_key(key(KeyCode::Char('y'))).await.unwrap();
        assert_eq!(app.state.students.len(), 1);
        assert_eq!(app.state.selected_index, 0);
        assert_eq!(app.state.stats.as_ref().map(|s| s.total_students), Some(1));
    }

    #[tokio::test]
    async fn test_status_change_updates_local_list() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Admin);
        let mut mock = MockPortalApi::new();
        mock.expect_list_students()
            .times(1)
            .returning(|| Ok(vec![student("7", "Asha")]));
        mock.expect_dashboard_stats()
            .times(2)
            .returning(|| Ok(DashboardStats::default()));
        mock.expect_update_student_status()
            .withf(|id, status| id.as_str() == "7" && *status == ApplicationStatus::Approved)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut app = build_app(mock, &dir);
        app.open_view(View::AdminDashboard).await;

        app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
        assert_eq!(app.state.students[0].status, ApplicationStatus::Approved);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Status updated to approved")
        );
    }

    #[tokio::test]
    async fn test_search_mode_captures_typing() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Admin);
        let mut mock = MockPortalApi::new();
        mock.expect_list_students()
            .returning(|| Ok(vec![student("1", "Asha"), student("2", "Bibek")]));
        mock.expect_dashboard_stats()
            .returning(|| Ok(DashboardStats::default()));
        let mut app = build_app(mock, &dir);
        app.open_view(View::AdminDashboard).await;

        app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
        // 'a' and 'd' are search text here, not shortcuts
        type_text(&mut app, "bib").await;
        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        assert!(!app.state.search_active);
        assert_eq!(app.state.filtered_students().len(), 1);
        assert_eq!(app.state.selected_student().map(|s| s.name.as_str()), Some("Bibek"));
    }

    #[tokio::test]
    async fn test_student_edit_validation_and_save() {
        let dir = tempfile::tempdir().unwrap();
        store_session(&dir, Role::Admin);
        let mut mock = MockPortalApi::new();
        mock.expect_list_students()
            .returning(|| Ok(vec![student("1", "Asha")]));
        mock.expect_dashboard_stats()
            .returning(|| Ok(DashboardStats::default()));
        mock.expect_create_student()
            .withf(|input| input.name == "Chandra" && input.email == "c@uni.edu")
            .times(1)
            .returning(|_| Ok(()));
        let mut app = build_app(mock, &dir);
        app.open_view(View::AdminDashboard).await;

        app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.state.current_view, View::StudentEdit);
        app.handle_key(ctrl('s')).await.unwrap();
        assert_eq!(app.state.current_view, View::StudentEdit);

        type_text(&mut app, "Chandra").await;
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut app, "c@uni.edu").await;
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::AdminDashboard);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Student added successfully")
        );
    }

    #[tokio::test]
    async fn test_error_dialog_is_modal() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = build_app(MockPortalApi::new(), &dir);
        app.push_error("boom");

        app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
        assert!(app.should_quit());
    }
}
