use std::time::Duration;

use api_types::{Category, expense::ExpenseRecord};
use chrono_tz::Tz;
use client::{IdentityClient, StoreClient};
use crossterm::event::{self, Event, KeyEvent};
use engine::{AuthForm, AuthMode, EngineError, ExpenseManager, ExpenseState, Session};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Add,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Add => "Add Expense",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Amount,
    Category,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Amount,
    Category,
    Description,
}

#[derive(Debug)]
pub struct UiState {
    pub section: Section,
    pub auth_focus: AuthField,
    pub add_focus: AddField,
    pub edit_focus: EditField,
    /// Selected row of the filtered table.
    pub selected: usize,
    /// Last record-store failure, shown in the info bar.
    pub status: Option<String>,
    pub timezone: Tz,
}

pub struct App {
    pub auth: AuthForm<IdentityClient>,
    pub expenses: ExpenseManager<StoreClient>,
    pub session: Session,
    pub ui: UiState,
    last_user: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let identity = IdentityClient::new(&config.identity_url, &config.api_key)?;
        let session = identity.session();
        let store = StoreClient::new(&config.store_url, &config.api_key, session.clone())?;

        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| AppError::Terminal(format!("invalid timezone: {}", config.timezone)))?;

        let mut auth = AuthForm::new(identity, session.clone());
        if !config.email.is_empty() {
            auth.change_email(&config.email);
        }
        let expenses = ExpenseManager::new(store, session.clone());

        Ok(Self {
            auth,
            expenses,
            session,
            ui: UiState {
                section: Section::Dashboard,
                auth_focus: AuthField::Email,
                add_focus: AddField::Amount,
                edit_focus: EditField::Amount,
                selected: 0,
                status: None,
                timezone,
            },
            last_user: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.observe_session().await;

            terminal
                .draw(|frame| ui::render(frame, self))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Reacts to auth-state transitions: entering a signed-in state
    /// fetches the owner's records, signing out drops all expense
    /// state so the next session starts clean.
    async fn observe_session(&mut self) {
        let user_id = self.session.current_user().map(|user| user.id);
        if user_id == self.last_user {
            return;
        }

        if user_id.is_some() {
            if let Err(err) = self.expenses.fetch_expenses().await {
                self.report_store_error(&err);
            }
            self.ui.section = Section::Dashboard;
        } else {
            self.expenses.state = ExpenseState::default();
            self.ui.status = None;
        }
        self.ui.selected = 0;
        self.last_user = user_id;
    }

    fn report_store_error(&mut self, err: &EngineError) {
        // No retry; the failure is recorded and surfaced in the info
        // bar.
        tracing::error!("record store operation failed: {err}");
        self.ui.status = Some(err.to_string());
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        if self.session.current_user().is_some() {
            self.handle_tracker_key(action).await;
        } else {
            self.handle_auth_key(action).await;
        }
    }

    async fn handle_auth_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => self.should_quit = true,
            AppAction::NextField => self.advance_auth_focus(),
            AppAction::ToggleAuthMode => {
                match self.auth.state.mode {
                    AuthMode::SignIn => self.auth.show_sign_up(),
                    AuthMode::SignUp => self.auth.show_sign_in(),
                }
                self.ui.auth_focus = AuthField::Email;
            }
            AppAction::FederatedSignIn => {
                // The form does not catch these; the gateway flow owns
                // its own handling, we only record the outcome.
                if let Err(err) = self.auth.sign_in_federated().await {
                    tracing::warn!("federated sign-in failed: {err}");
                }
            }
            AppAction::Submit => match self.auth.state.mode {
                AuthMode::SignIn => self.auth.sign_in().await,
                AuthMode::SignUp => self.auth.sign_up().await,
            },
            AppAction::Backspace => {
                let mut value = self.auth_field_value().to_string();
                value.pop();
                self.apply_auth_input(value);
            }
            AppAction::Input(ch) => {
                let mut value = self.auth_field_value().to_string();
                value.push(ch);
                self.apply_auth_input(value);
            }
            _ => {}
        }
    }

    fn advance_auth_focus(&mut self) {
        self.ui.auth_focus = match (self.ui.auth_focus, self.auth.state.mode) {
            (AuthField::Email, _) => AuthField::Password,
            (AuthField::Password, AuthMode::SignUp) => AuthField::ConfirmPassword,
            (AuthField::Password, AuthMode::SignIn) => AuthField::Email,
            (AuthField::ConfirmPassword, _) => AuthField::Email,
        };
    }

    fn auth_field_value(&self) -> &str {
        match self.ui.auth_focus {
            AuthField::Email => &self.auth.state.email,
            AuthField::Password => &self.auth.state.password,
            AuthField::ConfirmPassword => &self.auth.state.confirm_password,
        }
    }

    /// Routes edited text through the form's change operations so the
    /// field errors track every keystroke.
    fn apply_auth_input(&mut self, value: String) {
        match self.ui.auth_focus {
            AuthField::Email => self.auth.change_email(&value),
            AuthField::Password => self.auth.change_password(&value),
            AuthField::ConfirmPassword => self.auth.change_confirm_password(&value),
        }
    }

    async fn handle_tracker_key(&mut self, action: AppAction) {
        if self.expenses.state.editing.is_some() {
            self.handle_edit_key(action).await;
            return;
        }

        match self.ui.section {
            Section::Dashboard => self.handle_dashboard_key(action).await,
            Section::Add => self.handle_add_key(action).await,
        }
    }

    async fn handle_dashboard_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up => self.select_prev(),
            AppAction::Down => self.select_next(),
            AppAction::Submit => self.start_editing_selected(),
            AppAction::Input(ch) => match ch {
                'q' => self.should_quit = true,
                'a' => {
                    self.ui.section = Section::Add;
                    self.ui.add_focus = AddField::Amount;
                }
                'j' => self.select_next(),
                'k' => self.select_prev(),
                'e' => self.start_editing_selected(),
                'x' => self.delete_selected().await,
                'f' => {
                    self.expenses.state.filter = self.expenses.state.filter.next();
                    self.clamp_selection();
                }
                'r' => {
                    self.ui.status = None;
                    if let Err(err) = self.expenses.fetch_expenses().await {
                        self.report_store_error(&err);
                    }
                    self.clamp_selection();
                }
                'o' => {
                    if let Err(err) = self.auth.sign_out().await {
                        tracing::warn!("sign-out failed: {err}");
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    async fn handle_add_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => self.ui.section = Section::Dashboard,
            AppAction::NextField => {
                self.ui.add_focus = match self.ui.add_focus {
                    AddField::Amount => AddField::Category,
                    AddField::Category => AddField::Description,
                    AddField::Description => AddField::Amount,
                };
            }
            AppAction::Submit => {
                self.ui.status = None;
                if let Err(err) = self.expenses.add_expense().await {
                    self.report_store_error(&err);
                }
                self.clamp_selection();
            }
            AppAction::Left | AppAction::Up => {
                if self.ui.add_focus == AddField::Category {
                    self.expenses.state.category_input =
                        category_prev(self.expenses.state.category_input);
                }
            }
            AppAction::Right | AppAction::Down => {
                if self.ui.add_focus == AddField::Category {
                    self.expenses.state.category_input =
                        category_next(self.expenses.state.category_input);
                }
            }
            AppAction::Backspace => match self.ui.add_focus {
                AddField::Amount => {
                    self.expenses.state.amount_input.pop();
                    self.expenses.state.amount_error = None;
                }
                AddField::Description => {
                    self.expenses.state.description_input.pop();
                }
                AddField::Category => {}
            },
            AppAction::Input(ch) => match self.ui.add_focus {
                AddField::Amount => {
                    self.expenses.state.amount_input.push(ch);
                    self.expenses.state.amount_error = None;
                }
                AddField::Description => self.expenses.state.description_input.push(ch),
                AddField::Category => {}
            },
            _ => {}
        }
    }

    async fn handle_edit_key(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => self.expenses.cancel_editing(),
            AppAction::NextField => {
                self.ui.edit_focus = match self.ui.edit_focus {
                    EditField::Amount => EditField::Category,
                    EditField::Category => EditField::Description,
                    EditField::Description => EditField::Amount,
                };
            }
            AppAction::Submit => {
                self.ui.status = None;
                if let Err(err) = self.expenses.update_expense().await {
                    self.report_store_error(&err);
                }
                self.clamp_selection();
            }
            AppAction::Left | AppAction::Up => {
                if self.ui.edit_focus == EditField::Category {
                    if let Some(draft) = self.expenses.state.editing.as_mut() {
                        draft.category = category_prev(draft.category);
                    }
                }
            }
            AppAction::Right | AppAction::Down => {
                if self.ui.edit_focus == EditField::Category {
                    if let Some(draft) = self.expenses.state.editing.as_mut() {
                        draft.category = category_next(draft.category);
                    }
                }
            }
            AppAction::Backspace => {
                if let Some(draft) = self.expenses.state.editing.as_mut() {
                    match self.ui.edit_focus {
                        EditField::Amount => {
                            draft.amount_input.pop();
                            draft.amount_error = None;
                        }
                        EditField::Description => {
                            draft.description.pop();
                        }
                        EditField::Category => {}
                    }
                }
            }
            AppAction::Input(ch) => {
                if let Some(draft) = self.expenses.state.editing.as_mut() {
                    match self.ui.edit_focus {
                        EditField::Amount => {
                            draft.amount_input.push(ch);
                            draft.amount_error = None;
                        }
                        EditField::Description => draft.description.push(ch),
                        EditField::Category => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn selected_record(&self) -> Option<ExpenseRecord> {
        self.expenses
            .filtered()
            .get(self.ui.selected)
            .map(|record| (*record).clone())
    }

    fn start_editing_selected(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        self.expenses.start_editing(&record);
        self.ui.edit_focus = EditField::Amount;
    }

    async fn delete_selected(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        self.ui.status = None;
        if let Err(err) = self.expenses.delete_expense(&record.id).await {
            self.report_store_error(&err);
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.expenses.filtered().len();
        self.ui.selected = self.ui.selected.min(len.saturating_sub(1));
    }

    fn select_next(&mut self) {
        let len = self.expenses.filtered().len();
        if len == 0 {
            return;
        }
        self.ui.selected = (self.ui.selected + 1).min(len - 1);
    }

    fn select_prev(&mut self) {
        self.ui.selected = self.ui.selected.saturating_sub(1);
    }
}

fn category_next(current: Category) -> Category {
    let pos = Category::ALL
        .iter()
        .position(|c| *c == current)
        .unwrap_or(0);
    Category::ALL[(pos + 1) % Category::ALL.len()]
}

fn category_prev(current: Category) -> Category {
    let pos = Category::ALL
        .iter()
        .position(|c| *c == current)
        .unwrap_or(0);
    Category::ALL[(pos + Category::ALL.len() - 1) % Category::ALL.len()]
}
