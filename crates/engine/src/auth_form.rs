//! The credential form component.
//!
//! A flat state machine over three inputs and two modes, driven by the
//! gateway's current-user signal: whenever the session holds a user the
//! rendered view is the authenticated greeting, regardless of mode.

use crate::{
    gateway::{IdentityError, IdentityGateway},
    session::Session,
    validate,
};

/// Provider name passed to the gateway's federated flow.
pub const FEDERATED_PROVIDER: &str = "google";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// What the auth screen should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthView {
    Authenticated { greeting: String },
    Form(AuthMode),
}

#[derive(Debug)]
pub struct AuthFormState {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub confirm_password_error: Option<String>,
    /// Operation-level error banner shown near the form.
    pub error: Option<String>,
    pub mode: AuthMode,
}

impl Default for AuthFormState {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            email_error: None,
            password_error: None,
            confirm_password_error: None,
            error: None,
            mode: AuthMode::SignIn,
        }
    }
}

pub struct AuthForm<G> {
    gateway: G,
    session: Session,
    pub state: AuthFormState,
}

impl<G: IdentityGateway> AuthForm<G> {
    pub fn new(gateway: G, session: Session) -> Self {
        Self {
            gateway,
            session,
            state: AuthFormState::default(),
        }
    }

    /// The view is authenticated whenever the gateway reports a current
    /// user; the form mode only matters while signed out.
    #[must_use]
    pub fn view(&self) -> AuthView {
        match self.session.current_user() {
            Some(user) => AuthView::Authenticated {
                greeting: format!(
                    "Welcome, {}!",
                    user.display_name.unwrap_or(user.email)
                ),
            },
            None => AuthView::Form(self.state.mode),
        }
    }

    /// Stores the email input and recomputes its field error. No
    /// network call.
    pub fn change_email(&mut self, value: &str) {
        self.state.email = value.to_string();
        self.state.email_error = if validate::is_valid_email(value) {
            None
        } else {
            Some("Invalid email format".to_string())
        };
    }

    /// Stores the password input and recomputes its field error.
    pub fn change_password(&mut self, value: &str) {
        self.state.password = value.to_string();
        self.state.password_error = if validate::is_valid_password(value) {
            None
        } else {
            Some("Password must be at least 6 characters".to_string())
        };
    }

    /// Stores the confirmation input; the error compares against the
    /// password as it is right now (a later password change does not
    /// re-validate the confirmation).
    pub fn change_confirm_password(&mut self, value: &str) {
        self.state.confirm_password = value.to_string();
        self.state.confirm_password_error = if self.state.password == value {
            None
        } else {
            Some("Passwords do not match".to_string())
        };
    }

    pub fn show_sign_up(&mut self) {
        self.state.mode = AuthMode::SignUp;
    }

    pub fn show_sign_in(&mut self) {
        self.state.mode = AuthMode::SignIn;
    }

    /// Registers a new account. Guarded: empty inputs set the banner
    /// and skip the call; a pending field error skips it silently.
    ///
    /// On success the form lands on the sign-in mode. The gateway may
    /// already have signed the user in as a registration side effect;
    /// that is gateway behavior, observed through the session.
    pub async fn sign_up(&mut self) {
        self.state.error = None;
        if self.state.email.is_empty()
            || self.state.password.is_empty()
            || self.state.confirm_password.is_empty()
        {
            self.state.error = Some("All fields are required.".to_string());
            return;
        }
        if self.state.email_error.is_some()
            || self.state.password_error.is_some()
            || self.state.confirm_password_error.is_some()
        {
            return;
        }

        match self
            .gateway
            .register(&self.state.email, &self.state.password)
            .await
        {
            Ok(_) => self.state.mode = AuthMode::SignIn,
            Err(err) if err.is_email_already_in_use() => {
                self.state.error =
                    Some("This email is already in use. Please sign in instead.".to_string());
            }
            Err(err) => self.state.error = Some(err.to_string()),
        }
    }

    /// Signs in with the current credentials. Guarded like [`sign_up`]:
    /// empty inputs set the banner, pending field errors skip silently.
    ///
    /// [`sign_up`]: AuthForm::sign_up
    pub async fn sign_in(&mut self) {
        self.state.error = None;
        if self.state.email.is_empty() || self.state.password.is_empty() {
            self.state.error = Some("Email and password are required.".to_string());
            return;
        }
        if self.state.email_error.is_some() || self.state.password_error.is_some() {
            return;
        }

        if let Err(err) = self
            .gateway
            .sign_in(&self.state.email, &self.state.password)
            .await
        {
            self.state.error = Some(err.to_string());
        }
    }

    /// Delegates to the gateway's federated flow. No local validation;
    /// errors are not handled here, the caller decides.
    pub async fn sign_in_federated(&mut self) -> Result<(), IdentityError> {
        self.gateway.sign_in_federated(FEDERATED_PROVIDER).await?;
        Ok(())
    }

    /// Delegates to the gateway. No local error handling.
    pub async fn sign_out(&mut self) -> Result<(), IdentityError> {
        self.gateway.sign_out().await
    }
}
