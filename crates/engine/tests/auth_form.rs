use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use api_types::user::UserView;
use async_trait::async_trait;
use engine::{
    AuthForm, AuthMode, AuthView, AuthedUser, CODE_EMAIL_ALREADY_IN_USE, IdentityError,
    IdentityGateway, Session, SessionWriter, session,
};

#[derive(Default)]
struct GatewayLog {
    register_calls: Vec<(String, String)>,
    sign_in_calls: Vec<(String, String)>,
    federated_calls: Vec<String>,
    sign_out_calls: usize,
}

struct Inner {
    writer: SessionWriter,
    log: Mutex<GatewayLog>,
    /// email -> password of pre-existing accounts.
    accounts: Mutex<HashMap<String, String>>,
    federated_failure: Mutex<Option<String>>,
}

/// In-memory identity gateway double. Publishes auth transitions to the
/// session channel the way the real client does.
#[derive(Clone)]
struct FakeGateway(Arc<Inner>);

impl FakeGateway {
    fn new(writer: SessionWriter) -> Self {
        Self(Arc::new(Inner {
            writer,
            log: Mutex::new(GatewayLog::default()),
            accounts: Mutex::new(HashMap::new()),
            federated_failure: Mutex::new(None),
        }))
    }

    fn with_account(self, email: &str, password: &str) -> Self {
        self.0
            .accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        self
    }

    fn failing_federated(self, message: &str) -> Self {
        *self.0.federated_failure.lock().unwrap() = Some(message.to_string());
        self
    }

    fn total_calls(&self) -> usize {
        let log = self.0.log.lock().unwrap();
        log.register_calls.len()
            + log.sign_in_calls.len()
            + log.federated_calls.len()
            + log.sign_out_calls
    }

    fn user_for(email: &str) -> UserView {
        UserView {
            id: format!("uid-{email}"),
            email: email.to_string(),
            display_name: None,
        }
    }

    fn publish(&self, user: UserView) {
        let token = format!("token-{}", user.id);
        self.0.writer.publish(Some(AuthedUser { user, token }));
    }
}

#[async_trait]
impl IdentityGateway for FakeGateway {
    async fn register(&self, email: &str, password: &str) -> Result<UserView, IdentityError> {
        self.0
            .log
            .lock()
            .unwrap()
            .register_calls
            .push((email.to_string(), password.to_string()));

        let mut accounts = self.0.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(IdentityError::Rejected {
                code: Some(CODE_EMAIL_ALREADY_IN_USE.to_string()),
                message: "EMAIL_EXISTS".to_string(),
            });
        }
        accounts.insert(email.to_string(), password.to_string());
        drop(accounts);

        // Registration signs the new user in, mirroring the gateway's
        // side effect.
        let user = Self::user_for(email);
        self.publish(user.clone());
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserView, IdentityError> {
        self.0
            .log
            .lock()
            .unwrap()
            .sign_in_calls
            .push((email.to_string(), password.to_string()));

        let accounts = self.0.accounts.lock().unwrap();
        if accounts.get(email).map(String::as_str) != Some(password) {
            return Err(IdentityError::Rejected {
                code: None,
                message: "INVALID_LOGIN_CREDENTIALS".to_string(),
            });
        }
        drop(accounts);

        let user = Self::user_for(email);
        self.publish(user.clone());
        Ok(user)
    }

    async fn sign_in_federated(&self, provider: &str) -> Result<UserView, IdentityError> {
        self.0
            .log
            .lock()
            .unwrap()
            .federated_calls
            .push(provider.to_string());

        if let Some(message) = self.0.federated_failure.lock().unwrap().clone() {
            return Err(IdentityError::Rejected {
                code: None,
                message,
            });
        }

        let user = UserView {
            id: "uid-federated".to_string(),
            email: "federated@example.com".to_string(),
            display_name: Some("Fed User".to_string()),
        };
        self.publish(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.0.log.lock().unwrap().sign_out_calls += 1;
        self.0.writer.publish(None);
        Ok(())
    }
}

fn form() -> (AuthForm<FakeGateway>, FakeGateway, Session) {
    let (writer, session) = session::channel();
    let gateway = FakeGateway::new(writer);
    let form = AuthForm::new(gateway.clone(), session.clone());
    (form, gateway, session)
}

#[tokio::test]
async fn sign_up_with_missing_fields_sets_banner_and_skips_gateway() {
    let (mut form, gateway, _session) = form();
    form.change_password("x");
    form.change_confirm_password("x");

    form.sign_up().await;

    assert_eq!(form.state.error.as_deref(), Some("All fields are required."));
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn sign_up_with_field_errors_is_a_silent_no_op() {
    let (mut form, gateway, _session) = form();
    form.change_email("user@example.com");
    form.change_password("abc");
    form.change_confirm_password("abc");

    form.sign_up().await;

    assert!(form.state.error.is_none());
    assert_eq!(
        form.state.password_error.as_deref(),
        Some("Password must be at least 6 characters")
    );
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn sign_up_success_lands_on_sign_in_with_a_live_session() {
    let (mut form, gateway, session) = form();
    form.show_sign_up();
    form.change_email("user@example.com");
    form.change_password("secret1");
    form.change_confirm_password("secret1");

    form.sign_up().await;

    assert_eq!(form.state.mode, AuthMode::SignIn);
    assert!(form.state.error.is_none());
    assert_eq!(gateway.total_calls(), 1);
    // The gateway signed the new user in as a side effect.
    assert_eq!(
        session.current_user().map(|u| u.email),
        Some("user@example.com".to_string())
    );
    assert!(matches!(form.view(), AuthView::Authenticated { .. }));
}

#[tokio::test]
async fn sign_up_duplicate_email_maps_the_friendly_message() {
    let (writer, session) = session::channel();
    let gateway = FakeGateway::new(writer).with_account("taken@example.com", "secret1");
    let mut form = AuthForm::new(gateway.clone(), session);
    form.show_sign_up();
    form.change_email("taken@example.com");
    form.change_password("secret1");
    form.change_confirm_password("secret1");

    form.sign_up().await;

    assert_eq!(
        form.state.error.as_deref(),
        Some("This email is already in use. Please sign in instead.")
    );
    assert_eq!(form.state.mode, AuthMode::SignUp);
}

#[tokio::test]
async fn sign_in_with_short_password_is_blocked_locally() {
    let (mut form, gateway, _session) = form();
    form.change_email("user@example.com");
    form.change_password("ab");

    form.sign_in().await;

    assert_eq!(
        form.state.password_error.as_deref(),
        Some("Password must be at least 6 characters")
    );
    assert!(form.state.error.is_none());
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn sign_in_with_missing_fields_sets_banner() {
    let (mut form, gateway, _session) = form();
    form.change_email("user@example.com");

    form.sign_in().await;

    assert_eq!(
        form.state.error.as_deref(),
        Some("Email and password are required.")
    );
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn sign_in_failure_shows_the_raw_gateway_message() {
    let (writer, session) = session::channel();
    let gateway = FakeGateway::new(writer).with_account("user@example.com", "secret1");
    let mut form = AuthForm::new(gateway, session.clone());
    form.change_email("user@example.com");
    form.change_password("wrong-password");

    form.sign_in().await;

    assert_eq!(
        form.state.error.as_deref(),
        Some("INVALID_LOGIN_CREDENTIALS")
    );
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn sign_in_success_renders_the_greeting() {
    let (writer, session) = session::channel();
    let gateway = FakeGateway::new(writer).with_account("user@example.com", "secret1");
    let mut form = AuthForm::new(gateway, session);
    form.change_email("user@example.com");
    form.change_password("secret1");

    form.sign_in().await;

    assert_eq!(
        form.view(),
        AuthView::Authenticated {
            greeting: "Welcome, user@example.com!".to_string()
        }
    );
}

#[tokio::test]
async fn federated_greeting_prefers_the_display_name() {
    let (mut form, _gateway, _session) = form();

    form.sign_in_federated().await.unwrap();

    assert_eq!(
        form.view(),
        AuthView::Authenticated {
            greeting: "Welcome, Fed User!".to_string()
        }
    );
}

#[tokio::test]
async fn federated_errors_propagate_to_the_caller() {
    let (writer, session) = session::channel();
    let gateway = FakeGateway::new(writer).failing_federated("popup closed");
    let mut form = AuthForm::new(gateway, session);

    let err = form.sign_in_federated().await.unwrap_err();

    assert_eq!(err.to_string(), "popup closed");
    // Not caught locally: the banner stays untouched.
    assert!(form.state.error.is_none());
}

#[tokio::test]
async fn sign_out_clears_the_session() {
    let (mut form, _gateway, session) = form();
    form.sign_in_federated().await.unwrap();
    assert!(session.is_signed_in());

    form.sign_out().await.unwrap();

    assert!(!session.is_signed_in());
    assert_eq!(form.view(), AuthView::Form(AuthMode::SignIn));
}
