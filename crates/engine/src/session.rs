//! The current-user signal shared by both application components.
//!
//! The identity gateway publishes every auth-state transition to a
//! watch channel; components hold a read-side [`Session`] handle that
//! is passed in explicitly (no global singleton).

use api_types::user::UserView;
use tokio::sync::watch;

/// A signed-in user together with the bearer token scoping their
/// record-store calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthedUser {
    pub user: UserView,
    pub token: String,
}

/// Creates a new session channel. The write half belongs to the
/// identity gateway implementation; the read half is cloned into every
/// component that observes the current user.
#[must_use]
pub fn channel() -> (SessionWriter, Session) {
    let (tx, rx) = watch::channel(None);
    (SessionWriter { tx }, Session { rx })
}

/// Write half of the session channel.
#[derive(Debug)]
pub struct SessionWriter {
    tx: watch::Sender<Option<AuthedUser>>,
}

impl SessionWriter {
    /// Publishes a new auth state. `None` means signed out.
    pub fn publish(&self, value: Option<AuthedUser>) {
        // A send only fails when every receiver is gone, in which case
        // nobody observes auth state anyway.
        let _ = self.tx.send(value);
    }

    /// Mints an additional read handle.
    #[must_use]
    pub fn subscribe(&self) -> Session {
        Session {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read half of the session channel.
#[derive(Clone, Debug)]
pub struct Session {
    rx: watch::Receiver<Option<AuthedUser>>,
}

impl Session {
    /// The currently signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserView> {
        self.rx.borrow().as_ref().map(|authed| authed.user.clone())
    }

    /// The bearer token of the current session, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.rx.borrow().as_ref().map(|authed| authed.token.clone())
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Waits for the next auth-state transition. Returns `false` when
    /// the write half has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
