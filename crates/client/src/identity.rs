use api_types::user::{AuthSuccess, Credentials, FederatedSignIn, UserView};
use async_trait::async_trait;
use engine::{AuthedUser, IdentityError, IdentityGateway, Session, SessionWriter, session};
use reqwest::Url;
use serde::Serialize;

use crate::{API_KEY_HEADER, ClientError, ErrorResponse};

/// Client for the identity gateway.
///
/// Owns the session write half: every successful auth operation is
/// published to the channel, so the components observe transitions
/// without touching this client directly.
#[derive(Debug)]
pub struct IdentityClient {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
    writer: SessionWriter,
    session: Session,
}

impl IdentityClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        let (writer, session) = session::channel();
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            writer,
            session,
        })
    }

    /// Read-side handle observing the current user.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.clone()
    }

    async fn auth_post<T>(&self, path: &str, payload: &T) -> Result<AuthSuccess, IdentityError>
    where
        T: Serialize + Sync,
    {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| IdentityError::Transport(format!("invalid endpoint: {err}")))?;

        let res = self
            .http
            .post(endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;

        if res.status().is_success() {
            return res
                .json::<AuthSuccess>()
                .await
                .map_err(|err| IdentityError::Transport(err.to_string()));
        }

        let status = res.status();
        let (message, code) = match res.json::<ErrorResponse>().await {
            Ok(body) => (body.error, body.code),
            Err(_) => ("unknown error".to_string(), None),
        };
        tracing::warn!("identity gateway rejected {path}: {status} {message}");
        Err(IdentityError::Rejected { code, message })
    }

    fn publish(&self, success: &AuthSuccess) {
        self.writer.publish(Some(AuthedUser {
            user: success.user.clone(),
            token: success.token.clone(),
        }));
    }
}

#[async_trait]
impl IdentityGateway for IdentityClient {
    async fn register(&self, email: &str, password: &str) -> Result<UserView, IdentityError> {
        let success = self
            .auth_post(
                "auth/register",
                &Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        // The gateway signs the freshly registered user in.
        self.publish(&success);
        Ok(success.user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserView, IdentityError> {
        let success = self
            .auth_post(
                "auth/signin",
                &Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        self.publish(&success);
        Ok(success.user)
    }

    async fn sign_in_federated(&self, provider: &str) -> Result<UserView, IdentityError> {
        let success = self
            .auth_post(
                "auth/federated",
                &FederatedSignIn {
                    provider: provider.to_string(),
                },
            )
            .await?;
        self.publish(&success);
        Ok(success.user)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let token = self.session.token();
        // Local sign-out is immediate; the session clears even when the
        // gateway cannot be reached.
        self.writer.publish(None);

        let endpoint = self
            .base_url
            .join("auth/signout")
            .map_err(|err| IdentityError::Transport(format!("invalid endpoint: {err}")))?;

        let mut request = self.http.post(endpoint).header(API_KEY_HEADER, &self.api_key);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let res = request
            .send()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;

        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let (message, code) = match res.json::<ErrorResponse>().await {
            Ok(body) => (body.error, body.code),
            Err(_) => ("unknown error".to_string(), None),
        };
        tracing::warn!("identity gateway rejected sign-out: {status} {message}");
        Err(IdentityError::Rejected { code, message })
    }
}
