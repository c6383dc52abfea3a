use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::badge::{BadgePayload, NfcUserData, now_ms};

/// The remote side of a badge login, implemented by the host over its API client
///
/// Calls block until the exchange completes, timeouts are the host's concern
#[uniffi::export(callback_interface)]
pub trait BadgeAuthenticator: Send + Sync + std::fmt::Debug + 'static {
    fn authenticate_by_user_id(&self, user_id: String) -> Result<AuthResponse, AuthenticatorError>;

    fn validate_session_token(&self, token: String) -> Result<TokenValidation, AuthenticatorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct AuthResponse {
    pub success: bool,
    pub user_type: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct TokenValidation {
    pub success: bool,
    pub user_info: Option<BadgeUserInfo>,
}

/// Account details returned when a session token is accepted
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct BadgeUserInfo {
    pub user_id: String,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum AuthenticatorError {
    #[error("authentication service unreachable: {0}")]
    Unreachable(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for AuthenticatorError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Unreachable(error.reason)
    }
}

/// Which exchange established the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum, derive_more::Display)]
pub enum LoginRoute {
    #[display("session token")]
    SessionToken,

    #[display("user id")]
    UserId,
}

/// A logged in badge holder, the host decides what to persist
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct BadgeSession {
    pub user: NfcUserData,
    pub route: LoginRoute,
    pub user_type: Option<String>,
    pub user_info: Option<BadgeUserInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum LoginError {
    #[error("login refused for user {user_id}: {message}")]
    Refused { user_id: String, message: String },

    #[error("session token on the badge of user {user_id} was rejected")]
    TokenRejected { user_id: String },

    #[error(transparent)]
    Authenticator(#[from] AuthenticatorError),

    #[error("authentication task failed: {0}")]
    Task(String),
}

const DEFAULT_REFUSAL: &str = "login refused";

/// Log the badge holder in with the authenticator
///
/// A badge carrying a token goes through token validation only, a rejected token is a
/// failed login and is not retried with the user id
pub async fn authenticate(
    authenticator: Arc<dyn BadgeAuthenticator>,
    payload: BadgePayload,
) -> Result<BadgeSession, LoginError> {
    let user_id = payload.user_id.clone();
    let token = payload.auth_token().filter(|token| !token.is_empty()).map(str::to_string);

    let route = if token.is_some() {
        LoginRoute::SessionToken
    } else {
        LoginRoute::UserId
    };

    debug!("authenticating user {user_id} by {route}");

    let call_user_id = user_id.clone();
    let outcome = ecodeli_tokio::unblock::run_blocking(move || match token {
        Some(token) => authenticator.validate_session_token(token).map(Outcome::Token),
        None => authenticator.authenticate_by_user_id(call_user_id).map(Outcome::UserId),
    })
    .await
    .map_err(|error| LoginError::Task(error.to_string()))??;

    let session = |user_type: Option<String>, user_info: Option<BadgeUserInfo>| BadgeSession {
        user: payload.clone().into_user_data(now_ms()),
        route,
        user_type,
        user_info,
    };

    match outcome {
        Outcome::Token(TokenValidation { success: true, user_info }) => {
            info!("user {user_id} logged in with badge token");
            Ok(session(None, user_info))
        }
        Outcome::Token(TokenValidation { success: false, .. }) => {
            warn!("badge token of user {user_id} rejected");
            Err(LoginError::TokenRejected { user_id })
        }
        Outcome::UserId(AuthResponse {
            success: true,
            user_type,
            ..
        }) => {
            info!("user {user_id} logged in with badge user id");
            Ok(session(user_type, None))
        }
        Outcome::UserId(AuthResponse { success: false, message, .. }) => {
            let message = message.unwrap_or_else(|| DEFAULT_REFUSAL.to_string());
            warn!("login refused for user {user_id}: {message}");
            Err(LoginError::Refused { user_id, message })
        }
    }
}

enum Outcome {
    Token(TokenValidation),
    UserId(AuthResponse),
}
