/// The identity record carried on a badge
///
/// Only ever constructed by the encoder's callers or by a successful decode, a decoded
/// payload has a non-empty `user_id` and the app marker of the policy it was checked against
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct BadgePayload {
    pub user_id: String,
    pub app_marker: String,
    pub variant: BadgeVariant,
}

/// The two payload shapes written over the life of the app
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum BadgeVariant {
    /// Carries the session token and the time the badge was written
    Token {
        email: Option<String>,
        token: Option<String>,
        issued_at: Option<i64>,
    },

    /// Only identifies the account
    Minimal { version: Option<String> },
}

impl BadgePayload {
    pub fn minimal(
        user_id: impl Into<String>,
        app_marker: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            app_marker: app_marker.into(),
            variant: BadgeVariant::Minimal { version },
        }
    }

    pub fn with_token(
        user_id: impl Into<String>,
        app_marker: impl Into<String>,
        email: Option<String>,
        token: Option<String>,
        issued_at: Option<i64>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            app_marker: app_marker.into(),
            variant: BadgeVariant::Token {
                email,
                token,
                issued_at,
            },
        }
    }

    pub fn auth_token(&self) -> Option<&str> {
        match &self.variant {
            BadgeVariant::Token { token, .. } => token.as_deref(),
            BadgeVariant::Minimal { .. } => None,
        }
    }

    pub fn issued_at(&self) -> Option<i64> {
        match &self.variant {
            BadgeVariant::Token { issued_at, .. } => *issued_at,
            BadgeVariant::Minimal { .. } => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match &self.variant {
            BadgeVariant::Token { email, .. } => email.as_deref(),
            BadgeVariant::Minimal { .. } => None,
        }
    }

    pub fn schema_version(&self) -> Option<&str> {
        match &self.variant {
            BadgeVariant::Minimal { version } => version.as_deref(),
            BadgeVariant::Token { .. } => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self.variant {
            BadgeVariant::Token { .. } => "token",
            BadgeVariant::Minimal { .. } => "minimal",
        }
    }
}
