use super::payload::BadgePayload;

/// Identity handed to the caller after a badge validated
///
/// `timestamp` is when the badge was validated, not when it was written. The caller decides
/// whether and how to persist any of this
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct NfcUserData {
    pub user_id: String,
    pub token: Option<String>,
    pub email: Option<String>,
    pub timestamp: i64,
}

impl BadgePayload {
    pub fn into_user_data(self, validated_at: i64) -> NfcUserData {
        let token = self.auth_token().filter(|token| !token.is_empty()).map(str::to_string);
        let email = self.email().filter(|email| !email.is_empty()).map(str::to_string);

        NfcUserData {
            user_id: self.user_id,
            token,
            email,
            timestamp: validated_at,
        }
    }
}
