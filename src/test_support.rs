//! In memory tag and authenticator used by the unit tests

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    manager::authenticator::{
        AuthResponse, AuthenticatorError, BadgeAuthenticator, BadgeUserInfo, TokenValidation,
    },
    tag::{TagIoError, TagTech, TagTransport},
};

#[derive(Debug, Default)]
struct FakeTagState {
    ndef: bool,
    formatable: bool,
    writable: bool,
    max_size: Option<u32>,
    contents: Option<Vec<u8>>,

    connect_error: Option<String>,
    io_error: Option<String>,

    connects: usize,
    closes: usize,
    formats: usize,
}

/// Clones share the same tag, so a clone can be handed to the code under test as a transport
#[derive(Debug, Clone, Default)]
pub struct FakeTag(Arc<Mutex<FakeTagState>>);

impl FakeTag {
    /// NDEF formatted, writable, holding the given message bytes
    pub fn formatted(contents: Vec<u8>) -> Self {
        Self::with_state(FakeTagState {
            ndef: true,
            writable: true,
            contents: Some(contents),
            ..Default::default()
        })
    }

    /// Unformatted tag that can be formatted with a first message
    pub fn blank() -> Self {
        Self::with_state(FakeTagState {
            formatable: true,
            writable: true,
            ..Default::default()
        })
    }

    /// Some other card, no NDEF at all
    pub fn unsupported() -> Self {
        Self::with_state(FakeTagState::default())
    }

    fn with_state(state: FakeTagState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    pub fn read_only(self) -> Self {
        self.0.lock().writable = false;
        self
    }

    pub fn with_max_size(self, max_size: u32) -> Self {
        self.0.lock().max_size = Some(max_size);
        self
    }

    pub fn fail_connect(&self, message: &str) {
        self.0.lock().connect_error = Some(message.to_string());
    }

    pub fn fail_io(&self, message: &str) {
        self.0.lock().io_error = Some(message.to_string());
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.0.lock().contents.clone()
    }

    pub fn connects(&self) -> usize {
        self.0.lock().connects
    }

    pub fn closes(&self) -> usize {
        self.0.lock().closes
    }

    pub fn formats(&self) -> usize {
        self.0.lock().formats
    }

    pub fn open_connections(&self) -> usize {
        let state = self.0.lock();
        state.connects - state.closes
    }

    fn io_result(state: &FakeTagState) -> Result<(), TagIoError> {
        match &state.io_error {
            Some(message) => Err(TagIoError::Io(message.clone())),
            None => Ok(()),
        }
    }
}

impl TagTransport for FakeTag {
    fn supports(&self, tech: TagTech) -> bool {
        let state = self.0.lock();
        match tech {
            TagTech::Ndef => state.ndef,
            TagTech::NdefFormatable => state.formatable,
        }
    }

    fn connect(&self, tech: TagTech) -> Result<(), TagIoError> {
        let mut state = self.0.lock();
        if let Some(message) = &state.connect_error {
            return Err(TagIoError::TagLost(message.clone()));
        }

        assert!(
            state.connects == state.closes,
            "connect over {tech} while another connection is open"
        );

        state.connects += 1;
        Ok(())
    }

    fn close(&self, _tech: TagTech) {
        self.0.lock().closes += 1;
    }

    fn is_writable(&self) -> bool {
        self.0.lock().writable
    }

    fn max_size(&self) -> Option<u32> {
        self.0.lock().max_size
    }

    fn read_ndef_message(&self) -> Result<Option<Vec<u8>>, TagIoError> {
        let state = self.0.lock();
        Self::io_result(&state)?;

        Ok(state.contents.clone())
    }

    fn write_ndef_message(&self, message: Vec<u8>) -> Result<(), TagIoError> {
        let mut state = self.0.lock();
        Self::io_result(&state)?;

        state.contents = Some(message);
        Ok(())
    }

    fn format_ndef(&self, message: Vec<u8>) -> Result<(), TagIoError> {
        let mut state = self.0.lock();
        Self::io_result(&state)?;

        state.formats += 1;
        state.ndef = true;
        state.formatable = false;
        state.contents = Some(message);
        Ok(())
    }
}

/// Records every call and answers with a fixed verdict
#[derive(Debug, Default)]
pub struct FakeAuthenticator {
    pub accept: bool,
    pub unreachable: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeAuthenticator {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            accept: true,
            ..Default::default()
        })
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl BadgeAuthenticator for FakeAuthenticator {
    fn authenticate_by_user_id(&self, user_id: String) -> Result<AuthResponse, AuthenticatorError> {
        self.calls.lock().push(format!("user_id:{user_id}"));
        if self.unreachable {
            return Err(AuthenticatorError::Unreachable("offline".into()));
        }

        Ok(AuthResponse {
            success: self.accept,
            user_type: self.accept.then(|| "client".to_string()),
            message: (!self.accept).then(|| "utilisateur non trouvé".to_string()),
        })
    }

    fn validate_session_token(&self, token: String) -> Result<TokenValidation, AuthenticatorError> {
        self.calls.lock().push(format!("token:{token}"));
        if self.unreachable {
            return Err(AuthenticatorError::Unreachable("offline".into()));
        }

        Ok(TokenValidation {
            success: self.accept,
            user_info: self.accept.then(|| BadgeUserInfo {
                user_id: "7".into(),
                email: Some("client@ecodeli.com".into()),
                firstname: None,
                name: None,
                role: Some("client".into()),
            }),
        })
    }
}
