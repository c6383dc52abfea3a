use std::sync::Arc;

use ecodeli_util::result_ext::ResultExt as _;
use flume::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::{
    badge::{BadgeDecoder, now_ms},
    dispatch::{TAG_DISPATCHER, TagDispatcher, TagEvent, TagSubscription},
    error::{BadgeError, ErrorReason},
    policy::BadgePolicy,
    tag::{TagError, TagIoError, read_record},
};

use super::{
    Listener,
    authenticator::{BadgeAuthenticator, BadgeSession, authenticate},
};

type Message = BadgeLoginReconcileMessage;
type Action = BadgeLoginAction;

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum BadgeLoginReconcileMessage {
    /// Waiting for a badge to be presented
    Listening,
    Stopped,

    /// The tag did not carry a usable badge
    Rejected {
        reason: ErrorReason,
        message: String,
        debug_dump: Option<String>,
    },

    Authenticating {
        user_id: String,
    },

    LoggedIn(BadgeSession),

    /// The badge was valid but the login did not go through
    LoginFailed {
        user_id: String,
        message: String,
        debug_dump: Option<String>,
    },
}

#[uniffi::export(callback_interface)]
pub trait BadgeLoginManagerReconciler: Send + Sync + std::fmt::Debug + 'static {
    /// Tells the frontend to reconcile the manager changes
    fn reconcile(&self, message: BadgeLoginReconcileMessage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum BadgeLoginAction {
    ScreenActive,
    ScreenInactive,

    /// Drop the login in flight and wait for the next badge
    CancelLogin,
}

#[derive(Debug, uniffi::Object)]
pub struct RustBadgeLoginManager {
    dispatcher: Arc<TagDispatcher>,
    authenticator: Arc<dyn BadgeAuthenticator>,
    decoder: BadgeDecoder,
    listener: Mutex<Option<Listener>>,
    reconciler: Sender<Message>,
    reconcile_receiver: Arc<Receiver<Message>>,
}

impl RustBadgeLoginManager {
    pub(crate) fn init(
        dispatcher: Arc<TagDispatcher>,
        authenticator: Arc<dyn BadgeAuthenticator>,
        policy: BadgePolicy,
    ) -> Arc<Self> {
        let (sender, receiver) = flume::bounded(1000);

        Self {
            dispatcher,
            authenticator,
            decoder: BadgeDecoder::new(policy),
            listener: Mutex::new(None),
            reconciler: sender,
            reconcile_receiver: Arc::new(receiver),
        }
        .into()
    }

    fn start(&self) {
        let mut listener = self.listener.lock();
        if listener.as_ref().is_some_and(Listener::is_active) {
            debug!("badge login already listening");
            return;
        }

        let authenticator = self.authenticator.clone();
        let decoder = self.decoder.clone();
        let sender = self.reconciler.clone();

        *listener = Some(Listener::spawn(&self.dispatcher, move |subscription| {
            listen(subscription, authenticator, decoder, sender)
        }));

        drop(listener);
        self.send(Message::Listening);
    }

    fn stop(&self) -> bool {
        self.listener.lock().take().is_some()
    }

    fn send(&self, message: Message) {
        send(&self.reconciler, message);
    }
}

#[uniffi::export]
impl RustBadgeLoginManager {
    #[uniffi::constructor]
    pub fn new(authenticator: Box<dyn BadgeAuthenticator>) -> Arc<Self> {
        Self::with_policy(authenticator, BadgePolicy::default())
    }

    #[uniffi::constructor]
    pub fn with_policy(authenticator: Box<dyn BadgeAuthenticator>, policy: BadgePolicy) -> Arc<Self> {
        Self::init(TAG_DISPATCHER.clone(), Arc::from(authenticator), policy)
    }

    #[uniffi::method]
    pub fn listen_for_updates(&self, reconciler: Box<dyn BadgeLoginManagerReconciler>) {
        let reconcile_receiver = self.reconcile_receiver.clone();

        std::thread::spawn(move || {
            while let Ok(field) = reconcile_receiver.recv() {
                // call the reconcile method on the frontend
                reconciler.reconcile(field);
            }
        });
    }

    pub fn is_listening(&self) -> bool {
        self.listener.lock().as_ref().is_some_and(Listener::is_active)
    }

    /// Action from the frontend to change the state of the manager
    #[uniffi::method]
    pub fn dispatch(&self, action: BadgeLoginAction) {
        match action {
            Action::ScreenActive => {
                debug!("badge login screen active");
                self.start();
            }

            Action::ScreenInactive => {
                debug!("badge login screen inactive");
                if self.stop() {
                    self.send(Message::Stopped);
                }
            }

            Action::CancelLogin => {
                debug!("cancel badge login");
                if self.stop() {
                    self.start();
                }
            }
        }
    }
}

async fn listen(
    subscription: TagSubscription,
    authenticator: Arc<dyn BadgeAuthenticator>,
    decoder: BadgeDecoder,
    sender: Sender<Message>,
) {
    while let Some(event) = subscription.next_tag().await {
        let message = login_with_tag(event, &authenticator, &decoder, &sender).await;
        send(&sender, message);
    }

    debug!("badge login subscription ended");
}

async fn login_with_tag(
    event: TagEvent,
    authenticator: &Arc<dyn BadgeAuthenticator>,
    decoder: &BadgeDecoder,
    sender: &Sender<Message>,
) -> Message {
    let transport = event.transport;
    let read = ecodeli_tokio::unblock::run_blocking(move || read_record(transport.as_ref()))
        .await
        .map_err_str(|message| TagError::from(TagIoError::Io(message)))
        .and_then(|read| read);

    let raw = match read {
        Ok(raw) => raw,
        Err(error) => return rejected(BadgeError::from(error), None),
    };

    let payload = match decoder.decode_and_validate(&raw) {
        Ok(payload) => payload,
        Err(error) => {
            let dump = decoder.debug_dump_at(&raw, now_ms());
            return rejected(BadgeError::from(error), Some(dump));
        }
    };

    let user_id = payload.user_id.clone();
    send(
        sender,
        Message::Authenticating {
            user_id: user_id.clone(),
        },
    );

    match authenticate(authenticator.clone(), payload).await {
        Ok(session) => {
            info!("badge login succeeded for user {user_id}");
            Message::LoggedIn(session)
        }
        Err(error) => Message::LoginFailed {
            user_id,
            message: error.to_string(),
            debug_dump: Some(decoder.debug_dump_at(&raw, now_ms())),
        },
    }
}

fn rejected(error: BadgeError, debug_dump: Option<String>) -> Message {
    Message::Rejected {
        reason: error.reason(),
        message: error.to_string(),
        debug_dump,
    }
}

fn send(sender: &Sender<Message>, message: Message) {
    if let Err(error) = sender.send(message) {
        error!("unable to send message: {error:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ecodeli_nfc::TextPayload;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        badge::{BadgeEncoder, BadgeExtras, RawTagRecord},
        manager::authenticator::LoginRoute,
        test_support::{FakeAuthenticator, FakeTag},
    };

    async fn next_message(manager: &RustBadgeLoginManager) -> Message {
        tokio::time::timeout(Duration::from_secs(5), manager.reconcile_receiver.recv_async())
            .await
            .expect("timed out waiting for a reconcile message")
            .unwrap()
    }

    fn minimal_record() -> RawTagRecord {
        BadgeEncoder::default()
            .encode("42", None, BadgeExtras::default())
            .unwrap()
    }

    fn manager(authenticator: Arc<FakeAuthenticator>) -> (Arc<TagDispatcher>, Arc<RustBadgeLoginManager>) {
        let dispatcher = TagDispatcher::detached();
        let manager = RustBadgeLoginManager::init(dispatcher.clone(), authenticator, BadgePolicy::default());

        (dispatcher, manager)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn badge_tap_logs_in() {
        let (dispatcher, manager) = manager(FakeAuthenticator::accepting());
        manager.dispatch(Action::ScreenActive);
        assert_eq!(next_message(&manager).await, Message::Listening);

        let tag = FakeTag::formatted(minimal_record().message_bytes());
        assert!(dispatcher.tag_detected(Box::new(tag.clone())));

        assert_eq!(
            next_message(&manager).await,
            Message::Authenticating {
                user_id: "42".into()
            }
        );

        let Message::LoggedIn(session) = next_message(&manager).await else {
            panic!("expected a session");
        };

        assert_eq!(session.user.user_id, "42");
        assert_eq!(session.route, LoginRoute::UserId);
        assert_eq!(tag.open_connections(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn foreign_badge_is_rejected_with_dump() {
        let authenticator = FakeAuthenticator::accepting();
        let (dispatcher, manager) = manager(authenticator.clone());
        manager.dispatch(Action::ScreenActive);
        next_message(&manager).await;

        let raw = TextPayload::new("en", r#"{"userId":"1","app":"shop"}"#)
            .to_bytes()
            .unwrap();
        let record = RawTagRecord {
            language: "en".into(),
            text: String::new(),
            payload: raw,
        };

        dispatcher.tag_detected(Box::new(FakeTag::formatted(record.message_bytes())));

        let Message::Rejected {
            reason, debug_dump, ..
        } = next_message(&manager).await
        else {
            panic!("expected a rejection");
        };

        assert_eq!(reason, ErrorReason::ForeignBadge);
        assert!(debug_dump.unwrap().contains("\"shop\""));
        assert!(authenticator.calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn blank_tag_is_no_record_and_listening_goes_on() {
        let (dispatcher, manager) = manager(FakeAuthenticator::accepting());
        manager.dispatch(Action::ScreenActive);
        next_message(&manager).await;

        dispatcher.tag_detected(Box::new(FakeTag::blank()));
        let message = next_message(&manager).await;
        assert_eq!(
            message,
            Message::Rejected {
                reason: ErrorReason::NoRecord,
                message: "tag holds no NDEF record".into(),
                debug_dump: None,
            }
        );

        assert!(manager.is_listening());
        assert!(dispatcher.tag_detected(Box::new(FakeTag::formatted(minimal_record().message_bytes()))));
        assert!(matches!(next_message(&manager).await, Message::Authenticating { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn refused_login_reports_failure_with_dump() {
        let (dispatcher, manager) = manager(FakeAuthenticator::refusing());
        manager.dispatch(Action::ScreenActive);
        next_message(&manager).await;

        dispatcher.tag_detected(Box::new(FakeTag::formatted(minimal_record().message_bytes())));
        next_message(&manager).await;

        let Message::LoginFailed {
            user_id, debug_dump, ..
        } = next_message(&manager).await
        else {
            panic!("expected a failed login");
        };

        assert_eq!(user_id, "42");
        assert!(debug_dump.unwrap().contains("verdict: valid minimal badge"));
    }

    #[tokio::test]
    async fn screen_inactive_releases_the_reader() {
        let (dispatcher, manager) = manager(FakeAuthenticator::accepting());

        manager.dispatch(Action::ScreenActive);
        assert_eq!(next_message(&manager).await, Message::Listening);
        assert!(dispatcher.is_listening());

        manager.dispatch(Action::ScreenInactive);
        assert_eq!(next_message(&manager).await, Message::Stopped);
        assert!(!dispatcher.is_listening());
        assert!(!dispatcher.tag_detected(Box::new(FakeTag::blank())));
    }

    #[tokio::test]
    async fn screen_active_twice_keeps_one_listener() {
        let (dispatcher, manager) = manager(FakeAuthenticator::accepting());

        manager.dispatch(Action::ScreenActive);
        manager.dispatch(Action::ScreenActive);

        assert_eq!(next_message(&manager).await, Message::Listening);
        assert!(manager.reconcile_receiver.try_recv().is_err());
        assert!(dispatcher.is_listening());
    }
}
