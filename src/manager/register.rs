use std::sync::Arc;

use ecodeli_util::result_ext::ResultExt as _;
use flume::{Receiver, Sender};
use parking_lot::Mutex;
use tap::TapFallible as _;
use tracing::{debug, error, warn};

use crate::{
    badge::{BadgeEncoder, BadgeExtras, EncodeError, RawTagRecord},
    dispatch::{TAG_DISPATCHER, TagDispatcher, TagSubscription},
    error::{BadgeError, ErrorReason},
    policy::BadgePolicy,
    tag::{TagError, TagIoError, TagTransport, write_record},
};

use super::Listener;

type Message = BadgeRegisterReconcileMessage;
type Action = BadgeRegisterAction;

/// The logged in account to put on a badge
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct BadgeIdentity {
    pub user_id: String,
    pub token: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum BadgeRegisterReconcileMessage {
    WaitingForTag,
    Written { user_id: String, bytes: u32 },
    WriteFailed { reason: ErrorReason, message: String },
    Stopped,
}

#[uniffi::export(callback_interface)]
pub trait BadgeRegisterManagerReconciler: Send + Sync + std::fmt::Debug + 'static {
    /// Tells the frontend to reconcile the manager changes
    fn reconcile(&self, message: BadgeRegisterReconcileMessage);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum BadgeRegisterAction {
    /// Write the identity to the next tag presented
    Start(BadgeIdentity),
    Cancel,
}

#[derive(Debug, uniffi::Object)]
pub struct RustBadgeRegisterManager {
    dispatcher: Arc<TagDispatcher>,
    encoder: BadgeEncoder,
    listener: Mutex<Option<Listener>>,
    reconciler: Sender<Message>,
    reconcile_receiver: Arc<Receiver<Message>>,
}

impl RustBadgeRegisterManager {
    pub(crate) fn init(dispatcher: Arc<TagDispatcher>, policy: BadgePolicy) -> Arc<Self> {
        let (sender, receiver) = flume::bounded(1000);

        Self {
            dispatcher,
            encoder: BadgeEncoder::new(policy),
            listener: Mutex::new(None),
            reconciler: sender,
            reconcile_receiver: Arc::new(receiver),
        }
        .into()
    }

    fn start(&self, identity: BadgeIdentity) {
        // refuse up front what no tag could ever take
        if let Err(error) = encode(&self.encoder, &identity) {
            warn!("badge for user {} can not be encoded: {error}", identity.user_id);
            return self.send(write_failed(error.into()));
        }

        let encoder = self.encoder.clone();
        let sender = self.reconciler.clone();
        let listener = Listener::spawn(&self.dispatcher, move |subscription| {
            register(subscription, identity, encoder, sender)
        });

        if self.listener.lock().replace(listener).is_some() {
            debug!("restarted badge registration with a new identity");
        }

        self.send(Message::WaitingForTag);
    }

    fn send(&self, message: Message) {
        send(&self.reconciler, message);
    }
}

#[uniffi::export]
impl RustBadgeRegisterManager {
    #[uniffi::constructor]
    pub fn new() -> Arc<Self> {
        Self::with_policy(BadgePolicy::default())
    }

    #[uniffi::constructor]
    pub fn with_policy(policy: BadgePolicy) -> Arc<Self> {
        Self::init(TAG_DISPATCHER.clone(), policy)
    }

    #[uniffi::method]
    pub fn listen_for_updates(&self, reconciler: Box<dyn BadgeRegisterManagerReconciler>) {
        let reconcile_receiver = self.reconcile_receiver.clone();

        std::thread::spawn(move || {
            while let Ok(field) = reconcile_receiver.recv() {
                // call the reconcile method on the frontend
                reconciler.reconcile(field);
            }
        });
    }

    /// Action from the frontend to change the state of the manager
    #[uniffi::method]
    pub fn dispatch(&self, action: BadgeRegisterAction) {
        match action {
            Action::Start(identity) => {
                debug!("register badge for user {}", identity.user_id);
                self.start(identity);
            }

            Action::Cancel => {
                debug!("cancel badge registration");
                if self.listener.lock().take().is_some() {
                    self.send(Message::Stopped);
                }
            }
        }
    }
}

fn encode(encoder: &BadgeEncoder, identity: &BadgeIdentity) -> Result<RawTagRecord, EncodeError> {
    let extras = BadgeExtras {
        email: identity.email.clone(),
        version: None,
    };

    encoder.encode(&identity.user_id, identity.token.as_deref(), extras)
}

/// Write the badge to tags until one takes it, each tap gets a freshly stamped badge
async fn register(
    subscription: TagSubscription,
    identity: BadgeIdentity,
    encoder: BadgeEncoder,
    sender: Sender<Message>,
) {
    while let Some(event) = subscription.next_tag().await {
        let result = write_badge(event.transport, &encoder, &identity).await;

        match result {
            Ok(bytes) => {
                send(
                    &sender,
                    Message::Written {
                        user_id: identity.user_id.clone(),
                        bytes,
                    },
                );
                return;
            }

            Err(error) => send(&sender, write_failed(error)),
        }
    }
}

async fn write_badge(
    transport: Box<dyn TagTransport>,
    encoder: &BadgeEncoder,
    identity: &BadgeIdentity,
) -> Result<u32, BadgeError> {
    let record = encode(encoder, identity)?;
    let bytes = record.message_len() as u32;

    ecodeli_tokio::unblock::run_blocking(move || write_record(transport.as_ref(), &record))
        .await
        .map_err_str(|message| TagError::from(TagIoError::Io(message)))?
        .tap_err(|error| debug!("badge write failed: {error}"))?;

    Ok(bytes)
}

fn write_failed(error: BadgeError) -> Message {
    Message::WriteFailed {
        reason: error.reason(),
        message: error.to_string(),
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

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{badge::decode_and_validate, tag::read_record, test_support::FakeTag};

    async fn next_message(manager: &RustBadgeRegisterManager) -> Message {
        tokio::time::timeout(Duration::from_secs(5), manager.reconcile_receiver.recv_async())
            .await
            .expect("timed out waiting for a reconcile message")
            .unwrap()
    }

    fn identity(token: Option<&str>) -> BadgeIdentity {
        BadgeIdentity {
            user_id: "12".into(),
            token: token.map(str::to_string),
            email: Some("client@ecodeli.com".into()),
        }
    }

    fn manager() -> (Arc<TagDispatcher>, Arc<RustBadgeRegisterManager>) {
        let dispatcher = TagDispatcher::detached();
        let manager = RustBadgeRegisterManager::init(dispatcher.clone(), BadgePolicy::default());

        (dispatcher, manager)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn writes_a_token_badge_that_reads_back() {
        let (dispatcher, manager) = manager();
        manager.dispatch(Action::Start(identity(Some("tok-12"))));
        assert_eq!(next_message(&manager).await, Message::WaitingForTag);

        let tag = FakeTag::formatted(vec![]).with_max_size(8192);
        assert!(dispatcher.tag_detected(Box::new(tag.clone())));

        let Message::Written { user_id, bytes } = next_message(&manager).await else {
            panic!("expected the badge to be written");
        };

        assert_eq!(user_id, "12");
        assert_eq!(bytes as usize, tag.contents().unwrap().len());

        let payload = decode_and_validate(&read_record(&tag).unwrap()).unwrap();
        assert_eq!(payload.auth_token(), Some("tok-12"));
        assert_eq!(payload.email(), Some("client@ecodeli.com"));
        assert!(payload.issued_at().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn read_only_tag_fails_and_next_tag_is_tried() {
        let (dispatcher, manager) = manager();
        manager.dispatch(Action::Start(identity(None)));
        next_message(&manager).await;

        let locked = FakeTag::formatted(vec![]).read_only();
        dispatcher.tag_detected(Box::new(locked.clone()));
        assert_eq!(
            next_message(&manager).await,
            Message::WriteFailed {
                reason: ErrorReason::NotWritable,
                message: "tag is read only".into(),
            }
        );
        assert_eq!(locked.open_connections(), 0);

        let blank = FakeTag::blank();
        dispatcher.tag_detected(Box::new(blank.clone()));
        assert!(matches!(next_message(&manager).await, Message::Written { .. }));
        assert_eq!(blank.formats(), 1);
    }

    #[tokio::test]
    async fn oversize_identity_fails_without_listening() {
        let (dispatcher, manager) = manager();
        let huge = "x".repeat(9000);

        manager.dispatch(Action::Start(identity(Some(&huge))));

        let Message::WriteFailed { reason, .. } = next_message(&manager).await else {
            panic!("expected an encode failure");
        };

        assert_eq!(reason, ErrorReason::CapacityExceeded);
        assert!(!dispatcher.is_listening());
    }

    #[tokio::test]
    async fn cancel_releases_the_reader() {
        let (dispatcher, manager) = manager();
        manager.dispatch(Action::Start(identity(None)));
        next_message(&manager).await;

        manager.dispatch(Action::Cancel);

        assert_eq!(next_message(&manager).await, Message::Stopped);
        assert!(!dispatcher.is_listening());
    }
}
