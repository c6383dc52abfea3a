//! Hands tags detected by the host to whichever screen is currently listening

use std::sync::{Arc, LazyLock};

use flume::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{badge::now_ms, tag::TagTransport};

pub static TAG_DISPATCHER: LazyLock<Arc<TagDispatcher>> = LazyLock::new(TagDispatcher::init);

/// A tag presented to the reader
#[derive(Debug)]
pub struct TagEvent {
    pub transport: Box<dyn TagTransport>,
    pub detected_at: i64,
}

#[derive(Debug, Default)]
struct DispatchState {
    generation: u64,
    sender: Option<Sender<TagEvent>>,
}

#[derive(Debug, uniffi::Object)]
pub struct TagDispatcher {
    state: Mutex<DispatchState>,
}

impl TagDispatcher {
    fn init() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(DispatchState::default()),
        })
    }

    /// A dispatcher not shared with the host, for driving managers directly
    pub fn detached() -> Arc<Self> {
        Self::init()
    }

    /// Start receiving tags, any older subscription stops receiving
    pub fn subscribe(self: &Arc<Self>) -> TagSubscription {
        let (sender, receiver) = flume::bounded(1);

        let mut state = self.state.lock();
        if state.sender.is_some() {
            warn!("tag subscription {} superseded", state.generation);
        }

        state.generation += 1;
        state.sender = Some(sender);

        debug!("tag subscription {} started", state.generation);

        TagSubscription {
            dispatcher: self.clone(),
            generation: state.generation,
            receiver,
        }
    }

    /// Release the given subscription, a no-op once a newer one took over
    pub(crate) fn release(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation != generation {
            return;
        }

        if state.sender.take().is_some() {
            debug!("tag subscription {generation} released");
        }
    }
}

#[uniffi::export]
impl TagDispatcher {
    #[uniffi::constructor]
    pub fn new() -> Arc<Self> {
        TAG_DISPATCHER.clone()
    }

    /// Called by the host for every tag it discovers
    ///
    /// Returns false when the tag was not taken, because no screen is listening or a
    /// previous tag is still waiting to be handled
    pub fn tag_detected(&self, transport: Box<dyn TagTransport>) -> bool {
        let state = self.state.lock();
        let Some(sender) = &state.sender else {
            debug!("no screen is listening for tags, ignoring");
            return false;
        };

        let event = TagEvent {
            transport,
            detected_at: now_ms(),
        };

        match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("a tag is already waiting to be handled, dropping this one");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("tag subscription {} is gone", state.generation);
                false
            }
        }
    }

    /// Whether a screen is waiting for a tag, hosts use this to toggle reader mode
    pub fn is_listening(&self) -> bool {
        self.state.lock().sender.is_some()
    }
}

/// Interest in tags, released when dropped
#[derive(Debug)]
pub struct TagSubscription {
    dispatcher: Arc<TagDispatcher>,
    generation: u64,
    receiver: Receiver<TagEvent>,
}

impl TagSubscription {
    /// Wait for the next tag, `None` once this subscription was superseded
    pub async fn next_tag(&self) -> Option<TagEvent> {
        self.receiver.recv_async().await.ok()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn try_next_tag(&self) -> Option<TagEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for TagSubscription {
    fn drop(&mut self) {
        self.dispatcher.release(self.generation);
    }
}
