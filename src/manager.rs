//! Screen level badge flows driven by the host

pub mod authenticator;
pub mod login;
pub mod register;

use std::{future::Future, sync::Arc};

use ecodeli_tokio::AbortableTask;

use crate::dispatch::{TagDispatcher, TagSubscription};

pub use authenticator::{BadgeAuthenticator, BadgeSession, LoginError};
pub use login::RustBadgeLoginManager;
pub use register::RustBadgeRegisterManager;

/// A task consuming tags from its own subscription
///
/// Dropping it releases the subscription right away and aborts the task
#[derive(Debug)]
pub(crate) struct Listener {
    dispatcher: Arc<TagDispatcher>,
    generation: u64,
    task: AbortableTask<()>,
}

impl Listener {
    pub(crate) fn spawn<F, Fut>(dispatcher: &Arc<TagDispatcher>, run: F) -> Self
    where
        F: FnOnce(TagSubscription) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let subscription = dispatcher.subscribe();
        let generation = subscription.generation();

        Self {
            dispatcher: dispatcher.clone(),
            generation,
            task: AbortableTask::spawn(run(subscription)),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.dispatcher.release(self.generation);
    }
}
