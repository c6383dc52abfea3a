use std::future::Future;

use tokio::{runtime::Handle, task::JoinHandle};

use crate::TOKIO;

/// The registered runtime, or the one we are currently running inside of
fn handle() -> Handle {
    TOKIO
        .get()
        .cloned()
        .or_else(|| Handle::try_current().ok())
        .expect("tokio runtime not initialized, call ecodeli_tokio::init_with first")
}

pub fn spawn<T>(fut: T) -> JoinHandle<T::Output>
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    handle().spawn(fut)
}

pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    handle().spawn_blocking(f)
}
