mod abortable_task;
pub mod task;
pub mod unblock;

use std::sync::OnceLock;
use tokio::runtime::Handle;

pub use abortable_task::AbortableTask;

pub(crate) static TOKIO: OnceLock<Handle> = OnceLock::new();

/// Register the runtime that badge tasks are spawned onto, the first handle wins
pub fn init_with(handle: Handle) {
    let _ = TOKIO.set(handle);
}

pub fn is_tokio_initialized() -> bool {
    TOKIO.get().is_some()
}
