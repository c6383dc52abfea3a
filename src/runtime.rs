use once_cell::sync::OnceCell;
use tokio::runtime::{Builder, Runtime};
use tracing::error;

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// Start the runtime the badge managers spawn onto, unless the host already registered one
///
/// Safe to call from any thread any number of times, at most one runtime is ever built
#[uniffi::export]
pub fn init_badge_runtime() {
    let runtime = RUNTIME.get_or_try_init(|| {
        Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("ecodeli-badge")
            .enable_all()
            .build()
    });

    match runtime {
        // no-op when a handle is already registered
        Ok(runtime) => ecodeli_tokio::init_with(runtime.handle().clone()),
        Err(error) => error!("unable to start badge runtime: {error}"),
    }
}
