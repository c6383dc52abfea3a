pub mod badge;
pub mod dispatch;
pub mod error;
pub mod manager;
pub mod policy;
pub mod tag;

pub(crate) mod ffi;
pub(crate) mod logging;
pub(crate) mod runtime;

#[cfg(test)]
pub(crate) mod test_support;

uniffi::setup_scaffolding!();
