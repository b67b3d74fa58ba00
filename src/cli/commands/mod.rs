//! Command implementations.

pub mod completions;
pub mod init;
pub mod list;
pub mod pull;
pub mod push;
pub mod sass;
pub mod watch;

use crate::error::{Error, Result};

/// Build the runtime that drives gateway calls.
///
/// Commands are synchronous; each builds one runtime and drives its async
/// gateway flows with `block_on`.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("failed to start async runtime: {e}")))
}
