use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};

/// Errors that stop the window manager.
///
/// Anything coming out of the X connection is fatal. Replies the core can
/// live without are turned into `Option`s before they reach this type.
#[derive(Debug, thiserror::Error)]
pub enum WmError {
    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("X reply error: {0}")]
    Reply(#[from] ReplyError),
    #[error("X reply or id error: {0}")]
    ReplyOrId(#[from] ReplyOrIdError),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: nix::Error,
    },
    #[error("another window manager is already running")]
    AlreadyRunning,
}

pub type Result<T> = std::result::Result<T, WmError>;
