use std::io;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("command execution failed: {0}")]
    Command(#[from] io::Error),

    #[error("gpg exited with status {status}: {stderr}")]
    Gpg { status: i32, stderr: String },

    #[error("gpg exited with status {status}")]
    GpgInteractive { status: i32 },

    #[error("permission denied while accessing the keyring")]
    PermissionDenied,

    #[error("invalid key ID '{keyid}': {reason}")]
    InvalidKeyId { keyid: String, reason: String },

    #[error("invalid file prefix '{prefix}': {reason}")]
    InvalidFilePrefix { prefix: String, reason: String },

    #[error("Please enter a type, import, export or delete")]
    MissingAction,

    #[error("No GPG keys found")]
    NoKeysFound,

    #[error("No matching key file found")]
    NoKeyFiles,

    #[error("Error exporting GPG keys")]
    ExportFailed,

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("prompt was interrupted")]
    PromptInterrupted,

    #[error("no handler matches '{0}'")]
    NoMatchingHandler(String),
}

pub type Result<T> = std::result::Result<T, Error>;
