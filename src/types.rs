use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// A key from the local GPG keyring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub name: String,
    pub email: String,
    /// Identifier passed back to gpg (fingerprint, or long key ID when the
    /// listing carries no fingerprint).
    pub key: String,
    pub created: Option<NaiveDate>,
}

impl KeyRecord {
    /// Label shown in the key selection prompt: `name <email> [key]`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> [{}]", self.name, self.email, self.key)
    }
}

/// Action keyword given after `gpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    Import,
    Export,
    Delete,
    /// Anything else. Dispatching it does nothing.
    Unknown(String),
}

impl Action {
    pub fn parse(keyword: &str) -> Self {
        match keyword {
            "import" => Self::Import,
            "export" => Self::Export,
            "delete" => Self::Delete,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Which half of a key pair a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteScope {
    Public,
    Private,
    #[default]
    Both,
}

impl DeleteScope {
    /// Unrecognized values fall back to [`DeleteScope::Both`].
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("public") => Self::Public,
            Some("private") => Self::Private,
            _ => Self::Both,
        }
    }

    pub fn removes_secret(self) -> bool {
        matches!(self, Self::Both | Self::Private)
    }

    pub fn removes_public(self) -> bool {
        matches!(self, Self::Both | Self::Public)
    }

    fn qualifier(self) -> Option<&'static str> {
        match self {
            Self::Public => Some("public"),
            Self::Private => Some("private"),
            Self::Both => None,
        }
    }

    /// Confirmation question asked before deleting `key`.
    pub fn confirmation_prompt(self, key: &str) -> String {
        match self.qualifier() {
            Some(kind) => format!("Are you sure you want to delete the {kind} key \"{key}\"?"),
            None => format!("Are you sure you want to delete the key \"{key}\"?"),
        }
    }
}

/// Output files of an export, resolved against a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFiles {
    pub public_name: String,
    pub private_name: String,
    pub public_path: PathBuf,
    pub private_path: PathBuf,
}

impl KeyFiles {
    pub const PUBLIC_SUFFIX: &'static str = "public.key";
    pub const PRIVATE_SUFFIX: &'static str = "private.key";

    /// `public.key`/`private.key`, or `<prefix>_public.key`/`<prefix>_private.key`.
    pub fn new(dir: &Path, prefix: Option<&str>) -> Self {
        let (public_name, private_name) = match prefix {
            Some(p) => (
                format!("{p}_{}", Self::PUBLIC_SUFFIX),
                format!("{p}_{}", Self::PRIVATE_SUFFIX),
            ),
            None => (
                Self::PUBLIC_SUFFIX.to_string(),
                Self::PRIVATE_SUFFIX.to_string(),
            ),
        };

        Self {
            public_path: dir.join(&public_name),
            private_path: dir.join(&private_name),
            public_name,
            private_name,
        }
    }
}

/// What a finished invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
    Imported { files: Vec<String> },
    Exported { public: String, private: String },
    Deleted { key: String, scope: DeleteScope },
    /// The user answered no to a confirmation.
    Declined,
    Ignored { action: String },
}
