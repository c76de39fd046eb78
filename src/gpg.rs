use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};
use crate::parse::parse_key_records;
use crate::types::KeyRecord;
use crate::validation::validate_keyid;

const DEFAULT_GPG_PROGRAM: &str = "gpg";

/// Operations the key workflow needs from GnuPG.
///
/// [`GpgCli`] implements this by running the `gpg` executable. Anything else
/// implementing it (a test double, another OpenPGP backend) can drive
/// [`KeyWorkflow`](crate::KeyWorkflow) the same way.
#[async_trait]
pub trait GpgTool: Send + Sync {
    /// Lists every key available for export or deletion, in keyring order.
    async fn list_keys(&self) -> Result<Vec<KeyRecord>>;

    /// Imports the key material stored at `path`. gpg talks to the terminal
    /// directly, since secret keys may need their passphrase.
    async fn import_key(&self, path: &Path) -> Result<()>;

    /// Writes the armored public key of `key` to `output`.
    async fn export_public_key(&self, key: &str, output: &Path) -> Result<()>;

    /// Writes the armored secret key of `key` to `output`.
    async fn export_secret_key(&self, key: &str, output: &Path) -> Result<()>;

    /// Deletes the secret key of `key`. gpg talks to the terminal directly.
    async fn delete_secret_key(&self, key: &str) -> Result<()>;

    /// Deletes the public key of `key`. gpg talks to the terminal directly.
    async fn delete_public_key(&self, key: &str) -> Result<()>;
}

/// Where to find gpg and which home directory it should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgConfig {
    pub program: PathBuf,
    /// Passed as `--homedir`. `None` leaves gpg on its own default
    /// (`$GNUPGHOME` or `~/.gnupg`).
    pub homedir: Option<PathBuf>,
}

impl Default for GpgConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_GPG_PROGRAM),
            homedir: None,
        }
    }
}

/// [`GpgTool`] backed by the `gpg` command line.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> gpg_keyflow::Result<()> {
/// use gpg_keyflow::{GpgCli, GpgTool};
///
/// let gpg = GpgCli::new();
/// for record in gpg.list_keys().await? {
///     println!("{record}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GpgCli {
    config: GpgConfig,
}

impl GpgCli {
    /// Uses `gpg` from `PATH` with its default home directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: GpgConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GpgConfig {
        &self.config
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.config.program);
        cmd.env("LC_ALL", "C");

        if let Some(homedir) = &self.config.homedir {
            let mut arg = OsString::from("--homedir=");
            arg.push(homedir);
            cmd.arg(arg);
        }

        cmd.args(args);
        cmd
    }

    async fn run_captured<I, S>(&self, args: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.command(args).output().await?;

        if !output.status.success() {
            return Err(check_gpg_error(output.status, &output.stderr));
        }

        Ok(output.stdout)
    }

    /// Runs gpg with the terminal's stdin, stdout and stderr.
    async fn run_interactive<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let status = self.command(args).status().await?;

        if !status.success() {
            return Err(Error::GpgInteractive {
                status: status.code().unwrap_or(-1),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl GpgTool for GpgCli {
    async fn list_keys(&self) -> Result<Vec<KeyRecord>> {
        let stdout = self
            .run_captured(["--list-secret-keys", "--with-colons"])
            .await?;
        parse_key_records(&String::from_utf8_lossy(&stdout))
    }

    async fn import_key(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "running gpg --import");
        // Protected secret keys make gpg-agent start pinentry, which needs the tty.
        self.run_interactive([OsStr::new("--import"), path.as_os_str()])
            .await
    }

    async fn export_public_key(&self, key: &str, output: &Path) -> Result<()> {
        let key = validate_keyid(key)?;
        self.run_captured(export_args(output, "--export", &key))
            .await
            .map(|_| ())
    }

    async fn export_secret_key(&self, key: &str, output: &Path) -> Result<()> {
        let key = validate_keyid(key)?;
        // pinentry may need the terminal to ask for the passphrase.
        self.run_interactive(export_args(output, "--export-secret-keys", &key))
            .await
    }

    async fn delete_secret_key(&self, key: &str) -> Result<()> {
        let key = validate_keyid(key)?;
        self.run_interactive(["--delete-secret-keys", &key]).await
    }

    async fn delete_public_key(&self, key: &str) -> Result<()> {
        let key = validate_keyid(key)?;
        self.run_interactive(["--delete-keys", &key]).await
    }
}

fn export_args(output: &Path, mode: &str, key: &str) -> Vec<OsString> {
    vec![
        OsString::from("--armor"),
        OsString::from("--output"),
        output.as_os_str().to_owned(),
        OsString::from(mode),
        OsString::from(key),
    ]
}

fn check_gpg_error(status: ExitStatus, stderr: &[u8]) -> Error {
    let msg = String::from_utf8_lossy(stderr);

    if msg.contains("Permission denied") || msg.contains("permission denied") {
        return Error::PermissionDenied;
    }

    Error::Gpg {
        status: status.code().unwrap_or(-1),
        stderr: msg.trim_end().to_string(),
    }
}
