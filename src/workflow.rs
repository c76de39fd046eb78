use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gpg::GpgTool;
use crate::prompt::{Choice, Prompter};
use crate::types::{Action, DeleteScope, KeyFiles, Outcome};
use crate::validation::validate_file_prefix;

/// Dispatches `import`, `export` and `delete` against a [`GpgTool`], asking
/// the user through a [`Prompter`].
///
/// Each call runs start to finish: nothing is retried and nothing is kept
/// between calls. Files are read and written in the directory handed to each
/// operation.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> gpg_keyflow::Result<()> {
/// use gpg_keyflow::{GpgCli, KeyWorkflow, TerminalPrompter};
///
/// let workflow = KeyWorkflow::new(GpgCli::new(), TerminalPrompter);
/// let cwd = std::env::current_dir()?;
/// workflow.export_key(&cwd, "ABAF11C65A2970B130ABE3C479BE3E4300411886", Some("laptop")).await?;
/// # Ok(())
/// # }
/// ```
pub struct KeyWorkflow<G, P> {
    gpg: G,
    prompter: P,
}

impl<G, P> KeyWorkflow<G, P>
where
    G: GpgTool,
    P: Prompter,
{
    pub fn new(gpg: G, prompter: P) -> Self {
        Self { gpg, prompter }
    }

    pub fn gpg(&self) -> &G {
        &self.gpg
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Runs `action` with its extra arguments in `dir`.
    ///
    /// A missing action is an error. An unrecognized one does nothing and
    /// yields [`Outcome::Ignored`].
    pub async fn dispatch(
        &self,
        dir: &Path,
        action: Option<&str>,
        args: &[String],
    ) -> Result<Outcome> {
        let Some(keyword) = action else {
            return Err(Error::MissingAction);
        };

        match Action::parse(keyword) {
            Action::Import => self.import_keys(dir).await,
            Action::Export => {
                let key = self
                    .find_key("Select a GPG key to export")
                    .await?
                    .ok_or(Error::NoKeysFound)?;
                let filename = args.first().map(String::as_str);
                self.export_key(dir, &key, filename).await
            }
            Action::Delete => {
                let key = self
                    .find_key("Select a GPG key to delete")
                    .await?
                    .ok_or(Error::NoKeysFound)?;
                let delete_type = args.first().map(String::as_str);
                self.delete_key(&key, delete_type).await
            }
            Action::Unknown(action) => {
                debug!(%action, "ignoring unknown gpg action");
                Ok(Outcome::Ignored { action })
            }
        }
    }

    /// Picks the key to operate on.
    ///
    /// Returns `None` for an empty keyring and the only key without asking
    /// when there is exactly one. Otherwise the user chooses.
    pub async fn find_key(&self, prompt: &str) -> Result<Option<String>> {
        let mut records = self.gpg.list_keys().await?;

        match records.len() {
            0 => Ok(None),
            1 => Ok(records.pop().map(|r| r.key)),
            _ => {
                let choices = records
                    .into_iter()
                    .map(|r| Choice {
                        label: r.label(),
                        value: r.key,
                    })
                    .collect();
                self.prompter.select(prompt, choices).await.map(Some)
            }
        }
    }

    /// Imports every `*public.key` file in `dir`, then every `*private.key` file.
    pub async fn import_keys(&self, dir: &Path) -> Result<Outcome> {
        let files = find_key_files(dir).await?;

        if files.is_empty() {
            return Err(Error::NoKeyFiles);
        }

        for file in &files {
            info!("Importing GPG key from \"{file}\"");
            self.gpg.import_key(&dir.join(file)).await?;
        }

        Ok(Outcome::Imported { files })
    }

    /// Exports `key` to `public.key`/`private.key` in `dir`, or to
    /// `<filename>_public.key`/`<filename>_private.key`.
    ///
    /// Existing targets are only removed after the user agrees. Success is
    /// judged by both files existing afterwards, not by gpg's exit status.
    pub async fn export_key(
        &self,
        dir: &Path,
        key: &str,
        filename: Option<&str>,
    ) -> Result<Outcome> {
        let prefix = filename.map(validate_file_prefix).transpose()?;
        let files = KeyFiles::new(dir, prefix);

        let public_exists = path_exists(&files.public_path).await?;
        let private_exists = path_exists(&files.private_path).await?;

        if public_exists || private_exists {
            let question = format!(
                "Key file \"{}\" or \"{}\" already exists, overwrite?",
                files.public_name, files.private_name
            );
            if !self.prompter.confirm(&question).await? {
                return Ok(Outcome::Declined);
            }

            if public_exists {
                tokio::fs::remove_file(&files.public_path).await?;
            }
            if private_exists {
                tokio::fs::remove_file(&files.private_path).await?;
            }
        }

        if let Err(err) = self.gpg.export_public_key(key, &files.public_path).await {
            warn!(%err, "public key export failed");
        }
        if let Err(err) = self.gpg.export_secret_key(key, &files.private_path).await {
            warn!(%err, "secret key export failed");
        }

        if !path_exists(&files.private_path).await? || !path_exists(&files.public_path).await? {
            return Err(Error::ExportFailed);
        }

        info!(
            "GPG keys exported to \"{}\" and \"{}\"",
            files.public_name, files.private_name
        );

        Ok(Outcome::Exported {
            public: files.public_name,
            private: files.private_name,
        })
    }

    /// Deletes the secret and/or public half of `key` after confirmation.
    ///
    /// `delete_type` of `"public"` or `"private"` restricts the deletion;
    /// anything else deletes both, secret key first.
    pub async fn delete_key(&self, key: &str, delete_type: Option<&str>) -> Result<Outcome> {
        let scope = DeleteScope::from_arg(delete_type);

        if !self.prompter.confirm(&scope.confirmation_prompt(key)).await? {
            return Ok(Outcome::Declined);
        }

        if scope.removes_secret() {
            self.gpg.delete_secret_key(key).await?;
        }
        if scope.removes_public() {
            self.gpg.delete_public_key(key).await?;
        }

        Ok(Outcome::Deleted {
            key: key.to_string(),
            scope,
        })
    }
}

/// Names in `dir` ending with `public.key`, followed by those ending with
/// `private.key`. Each group is sorted by name.
pub async fn find_key_files(dir: &Path) -> Result<Vec<String>> {
    let mut public = Vec::new();
    let mut private = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            debug!(name = ?entry.file_name(), "skipping non UTF-8 file name");
            continue;
        };

        if name.ends_with(KeyFiles::PUBLIC_SUFFIX) {
            public.push(name);
        } else if name.ends_with(KeyFiles::PRIVATE_SUFFIX) {
            private.push(name);
        }
    }

    public.sort();
    private.sort();
    public.extend(private);
    Ok(public)
}

async fn path_exists(path: &Path) -> Result<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}
