//! Import, export and delete GPG keys from the working directory.
//!
//! This crate drives the `gpg` executable for all cryptographic work. It finds
//! key files by name, asks the user which key to use or whether to overwrite
//! and delete, and runs gpg with the right arguments.
//!
//! # Example
//!
//! ```no_run
//! use gpg_keyflow::{Context, GpgCli, Handler, KeyWorkflow, TerminalPrompter};
//!
//! #[tokio::main]
//! async fn main() -> gpg_keyflow::Result<()> {
//!     let workflow = KeyWorkflow::new(GpgCli::new(), TerminalPrompter);
//!     let ctx = Context::from_current_dir()?;
//!
//!     // Same as `gpg export laptop` on the command line.
//!     let outcome = workflow
//!         .handle(&ctx, Some("export"), &["laptop".to_string()])
//!         .await?;
//!     println!("{outcome:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - `gpg` (GnuPG 2.x) on `PATH`, or a path given through [`GpgConfig`]
//! - A terminal for the selection and confirmation prompts

mod error;
mod gpg;
mod handler;
mod parse;
mod prompt;
mod types;
mod validation;
mod workflow;

pub use error::{Error, Result};
pub use gpg::{GpgCli, GpgConfig, GpgTool};
pub use handler::{Context, Handler, Matchers};
pub use parse::parse_key_records;
pub use prompt::{Choice, Prompter, TerminalPrompter};
pub use types::{Action, DeleteScope, KeyFiles, KeyRecord, Outcome};
pub use workflow::{KeyWorkflow, find_key_files};
