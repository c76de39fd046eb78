use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::gpg::GpgTool;
use crate::prompt::Prompter;
use crate::types::Outcome;
use crate::workflow::KeyWorkflow;

/// Keyword a host routes to a handler, with its help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchers {
    pub matching: &'static str,
    pub description: &'static str,
}

impl Matchers {
    pub fn matches(&self, keyword: &str) -> bool {
        self.matching == keyword
    }
}

/// Per-invocation state the host hands to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Directory key files are read from and written to.
    pub work_dir: PathBuf,
}

impl Context {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Context rooted at the process's current directory.
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }
}

/// A capability a host CLI discovers and invokes by keyword.
#[async_trait]
pub trait Handler: Send + Sync {
    fn matchers(&self) -> Matchers;

    async fn handle(
        &self,
        ctx: &Context,
        action: Option<&str>,
        args: &[String],
    ) -> Result<Outcome>;
}

#[async_trait]
impl<G, P> Handler for KeyWorkflow<G, P>
where
    G: GpgTool,
    P: Prompter,
{
    fn matchers(&self) -> Matchers {
        Matchers {
            matching: "gpg",
            description: "GPG key management",
        }
    }

    async fn handle(
        &self,
        ctx: &Context,
        action: Option<&str>,
        args: &[String],
    ) -> Result<Outcome> {
        self.dispatch(&ctx.work_dir, action, args).await
    }
}
