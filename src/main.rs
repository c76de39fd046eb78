use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gpg_keyflow::{
    Context, Error, GpgCli, GpgConfig, Handler, KeyWorkflow, Outcome, TerminalPrompter,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Manage GPG keys in the current directory.
///
/// gpg import                    import *public.key then *private.key files
/// gpg export [filename]         export a key pair to [filename_]public.key / private.key
/// gpg delete [public|private]   delete a key pair, or one half of it
#[derive(Debug, Parser)]
#[command(name = "gpg-keyflow", version, verbatim_doc_comment)]
struct Cli {
    /// gpg executable to run
    #[arg(long, env = "GPG_PROGRAM", default_value = "gpg")]
    gpg_program: PathBuf,

    /// GnuPG home directory passed to gpg as --homedir
    #[arg(long, env = "GNUPGHOME")]
    homedir: Option<PathBuf>,

    /// Directory key files are read from and written to
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Handler keyword
    keyword: String,

    /// import, export or delete
    action: Option<String>,

    /// Extra arguments for the action
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}

async fn run(cli: Cli) -> gpg_keyflow::Result<Outcome> {
    let config = GpgConfig {
        program: cli.gpg_program,
        homedir: cli.homedir,
    };
    let workflow = KeyWorkflow::new(GpgCli::with_config(config), TerminalPrompter);

    if !workflow.matchers().matches(&cli.keyword) {
        return Err(Error::NoMatchingHandler(cli.keyword));
    }

    let ctx = match cli.dir {
        Some(dir) => Context::new(dir),
        None => Context::from_current_dir()?,
    };

    workflow
        .handle(&ctx, cli.action.as_deref(), &cli.args)
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => {
            debug!(?outcome, "finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
