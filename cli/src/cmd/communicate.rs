use std::io;
use std::path::PathBuf;

use kjudge_core::action;

use super::{GlobalArgs, SubcmdResult};

/// Relay a query script to the solver on stdin/stdout and record its answers
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Query script: a line count followed by that many queries
    #[arg()]
    pub input: PathBuf,

    /// Judge channel (reference output)
    #[arg()]
    pub judge: PathBuf,

    /// Where the solver's responses are written
    #[arg()]
    pub transcript: PathBuf,
}

pub fn exec(args: &Args, _global_args: &GlobalArgs) -> SubcmdResult {
    // stdout belongs to the solver from here on; logs go to stderr.
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    action::communicate(&args.input, &args.judge, &args.transcript, stdin, stdout)?;
    Ok(())
}
