use std::io;

use kjudge_core::action;

use super::{GlobalArgs, SubcmdResult};

/// Answer a test case from stdin, only partly correct (see `[[demo.target]]`)
#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = global_args.load_config()?;
    action::demo_solve(&cfg.demo, &mut io::stdin().lock(), &mut io::stdout().lock())
}
