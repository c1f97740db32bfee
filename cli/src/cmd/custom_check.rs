use std::path::PathBuf;

use kjudge_core::action;

use super::{format_score, GlobalArgs, SubcmdResult};

/// Compare a solver's output with the judge's, penalizing extra lines
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()]
    pub judge: PathBuf,

    #[arg()]
    pub output: PathBuf,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn exec(args: &Args, _global_args: &GlobalArgs) -> SubcmdResult {
    let outcome = action::custom_check(&args.judge, &args.output)?;
    if args.json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        println!("{}", outcome.verdict);
        println!("{}", format_score(outcome.score.normalized()));
    }
    Ok(())
}
