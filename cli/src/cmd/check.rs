use std::path::PathBuf;

use kjudge_core::action;

use super::{format_score, ArgComparison, GlobalArgs, SubcmdResult};

/// Score a solver's output file against a test case (batch mode)
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Test case: a line count followed by that many lines
    #[arg()]
    pub input: PathBuf,

    /// Reference output of the judge solution
    #[arg()]
    pub judge: PathBuf,

    /// Output of the solver
    #[arg()]
    pub output: PathBuf,

    #[arg(long, value_enum)]
    pub comparison: Option<ArgComparison>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = global_args.load_config()?;
    let comparator = args
        .comparison
        .map(Into::into)
        .unwrap_or(cfg.checker.comparison);

    let outcome = action::check(&args.input, &args.judge, &args.output, comparator)?;
    if args.json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        println!("{}", outcome.verdict);
        println!("{}", format_score(outcome.score.value()));
    }
    Ok(())
}
