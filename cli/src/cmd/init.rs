use kjudge_core::{action, print_success};
use std::path::PathBuf;

use super::{GlobalArgs, SubcmdResult};

/// Write an example kjudge.toml
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    action::init_config(&args.dir)?;
    print_success!(
        "Successfully wrote kjudge.toml. (path: {})",
        args.dir.to_string_lossy()
    );
    Ok(())
}
