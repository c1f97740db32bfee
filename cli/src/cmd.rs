pub mod check;
pub mod communicate;
pub mod custom_check;
pub mod demo;
pub mod init;

use std::path::PathBuf;

use kjudge_core::{config::JudgeMode, judging::LineComparator, Config};

use crate::util;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Config file to use instead of searching for kjudge.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    #[command(alias("c"))]
    Check(check::Args),

    CustomCheck(custom_check::Args),

    Communicate(communicate::Args),

    DemoSolve(demo::Args),

    Init(init::Args),

    #[command(alias("t"))]
    Test(test::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

/// Scores always carry a decimal point (`1.0`, not `1`).
pub fn format_score(score: f64) -> String {
    format!("{:?}", score)
}

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Check(args) => check::exec(args, self),
            CustomCheck(args) => custom_check::exec(args, self),
            Communicate(args) => communicate::exec(args, self),
            DemoSolve(args) => demo::exec(args, self),
            Init(args) => init::exec(args, self),
            Test(args) => test::exec(args, self).await,
        }
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::from_toml_file(path.clone()),
            None => Config::from_file_finding_in_ancestors_or_default(util::current_dir()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ArgComparison {
    Uppercase,
    Exact,
}

impl From<ArgComparison> for LineComparator {
    fn from(value: ArgComparison) -> Self {
        use ArgComparison::*;
        match value {
            Uppercase => LineComparator::Uppercase,
            Exact => LineComparator::Exact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ArgMode {
    Batch,
    Interactive,
}

impl From<ArgMode> for JudgeMode {
    fn from(value: ArgMode) -> Self {
        use ArgMode::*;
        match value {
            Batch => JudgeMode::Batch,
            Interactive => JudgeMode::Interactive,
        }
    }
}
