pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use error::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::Mutex;

use crate::config::{Config, DemoConfig, TestConfig};
use crate::demo::DemoSolver;
use crate::judging::{
    BatchOutcome, BatchScorer, Communicator, CustomChecker, CustomOutcome, ExchangeSummary,
    LineComparator, TestCase, Verdict,
};
use crate::style;
use crate::testing::{FsTestcase, JudgeCode, TestOutcome, TestRunner};

pub fn init_config(dir: impl AsRef<Path>) -> Result<()> {
    let path = dir.as_ref().join(Config::FILENAME);
    ensure!(!path.exists(), "Already exists: {}", path.to_string_lossy());
    fsutil::write_with_mkdir(&path, Config::example_toml())
        .context("Failed to write example config")
}

fn load_testcase(input: &Path) -> Result<TestCase> {
    let mut reader = fsutil::open_buffered(input)?;
    TestCase::parse(&mut reader).with_context(|| format!("Invalid input file {:?}", input))
}

/// Batch checking: scores `output` against the test case in `input`,
/// validating `judge` first.
pub fn check(
    input: impl AsRef<Path>,
    judge: impl AsRef<Path>,
    output: impl AsRef<Path>,
    comparator: LineComparator,
) -> Result<BatchOutcome> {
    let testcase = load_testcase(input.as_ref())?;
    let mut judge_reader = fsutil::open_buffered(judge)?;
    let mut solver_reader = fsutil::open_buffered(output)?;

    let outcome = BatchScorer::new(comparator).score(
        &testcase,
        &mut judge_reader,
        &mut solver_reader,
    )?;
    if outcome.verdict == Verdict::JudgeFailure {
        log::error!("Judge output failed self-check: the test data needs fixing");
    }
    log::info!(
        "{}: {}/{} lines matched",
        outcome.verdict,
        outcome.score.matches,
        outcome.score.total
    );
    Ok(outcome)
}

pub fn custom_check(judge: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CustomOutcome> {
    let mut judge_reader = fsutil::open_buffered(judge)?;
    let mut solver_reader = fsutil::open_buffered(output)?;

    let outcome = CustomChecker::default().check(&mut judge_reader, &mut solver_reader)?;
    log::info!(
        "{}: raw={} hps={} (extra lines: {})",
        outcome.verdict,
        outcome.score.raw(),
        outcome.score.hps,
        outcome.score.extra
    );
    Ok(outcome)
}

/// Runs the query script in `input` against a solver connected through
/// `solver_output` / `solver_input`, writing responses to `transcript`.
///
/// `judge` is opened before the solver is contacted so that a missing
/// reference aborts the run early.
pub fn communicate<R, W>(
    input: impl AsRef<Path>,
    judge: impl AsRef<Path>,
    transcript: impl AsRef<Path>,
    solver_output: R,
    solver_input: W,
) -> Result<ExchangeSummary>
where
    R: BufRead,
    W: Write,
{
    let script = load_testcase(input.as_ref())?;
    let _judge = fsutil::open_buffered(judge).context("Judge channel is not readable")?;
    let mut transcript_writer = fsutil::create_buffered_with_mkdir(&transcript)?;

    let summary = Communicator::new(solver_output, solver_input)
        .run(&script, &mut transcript_writer)
        .map_err(|e| {
            if e.is_protocol_violation() {
                log::error!("{}", e);
            }
            e
        })?;

    log::info!(
        "Exchanged {} rounds, transcript written to {:?}",
        summary.rounds,
        transcript.as_ref()
    );
    Ok(summary)
}

pub fn demo_solve(cfg: &DemoConfig, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    DemoSolver::new(cfg.target_scores())
        .solve(input, output)
        .context("Demo solver failed")
}

pub async fn do_test(
    solver_cmd: &str,
    testcase_dir: impl AsRef<Path>,
    cfg: &TestConfig,
    comparator: LineComparator,
) -> Result<Vec<TestOutcome>> {
    let testcases =
        FsTestcase::enumerate(&testcase_dir, &cfg.input_pattern, &cfg.judge_extension)
            .context("Failed to find testcase")?;
    if testcases.is_empty() {
        bail!(
            "No testcases found in {} (pattern '{}', judge extension '{}')",
            testcase_dir.as_ref().to_string_lossy(),
            cfg.input_pattern.as_str(),
            cfg.judge_extension,
        );
    }

    let runner = TestRunner::new(solver_cmd)
        .shell(cfg.shell.to_owned())
        .mode(cfg.mode)
        .comparator(comparator)
        .execution_time_limit(cfg.time_limit());

    let style = ProgressStyle::default_bar()
        .template("{spinner} {msg}")
        .context("Invalid progress bar template")?;

    let mut results = Vec::with_capacity(testcases.len());
    let mut bars = Vec::with_capacity(testcases.len());
    let progress_bar_container = MultiProgress::new();

    log::info!("Running ({} mode): {}", runner.get_mode(), runner.get_command());

    // Prepare progress bar
    for t in &testcases {
        let bar = progress_bar_container
            .add(ProgressBar::new(100))
            .with_style(style.clone())
            .with_message(format!("Testcase {} ...", t.name));
        let bar = Arc::new(Mutex::new(bar));
        bars.push(bar.clone());

        // Tick spinner
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let bar = bar.lock().await;
                if bar.is_finished() {
                    break;
                }
                bar.tick();
            }
        });
    }

    for (t, bar) in testcases.iter().zip(&bars) {
        let res = runner.run(t).await?;
        let score = res
            .score
            .map(|s| format!(" {}/{}", s.matches, s.total))
            .unwrap_or_default();
        bar.lock().await.finish_with_message({
            format!(
                "Testcase {} ... {}{}{} [{}ms]",
                t.name,
                style::judge_icon(res.judge),
                " ".repeat(3 - res.judge.to_string().len()),
                score,
                res.execution_time.as_millis(),
            )
            .cyan()
            .to_string()
        });
        results.push(res);
    }
    println!();

    results
        .iter()
        .filter(|x| x.judge != JudgeCode::AC)
        .for_each(style::print_test_result_detail);

    style::print_test_result_summary(&results);
    Ok(results)
}
