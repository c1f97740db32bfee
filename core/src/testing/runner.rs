use std::{
    io::{BufReader, Cursor, ErrorKind, Read},
    path::{Path, PathBuf},
    process::{Command as StdCommand, Stdio},
    time::Duration,
};

use anyhow::{bail, Context};
use tokio::{io::AsyncWriteExt, process::Command, time::Instant};

use super::{result::*, testcase::*};
use crate::config::JudgeMode;
use crate::judging::{self, BatchScorer, Communicator, LineComparator, TestCase};

/// Runs a solver command locally against testcases.
///
/// There is no sandboxing here: the only limit enforced is wall-clock time.
#[derive(Debug, Clone)]
pub struct TestRunner {
    cmd: String,
    shell: PathBuf,
    mode: JudgeMode,
    comparator: LineComparator,
    execution_time_limit: Duration,
}

impl TestRunner {
    const DEFAULT_SHELL: &str = "/bin/sh";
    const DEFAULT_EXEC_TIME_LIMIT: Duration = Duration::from_millis(2000);
    const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(5);

    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            shell: Self::DEFAULT_SHELL.into(),
            mode: JudgeMode::Batch,
            comparator: LineComparator::default(),
            execution_time_limit: Self::DEFAULT_EXEC_TIME_LIMIT,
        }
    }

    pub fn shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn mode(mut self, mode: JudgeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn comparator(mut self, comparator: LineComparator) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn execution_time_limit(mut self, limit: Duration) -> Self {
        self.execution_time_limit = limit;
        self
    }

    pub fn get_command(&self) -> &str {
        &self.cmd
    }

    pub fn get_mode(&self) -> JudgeMode {
        self.mode
    }

    pub async fn run(&self, testcase: &FsTestcase) -> anyhow::Result<TestOutcome> {
        let script = read_testcase(&testcase.input_path)?;
        let groundtruth = fsutil::read_to_string(&testcase.judge_path)
            .context("Failed to read judge output")?;

        let (judge, score, execution_time, output) = match self.mode {
            JudgeMode::Batch => self.run_batch(testcase, &script, &groundtruth).await?,
            JudgeMode::Interactive => self.run_interactive(&script, &groundtruth).await?,
        };

        Ok(TestOutcome {
            testcase_name: testcase.name.clone(),
            judge,
            score,
            execution_time,
            output,
            groundtruth,
        })
    }

    fn score(
        &self,
        script: &TestCase,
        groundtruth: &str,
        solver_output: &str,
    ) -> anyhow::Result<(JudgeCode, judging::FractionScore)> {
        let outcome = BatchScorer::new(self.comparator).score(
            script,
            &mut Cursor::new(groundtruth),
            &mut Cursor::new(solver_output),
        )?;
        Ok((outcome.verdict.into(), outcome.score))
    }

    async fn run_batch(
        &self,
        testcase: &FsTestcase,
        script: &TestCase,
        groundtruth: &str,
    ) -> anyhow::Result<RunResult> {
        let input = tokio::fs::read(&testcase.input_path)
            .await
            .with_context(|| format!("Failed to read {:?}", testcase.input_path))?;

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let mut proc = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.cmd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| self.spawn_error_msg())?;
        let mut stdin = proc.stdin.take().context("Failed to open stdin")?;
        let mut stdout = proc.stdout.take().context("Failed to open stdout")?;
        let mut stderr = proc.stderr.take().context("Failed to open stderr")?;

        let (res, start_at) = {
            // The solver may exit without reading all of its input.
            let fut_stdin = async move {
                match stdin.write_all(&input).await {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                    _ => Ok(()),
                }
                // stdin is dropped here, closing the pipe
            };
            let fut_stdout = tokio::io::copy(&mut stdout, &mut stdout_buf);
            let fut_stderr = tokio::io::copy(&mut stderr, &mut stderr_buf);
            let fut_exit_status = proc.wait();

            let start_at = Instant::now();

            let res = tokio::time::timeout(self.execution_time_limit, async {
                tokio::try_join!(fut_stdin, fut_stdout, fut_stderr, fut_exit_status)
                    .context("Failed to communicate with subprocess")
            })
            .await;
            (res, start_at)
        };

        let execution_time = Instant::now().duration_since(start_at);

        match res {
            Err(_) => {
                proc.kill()
                    .await
                    .unwrap_or_else(|e| log::warn!("Failed to kill TLE process: {:#}", e));
                Ok((JudgeCode::TLE, None, execution_time, None))
            }

            Ok(Err(e)) => bail!(e),

            Ok(Ok((_, _, _, exit_status))) => {
                let stdout = String::from_utf8_lossy(&stdout_buf).into_owned();
                let (judge, score) = if exit_status.success() {
                    let (judge, score) = self.score(script, groundtruth, &stdout)?;
                    (judge, Some(score))
                } else {
                    (JudgeCode::RE, None)
                };
                let output = ProcessOutput {
                    status: exit_status.code(),
                    stdout,
                    stderr: String::from_utf8_lossy(&stderr_buf).into(),
                };
                Ok((judge, score, execution_time, Some(output)))
            }
        }
    }

    /// The communicator is blocking, so it runs on a blocking thread while this
    /// task watches the clock.
    async fn run_interactive(
        &self,
        script: &TestCase,
        groundtruth: &str,
    ) -> anyhow::Result<RunResult> {
        let mut command = StdCommand::new(&self.shell);
        command
            .arg("-c")
            .arg(&self.cmd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Anything the shell starts shares the pipes, so it has to be
            // killable along with the shell.
            command.process_group(0);
        }
        let mut child = command.spawn().with_context(|| self.spawn_error_msg())?;
        let stdin = child.stdin.take().context("Failed to open stdin")?;
        let stdout = child.stdout.take().context("Failed to open stdout")?;
        let mut stderr = child.stderr.take().context("Failed to open stderr")?;

        let start_at = Instant::now();
        let deadline = start_at + self.execution_time_limit;

        let exchange = {
            let script = script.clone();
            tokio::task::spawn_blocking(move || {
                let mut comm = Communicator::new(BufReader::new(stdout), stdin);
                let mut transcript = Vec::new();
                let res = comm.run(&script, &mut transcript);
                // Dropping the communicator closes the solver's stdin.
                drop(comm);
                (res, transcript)
            })
        };
        let stderr_reader = tokio::task::spawn_blocking(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            buf
        });

        let Ok(joined) = tokio::time::timeout_at(deadline, exchange).await else {
            kill(&mut child);
            return Ok((JudgeCode::TLE, None, start_at.elapsed(), None));
        };
        let (exchange_res, transcript) = joined.context("Communicator thread panicked")?;

        let exit_status = loop {
            if let Some(status) = child.try_wait().context("Failed to wait for solver")? {
                break status;
            }
            if Instant::now() >= deadline {
                kill(&mut child);
                return Ok((JudgeCode::TLE, None, start_at.elapsed(), None));
            }
            tokio::time::sleep(Self::EXIT_POLL_INTERVAL).await;
        };
        let execution_time = start_at.elapsed();
        kill_process_group(&child);

        let stderr_buf = tokio::time::timeout(Duration::from_millis(100), stderr_reader)
            .await
            .ok()
            .and_then(Result::ok)
            .unwrap_or_default();
        let transcript = String::from_utf8_lossy(&transcript).into_owned();

        let (judge, score) = match exchange_res {
            Err(e) if !(e.is_protocol_violation() || e.is_solver_fault()) => {
                log::error!("Communicator failed: {}", e);
                (JudgeCode::JF, None)
            }
            Err(e) if !exit_status.success() => {
                log::debug!("Solver exited abnormally during the exchange: {}", e);
                (JudgeCode::RE, None)
            }
            Err(e) => {
                log::warn!("{}", e);
                (JudgeCode::WA, None)
            }
            Ok(_) if !exit_status.success() => (JudgeCode::RE, None),
            Ok(_) => {
                let (judge, score) = self.score(script, groundtruth, &transcript)?;
                (judge, Some(score))
            }
        };

        let output = ProcessOutput {
            status: exit_status.code(),
            stdout: transcript,
            stderr: String::from_utf8_lossy(&stderr_buf).into(),
        };
        Ok((judge, score, execution_time, Some(output)))
    }

    fn spawn_error_msg(&self) -> String {
        format!(
            "Failed to spawn '{} -c {}'",
            self.shell.to_string_lossy(),
            self.cmd
        )
    }
}

type RunResult = (
    JudgeCode,
    Option<judging::FractionScore>,
    Duration,
    Option<ProcessOutput>,
);

fn read_testcase(path: &Path) -> anyhow::Result<TestCase> {
    let mut reader = fsutil::open_buffered(path)?;
    TestCase::parse(&mut reader).with_context(|| format!("Invalid testcase {:?}", path))
}

fn kill(child: &mut std::process::Child) {
    kill_process_group(child);
    child
        .kill()
        .unwrap_or_else(|e| log::warn!("Failed to kill TLE process: {:#}", e));
    let _ = child.wait();
}

/// Kills whatever is left in the solver's process group.
#[cfg(unix)]
fn kill_process_group(child: &std::process::Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
        Err(e) => log::warn!("Failed to kill process group {}: {}", child.id(), e),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &std::process::Child) {}

#[cfg(test)]
mod test {
    use super::*;

    struct X {
        input: &'static str,
        groundtruth: &'static str,
        script: &'static str,
        mode: JudgeMode,
        want_judge: JudgeCode,
    }

    const ECHO_UPPER: &str = r#"read n; i=0; while [ "$i" -lt "$n" ]; do read line; echo "$line" | tr a-z A-Z; i=$((i+1)); done"#;

    async fn run_test(x: X) -> TestOutcome {
        let tmp = tempfile::tempdir().unwrap();
        let t = FsTestcase::new("sample", tmp.path().join("1.in"), tmp.path().join("1.out"));
        fsutil::write(&t.input_path, x.input).unwrap();
        fsutil::write(&t.judge_path, x.groundtruth).unwrap();

        let r = TestRunner::new(x.script)
            .mode(x.mode)
            .execution_time_limit(Duration::from_millis(1000));

        let res = dbg!(r.run(&t).await).unwrap();
        assert_eq!(res.judge, x.want_judge);
        res
    }

    #[tokio::test]
    async fn batch_should_be_ac() {
        let res = run_test(X {
            input: "2\nab\ncd\n",
            groundtruth: "AB\nCD\n",
            script: "tail -n +2 | tr a-z A-Z",
            mode: JudgeMode::Batch,
            want_judge: JudgeCode::AC,
        })
        .await;
        let output = res.output.unwrap();
        assert_eq!(output.status, Some(0));
        assert_eq!(output.stdout, "AB\nCD\n");
    }

    #[tokio::test]
    async fn batch_partial_is_wa_with_score() {
        let res = run_test(X {
            input: "4\nab\ncd\nef\ngh\n",
            groundtruth: "AB\nCD\nEF\nGH\n",
            script: "printf 'AB\\nCD\\nEF\\n'",
            mode: JudgeMode::Batch,
            want_judge: JudgeCode::WA,
        })
        .await;
        assert_eq!(res.score, Some(judging::FractionScore::new(3, 4)));
    }

    #[tokio::test]
    async fn batch_broken_judge_is_jf() {
        run_test(X {
            input: "1\nab\n",
            groundtruth: "ab\n",
            script: "echo AB",
            mode: JudgeMode::Batch,
            want_judge: JudgeCode::JF,
        })
        .await;
    }

    #[tokio::test]
    async fn batch_should_be_re_even_if_stdout_is_correct() {
        run_test(X {
            input: "1\nab\n",
            groundtruth: "AB\n",
            script: "echo AB; exit 42",
            mode: JudgeMode::Batch,
            want_judge: JudgeCode::RE,
        })
        .await;
    }

    #[tokio::test]
    async fn batch_should_be_tle() {
        run_test(X {
            input: "1\nab\n",
            groundtruth: "AB\n",
            script: "sleep 3",
            mode: JudgeMode::Batch,
            want_judge: JudgeCode::TLE,
        })
        .await;
    }

    #[tokio::test]
    async fn interactive_should_be_ac() {
        let res = run_test(X {
            input: "2\nq1\nq2\n",
            groundtruth: "Q1\nQ2\n",
            script: ECHO_UPPER,
            mode: JudgeMode::Interactive,
            want_judge: JudgeCode::AC,
        })
        .await;
        assert_eq!(res.output.unwrap().stdout, "Q1\nQ2\n");
    }

    #[tokio::test]
    async fn interactive_early_exit_is_wa() {
        run_test(X {
            input: "3\na\nb\nc\n",
            groundtruth: "A\nB\nC\n",
            script: "read n; read q; echo A",
            mode: JudgeMode::Interactive,
            want_judge: JudgeCode::WA,
        })
        .await;
    }

    #[tokio::test]
    async fn interactive_crash_is_re() {
        run_test(X {
            input: "2\na\nb\n",
            groundtruth: "A\nB\n",
            script: "read n; read q; exit 3",
            mode: JudgeMode::Interactive,
            want_judge: JudgeCode::RE,
        })
        .await;
    }

    #[tokio::test]
    async fn interactive_unreadable_output_is_solver_fault() {
        let res = run_test(X {
            input: "1\na\n",
            groundtruth: "A\n",
            script: r"read n; read q; printf '\377\n'",
            mode: JudgeMode::Interactive,
            want_judge: JudgeCode::WA,
        })
        .await;
        assert_eq!(res.score, None);

        run_test(X {
            input: "1\na\n",
            groundtruth: "A\n",
            script: r"read n; read q; printf '\377\n'; exit 2",
            mode: JudgeMode::Interactive,
            want_judge: JudgeCode::RE,
        })
        .await;
    }

    #[tokio::test]
    async fn interactive_unsolicited_output_is_wa() {
        for script in [
            "read n; read q; echo A; echo EXTRA; echo MORE",
            "trap '' PIPE; read n; read q; echo A; echo EXTRA; echo MORE; exit 0",
        ] {
            let res = run_test(X {
                input: "1\na\n",
                groundtruth: "A\n",
                script,
                mode: JudgeMode::Interactive,
                want_judge: JudgeCode::WA,
            })
            .await;
            assert_eq!(res.output.unwrap().stdout, "A\n");
        }
    }

    #[tokio::test]
    async fn interactive_silent_solver_is_tle() {
        run_test(X {
            input: "1\na\n",
            groundtruth: "A\n",
            script: "read n; read q; exec sleep 3",
            mode: JudgeMode::Interactive,
            want_judge: JudgeCode::TLE,
        })
        .await;
    }

    #[test]
    fn interactive_tle_does_not_wait_for_grandchildren() {
        let started = std::time::Instant::now();
        let rt = tokio::runtime::Runtime::new().unwrap();
        let res = rt.block_on(run_test(X {
            input: "1\na\n",
            groundtruth: "A\n",
            script: "read n; read q; sleep 4; echo A",
            mode: JudgeMode::Interactive,
            want_judge: JudgeCode::TLE,
        }));
        // Blocking threads still stuck on the pipes would hold up the drop.
        drop(rt);
        assert!(res.output.is_none());
        assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
    }
}
