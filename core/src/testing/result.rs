use std::time::Duration;

use crate::judging::{FractionScore, Verdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub status: Option<i32>,
    /// Captured stdout in batch mode, the transcript in interactive mode.
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub testcase_name: String,
    pub judge: JudgeCode,
    pub score: Option<FractionScore>,
    pub execution_time: Duration,
    pub output: Option<ProcessOutput>,
    pub groundtruth: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum JudgeCode {
    AC,
    WA,
    TLE,
    RE,
    JF,
}

impl From<Verdict> for JudgeCode {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::Accepted => Self::AC,
            Verdict::WrongAnswer => Self::WA,
            Verdict::JudgeFailure => Self::JF,
        }
    }
}
