//! A solver that answers only part of a case correctly, for trying out the
//! checkers with a known partial score.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::judging::{self, TestCase};

/// Case size (line count) -> number of lines to answer correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetScores(HashMap<usize, usize>);

impl TargetScores {
    /// Cases without an entry are answered in full.
    pub fn target_for(&self, line_count: usize) -> usize {
        self.0.get(&line_count).copied().unwrap_or(line_count)
    }
}

impl From<HashMap<usize, usize>> for TargetScores {
    fn from(m: HashMap<usize, usize>) -> Self {
        Self(m)
    }
}

impl FromIterator<(usize, usize)> for TargetScores {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct DemoSolver {
    targets: TargetScores,
}

impl DemoSolver {
    pub fn new(targets: TargetScores) -> Self {
        Self { targets }
    }

    /// Uppercases the first `target` lines and echoes the rest.
    pub fn solve(&self, input: &mut impl BufRead, output: &mut impl Write) -> judging::Result<()> {
        let testcase = TestCase::parse(input)?;
        let target = self.targets.target_for(testcase.declared_line_count());
        log::debug!(
            "Answering {} of {} lines correctly",
            target.min(testcase.declared_line_count()),
            testcase.declared_line_count()
        );

        let io_err = |e| judging::Error::Io("demo output", e);
        for (i, line) in testcase.lines().iter().enumerate() {
            if i < target {
                writeln!(output, "{}", line.to_uppercase()).map_err(io_err)?;
            } else {
                writeln!(output, "{}", line).map_err(io_err)?;
            }
        }
        output.flush().map_err(io_err)
    }
}
