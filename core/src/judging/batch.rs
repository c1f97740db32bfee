use std::io::BufRead;

use serde::Serialize;

use super::{
    compare::LineComparator,
    error::{Error, Result, SOLVER_OUTPUT},
    lines::{read_stripped_lines, TestCase},
    verdict::{FractionScore, SelfCheck, Verdict, VerdictPolicy},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub verdict: Verdict,
    pub score: FractionScore,
}

/// Scores a solver's output against the test case, after checking that the
/// judge's own output is a perfect transform of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchScorer {
    comparator: LineComparator,
}

impl BatchScorer {
    pub fn new(comparator: LineComparator) -> Self {
        Self { comparator }
    }

    pub fn score(
        &self,
        testcase: &TestCase,
        judge_output: &mut impl BufRead,
        solver_output: &mut impl BufRead,
    ) -> Result<BatchOutcome> {
        let n = testcase.declared_line_count();

        let judge_lines = read_stripped_lines(judge_output, Some(n)).map_err(|e| Error::Io("judge output", e))?;
        let judge_score = FractionScore::new(
            self.comparator.count_matches(testcase.lines(), &judge_lines),
            n,
        );
        let self_check = SelfCheck::from(judge_score.is_perfect());
        if self_check == SelfCheck::Failed {
            log::error!(
                "Judge output matches only {}/{} lines of the test case",
                judge_score.matches,
                n
            );
            let score = FractionScore::new(0, n);
            return Ok(BatchOutcome {
                verdict: VerdictPolicy::for_fraction(self_check, &score),
                score,
            });
        }

        let solver_lines =
            read_stripped_lines(solver_output, Some(n)).map_err(|e| Error::Io(SOLVER_OUTPUT, e))?;
        let score = FractionScore::new(
            self.comparator.count_matches(testcase.lines(), &solver_lines),
            n,
        );
        log::debug!("Solver matched {}/{} lines", score.matches, n);

        Ok(BatchOutcome {
            verdict: VerdictPolicy::for_fraction(self_check, &score),
            score,
        })
    }
}
