use std::io::BufRead;

use serde::Serialize;

use super::{
    compare::LineComparator,
    error::{Error, Result, SOLVER_OUTPUT},
    lines::{read_stripped_lines, Submission},
    verdict::{PenalizedScore, SelfCheck, Verdict, VerdictPolicy},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomOutcome {
    pub verdict: Verdict,
    pub score: PenalizedScore,
}

/// Compares a solver's output line by line with the judge's reference.
/// Lines beyond the reference length cost one point each.
#[derive(Debug, Clone, Copy)]
pub struct CustomChecker {
    comparator: LineComparator,
}

impl Default for CustomChecker {
    fn default() -> Self {
        Self {
            comparator: LineComparator::Exact,
        }
    }
}

impl CustomChecker {
    pub fn new(comparator: LineComparator) -> Self {
        Self { comparator }
    }

    pub fn check(
        &self,
        judge_reference: &mut impl BufRead,
        solver_output: &mut impl BufRead,
    ) -> Result<CustomOutcome> {
        let reference = read_stripped_lines(judge_reference, None).map_err(|e| Error::Io("judge output", e))?;
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }
        let n_lines = reference.len();

        let submission =
            Submission::read(solver_output, n_lines).map_err(|e| Error::Io(SOLVER_OUTPUT, e))?;
        if !submission.extra_lines.is_empty() {
            log::warn!(
                "Solver printed {} extra line(s) beyond {}",
                submission.extra_lines.len(),
                n_lines
            );
        }

        let score = PenalizedScore {
            matches: self.comparator.count_matches(&reference, &submission.lines),
            extra: submission.extra_lines.len(),
            hps: n_lines,
        };
        Ok(CustomOutcome {
            verdict: VerdictPolicy::for_penalized(SelfCheck::Passed, &score),
            score,
        })
    }
}
