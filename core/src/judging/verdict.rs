use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Verdict {
    #[serde(rename = "ac")]
    #[strum(serialize = "ac")]
    Accepted,

    #[serde(rename = "wa")]
    #[strum(serialize = "wa")]
    WrongAnswer,

    /// The reference output failed self-validation: the test data is broken.
    #[serde(rename = "jf")]
    #[strum(serialize = "jf")]
    JudgeFailure,
}

/// Fraction of matching lines, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FractionScore {
    pub matches: usize,
    pub total: usize,
}

impl FractionScore {
    pub fn new(matches: usize, total: usize) -> Self {
        debug_assert!(matches <= total);
        Self { matches, total }
    }

    /// An empty case counts as fully matched.
    pub fn value(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.matches as f64 / self.total as f64
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.matches == self.total
    }
}

/// Match count minus a penalty of one per extra line, normalized by `hps`.
/// Unlike [`FractionScore`] this can go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenalizedScore {
    pub matches: usize,
    pub extra: usize,
    /// Highest possible score.
    pub hps: usize,
}

impl PenalizedScore {
    pub fn raw(&self) -> i64 {
        self.matches as i64 - self.extra as i64
    }

    pub fn normalized(&self) -> f64 {
        self.raw() as f64 / self.hps as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfCheck {
    Passed,
    Failed,
}

impl From<bool> for SelfCheck {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// Maps scores to verdicts. A failed self-check voids the test case whatever
/// the score is.
pub struct VerdictPolicy;

impl VerdictPolicy {
    pub fn for_fraction(self_check: SelfCheck, score: &FractionScore) -> Verdict {
        match self_check {
            SelfCheck::Failed => Verdict::JudgeFailure,
            SelfCheck::Passed if score.is_perfect() => Verdict::Accepted,
            SelfCheck::Passed => Verdict::WrongAnswer,
        }
    }

    /// NOTE: `raw > hps` is kept as the checker has always compared it, so a
    /// perfect answer (`raw == hps`) is reported as "wa".
    pub fn for_penalized(self_check: SelfCheck, score: &PenalizedScore) -> Verdict {
        match self_check {
            SelfCheck::Failed => Verdict::JudgeFailure,
            SelfCheck::Passed if score.raw() > score.hps as i64 => Verdict::Accepted,
            SelfCheck::Passed => Verdict::WrongAnswer,
        }
    }
}
