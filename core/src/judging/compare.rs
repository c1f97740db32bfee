use serde::{Deserialize, Serialize};

/// Rule deciding whether a candidate line matches a reference line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LineComparator {
    /// The candidate must be the uppercase transform of the reference.
    #[default]
    Uppercase,
    Exact,
}

impl LineComparator {
    pub fn compare(self, reference: &str, candidate: &str) -> bool {
        match self {
            Self::Uppercase => candidate == reference.to_uppercase(),
            Self::Exact => candidate == reference,
        }
    }

    /// Counts matching pairs, zip-truncated to the shorter sequence.
    pub fn count_matches<R, C>(self, reference: &[R], candidate: &[C]) -> usize
    where
        R: AsRef<str>,
        C: AsRef<str>,
    {
        reference
            .iter()
            .zip(candidate)
            .filter(|(r, c)| self.compare(r.as_ref(), c.as_ref()))
            .count()
    }
}
