use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::{Deserialize, Deserializer};

use crate::demo::TargetScores;
use crate::judging::LineComparator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub test: TestConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Comparison rule of the batch checker.
    pub comparison: LineComparator,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JudgeMode {
    #[default]
    Batch,
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub shell: PathBuf,
    pub mode: JudgeMode,
    pub time_limit_ms: u64,
    pub input_pattern: GlobPattern,
    pub judge_extension: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/sh"),
            mode: JudgeMode::Batch,
            time_limit_ms: 2000,
            input_pattern: GlobPattern::default(),
            judge_extension: "out".to_owned(),
        }
    }
}

impl TestConfig {
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub target: Vec<TargetEntry>,
}

/// Number of lines the demo solver answers correctly for a case of `lines` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TargetEntry {
    pub lines: usize,
    pub score: usize,
}

impl DemoConfig {
    pub fn target_scores(&self) -> TargetScores {
        self.target
            .iter()
            .map(|&TargetEntry { lines, score }| (lines, score))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern(glob::Pattern);

impl GlobPattern {
    pub fn parse(pattern: &str) -> StdResult<Self, glob::PatternError> {
        glob::Pattern::new(pattern).map(Self)
    }

    pub fn matches(&self, s: &str) -> bool {
        self.0.matches(s)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for GlobPattern {
    fn default() -> Self {
        Self::parse("*.in").expect("'*.in' is a valid glob")
    }
}

impl<'de> Deserialize<'de> for GlobPattern {
    fn deserialize<D>(deserializer: D) -> StdResult<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Config {
    pub const FILENAME: &str = "kjudge.toml";

    pub fn example_toml() -> String {
        Asset::get(Self::FILENAME)
            .map(|file| String::from_utf8_lossy(file.data.as_ref()).into_owned())
            .unwrap_or_default()
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file in ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> Option<PathBuf> {
        cur_dir
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
    }

    /// Loads the nearest config file, or falls back to the defaults if there is none.
    pub fn from_file_finding_in_ancestors_or_default(
        cur_dir: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        match Self::find_file_in_ancestors(cur_dir) {
            Some(path) => {
                log::debug!("Using config {:?}", path);
                Self::from_toml_file(path)
            }
            None => {
                log::debug!("No {} found, using defaults", Self::FILENAME);
                Ok(Self::default())
            }
        }
    }
}
