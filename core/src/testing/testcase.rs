use std::path::{Path, PathBuf};

use crate::config::GlobPattern;

/// An input file paired with the judge's reference output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsTestcase {
    pub name: String,
    pub input_path: PathBuf,
    pub judge_path: PathBuf,
}

impl FsTestcase {
    pub fn new(
        name: impl Into<String>,
        input: impl Into<PathBuf>,
        judge: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            input_path: input.into(),
            judge_path: judge.into(),
        }
    }

    /// Finds `input_pattern` files in `dir` whose judge file (same stem,
    /// `judge_extension`) exists, sorted by name.
    pub fn enumerate(
        dir: impl AsRef<Path>,
        input_pattern: &GlobPattern,
        judge_extension: &str,
    ) -> fsutil::Result<Vec<Self>> {
        let mut res = Vec::new();
        for entry in fsutil::read_dir(&dir)?.filter_map(Result::ok) {
            let Ok(ft) = entry.file_type() else {
                continue
            };
            if ft.is_dir() {
                continue;
            }
            let filename = entry.file_name();
            if !input_pattern.matches(&filename.to_string_lossy()) {
                continue;
            }

            let input = entry.path();
            let judge = input.with_extension(judge_extension);
            if judge == input {
                continue;
            }
            if !judge.is_file() {
                log::warn!("Skipping {:?}: no judge file {:?}", input, judge);
                continue;
            }
            let name = input
                .file_stem()
                .unwrap_or(filename.as_os_str())
                .to_string_lossy()
                .into_owned();
            res.push(Self::new(name, input, judge));
        }
        res.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(res)
    }
}
