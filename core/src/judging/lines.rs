use std::io::{self, BufRead};

use super::error::{Error, Result};

pub type LineSequence = Vec<String>;

/// Reads one line with its trailing `\n` / `\r\n` stripped.
/// Returns `None` on end of stream.
pub fn read_line(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(Some(buf))
}

/// Reads at most `limit` lines (all of them if `limit` is `None`).
pub fn read_lines(reader: &mut impl BufRead, limit: Option<usize>) -> io::Result<LineSequence> {
    let mut lines = Vec::new();
    while limit.map_or(true, |n| lines.len() < n) {
        match read_line(reader)? {
            Some(line) => lines.push(line),
            None => break,
        }
    }
    Ok(lines)
}

/// Like [`read_lines`], with surrounding whitespace trimmed from every line.
/// This is the form lines are compared in.
pub fn read_stripped_lines(
    reader: &mut impl BufRead,
    limit: Option<usize>,
) -> io::Result<LineSequence> {
    let mut lines = read_lines(reader, limit)?;
    for line in &mut lines {
        let trimmed = line.trim();
        if trimmed.len() != line.len() {
            *line = trimmed.to_owned();
        }
    }
    Ok(lines)
}

/// A count-framed input: the first line declares how many data lines follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    lines: LineSequence,
}

impl TestCase {
    pub fn new(lines: LineSequence) -> Self {
        Self { lines }
    }

    pub fn parse(reader: &mut impl BufRead) -> Result<Self> {
        let header = read_line(reader)
            .map_err(|e| Error::Io("test case", e))?
            .ok_or_else(|| Error::InvalidHeader(String::new()))?;
        let declared: usize = header
            .trim()
            .parse()
            .map_err(|_| Error::InvalidHeader(header.clone()))?;

        let lines = read_stripped_lines(reader, None).map_err(|e| Error::Io("test case", e))?;
        if lines.len() != declared {
            return Err(Error::LineCountMismatch {
                declared,
                actual: lines.len(),
            });
        }
        Ok(Self { lines })
    }

    pub fn declared_line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Output produced by a solver (or judge) split at the expected line count.
/// Only `lines` are compared, so only they are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub lines: LineSequence,
    pub extra_lines: LineSequence,
}

impl Submission {
    pub fn read(reader: &mut impl BufRead, expected: usize) -> io::Result<Self> {
        let lines = read_stripped_lines(reader, Some(expected))?;
        let extra_lines = read_lines(reader, None)?;
        Ok(Self { lines, extra_lines })
    }
}
