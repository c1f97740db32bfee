use std::{
    fs::{self, File, ReadDir},
    io::{BufReader, BufWriter},
    path::Path,
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),
    }
}
pub use error::{Error, Result};

pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::write(filepath, contents)
}

pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

/// Opens a file for line-by-line reading.
pub fn open_buffered(filepath: impl AsRef<Path>) -> Result<BufReader<File>> {
    File::open(&filepath)
        .map(BufReader::new)
        .map_err(|e| Error::SingleIO("Cannot open file", filepath.as_ref().to_owned(), e))
}

/// Creates (or truncates) a file, making parent dirs as needed.
pub fn create_buffered_with_mkdir(filepath: impl AsRef<Path>) -> Result<BufWriter<File>> {
    let filepath = filepath.as_ref();
    if let Some(dir) = filepath.parent().filter(|d| !d.as_os_str().is_empty()) {
        self::mkdir_all(dir)?;
    }
    File::create(filepath)
        .map(BufWriter::new)
        .map_err(|e| Error::SingleIO("Cannot create file", filepath.to_owned(), e))
}

pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::{BufRead, Write};

    #[test]
    fn create_buffered_makes_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a/b/transcript.txt");
        {
            let mut w = create_buffered_with_mkdir(&path).unwrap();
            writeln!(w, "hello").unwrap();
        }
        let lines: Vec<_> = open_buffered(&path)
            .unwrap()
            .lines()
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["hello".to_owned()]);
    }

    #[test]
    fn missing_file_error_carries_path() {
        let err = open_buffered("/nonexistent/kjudge/file.in").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/kjudge/file.in"), "{}", msg);
        assert!(matches!(
            err,
            Error::SingleIO(_, _, ref e) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }
}
