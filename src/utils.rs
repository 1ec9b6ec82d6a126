// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::tree::CodeFile;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

pub fn err_from_str(msg: &str) -> Error {
    msg.into()
}

/// Run `f` and prefix any errors with the string returned by `prefix`.
pub fn try_forward<'a, F, R, C, S>(f: F, prefix: C) -> Result<R>
where
    F: FnOnce() -> Result<R>,
    C: 'a + Fn() -> S,
    S: Into<String>,
{
    #[derive(Debug)]
    struct WrappedError {
        prefix: String,
        cause: Error,
    }
    impl std::fmt::Display for WrappedError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}: {}", self.prefix, self.cause)
        }
    }
    impl std::error::Error for WrappedError {}

    f().map_err(|cause| -> Error {
        Box::new(WrappedError {
            prefix: prefix().into(),
            cause,
        })
    })
}

fn read_bytes_impl(path: &Path) -> Result<Vec<u8>> {
    try_forward(
        || -> Result<Vec<u8>> {
            let mut file = File::open(path)?;
            let mut buffer: Vec<u8> = Vec::new();
            file.read_to_end(&mut buffer)?;
            Ok(buffer)
        },
        || path.display().to_string(),
    )
}

pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    read_bytes_impl(path.as_ref())
}

fn read_code_file_impl(path: &Path) -> Result<CodeFile> {
    let buf = read_bytes_impl(path)?;
    try_forward(
        || -> Result<CodeFile> {
            let text = std::str::from_utf8(&buf)?;
            CodeFile::from_json(text)
        },
        || path.display().to_string(),
    )
}

/// Load a code file as emitted by a language front end.
pub fn read_code_file<P: AsRef<Path>>(path: P) -> Result<CodeFile> {
    read_code_file_impl(path.as_ref())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn try_forward_prefixes_errors() {
        let result: Result<()> = try_forward(|| Err(err_from_str("inner")), || "outer");
        assert_eq!(result.unwrap_err().to_string(), "outer: inner");
    }

    #[test]
    fn missing_code_file_names_path() {
        let err = read_code_file("does/not/exist.json").unwrap_err();
        assert!(err.to_string().starts_with("does/not/exist.json: "));
    }
}
