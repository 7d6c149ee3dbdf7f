use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    logger,
};

/// Source of the bearer token sent with API requests. `audience` selects a projected
/// service account token where the fetcher supports it.
pub trait TokenFetcher: Send + Sync {
    fn token(&self, audience: Option<&str>) -> Result<Option<String>>;
}

pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

fn read_token(path: &Path) -> Result<String> {
    let token = fs::read_to_string(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::TokenNotFound(path.display().to_string()),
            _ => Error::IO(e),
        })?
        .trim()
        .to_string();

    if token.is_empty() {
        return Err(Error::TokenNotFound(path.display().to_string()));
    }

    Ok(token)
}

#[derive(Clone, Debug)]
pub struct StringTokenFetcher {
    token: String,
}

impl StringTokenFetcher {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenFetcher for StringTokenFetcher {
    fn token(&self, _: Option<&str>) -> Result<Option<String>> {
        Ok(Some(self.token.clone()))
    }
}

/// Reads the service account token mounted into the pod.
#[derive(Clone, Debug)]
pub struct FileTokenFetcher {
    path: PathBuf,
}

impl FileTokenFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenFetcher for FileTokenFetcher {
    fn token(&self, _: Option<&str>) -> Result<Option<String>> {
        logger!(debug, "Reading token from {}", self.path.display());

        read_token(&self.path).map(Some)
    }
}

/// Reads projected service account tokens, one file per audience under `mount`.
#[derive(Clone, Debug)]
pub struct PsatTokenFetcher {
    mount: PathBuf,
}

impl PsatTokenFetcher {
    pub fn new(mount: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.into(),
        }
    }
}

impl TokenFetcher for PsatTokenFetcher {
    fn token(&self, audience: Option<&str>) -> Result<Option<String>> {
        let audience = audience.ok_or(Error::MissingAudience)?;

        read_token(&self.mount.join(audience)).map(Some)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTokenFetcher;

impl TokenFetcher for NoopTokenFetcher {
    fn token(&self, _: Option<&str>) -> Result<Option<String>> {
        logger!(debug, "NoopTokenFetcher configured and no token sent in");

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn string_token() {
        let fetcher = StringTokenFetcher::new("abc123");

        assert_eq!(fetcher.token(None).unwrap().as_deref(), Some("abc123"));
        assert_eq!(fetcher.token(Some("any")).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn file_token_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "token", "abc123\n");

        let actual = FileTokenFetcher::new(path).token(None).unwrap();

        assert_eq!(actual.as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_file_token() {
        let dir = TempDir::new().unwrap();

        let actual = FileTokenFetcher::new(dir.path().join("token")).token(None);

        assert!(matches!(actual, Err(Error::TokenNotFound(_))));
    }

    #[test]
    fn unreadable_file_token_keeps_io_error() {
        let dir = TempDir::new().unwrap();

        // a directory cannot be read as a token
        let actual = FileTokenFetcher::new(dir.path()).token(None);

        assert!(matches!(actual, Err(Error::IO(_))));
    }

    #[test]
    fn empty_file_token() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "token", "  \n");

        let actual = FileTokenFetcher::new(path).token(None);

        assert!(matches!(actual, Err(Error::TokenNotFound(_))));
    }

    #[test]
    fn psat_token_per_audience() {
        let dir = TempDir::new().unwrap();
        write(&dir, "test-token.txt", "abc123");

        let fetcher = PsatTokenFetcher::new(dir.path());

        assert_eq!(
            fetcher.token(Some("test-token.txt")).unwrap().as_deref(),
            Some("abc123")
        );
        assert!(matches!(fetcher.token(None), Err(Error::MissingAudience)));
    }

    #[test]
    fn noop_token() {
        assert_eq!(NoopTokenFetcher.token(None).unwrap(), None);
    }

    #[test]
    fn bearer() {
        assert_eq!(bearer_header("abc123"), "Bearer abc123");
    }
}
