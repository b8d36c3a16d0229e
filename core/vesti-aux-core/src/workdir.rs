//! Dummy directory lookup and scoped working-directory changes

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Staging directory vesti compiles in.
pub const DEFAULT_DUMMY_DIR: &str = ".vesti-dummy";

/// Environment variable that relocates the dummy directory.
pub const DUMMY_DIR_ENV: &str = "VESTI_DUMMY_DIR";

/// Resolve the dummy directory, honouring `VESTI_DUMMY_DIR` when it is set.
pub fn dummy_dir() -> PathBuf {
    match env::var(DUMMY_DIR_ENV) {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => PathBuf::from(DEFAULT_DUMMY_DIR),
    }
}

/// Changes the process working directory and changes it back when dropped.
///
/// The working directory is process-wide, so at most one guard should be
/// alive at a time.
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: PathBuf,
}

impl WorkdirGuard {
    pub fn enter(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let previous = env::current_dir().context("reading current directory")?;
        env::set_current_dir(dir)
            .with_context(|| format!("entering working directory {}", dir.display()))?;
        debug!(dir = %dir.display(), previous = %previous.display(), "entered working directory");
        Ok(Self { previous })
    }

    /// Directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.previous) {
            warn!(
                previous = %self.previous.display(),
                error = %err,
                "failed to restore working directory"
            );
        }
    }
}

#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn cwd_lock() -> std::sync::MutexGuard<'static, ()> {
        CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn restores_directory_on_drop() {
        let _lock = cwd_lock();
        let tmp = tempdir().expect("tempdir");
        let inner = tmp.path().join("inner");
        fs::create_dir_all(&inner).expect("mkdir");
        let before = env::current_dir().expect("cwd");

        {
            let guard = WorkdirGuard::enter(&inner).expect("enter");
            assert_eq!(guard.previous(), before.as_path());
            assert_eq!(
                env::current_dir().unwrap().canonicalize().unwrap(),
                inner.canonicalize().unwrap()
            );
        }

        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    fn restores_directory_when_work_fails() {
        let _lock = cwd_lock();
        let tmp = tempdir().expect("tempdir");
        let before = env::current_dir().expect("cwd");

        let result: Result<()> = (|| {
            let _guard = WorkdirGuard::enter(tmp.path())?;
            anyhow::bail!("tool failed")
        })();

        assert!(result.is_err());
        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    fn missing_directory_is_an_error_and_leaves_cwd_alone() {
        let _lock = cwd_lock();
        let before = env::current_dir().expect("cwd");

        let err = WorkdirGuard::enter("/nonexistent/vesti-aux/dummy").unwrap_err();

        assert!(format!("{err:#}").contains("/nonexistent/vesti-aux/dummy"));
        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    fn dummy_dir_uses_override_env() {
        let _lock = cwd_lock();
        env::set_var(DUMMY_DIR_ENV, "/tmp/custom-dummy");
        let overridden = dummy_dir();
        env::set_var(DUMMY_DIR_ENV, "   ");
        let blank = dummy_dir();
        env::remove_var(DUMMY_DIR_ENV);

        assert_eq!(overridden, PathBuf::from("/tmp/custom-dummy"));
        assert_eq!(blank, PathBuf::from(DEFAULT_DUMMY_DIR));
        assert_eq!(dummy_dir(), PathBuf::from(DEFAULT_DUMMY_DIR));
    }
}
