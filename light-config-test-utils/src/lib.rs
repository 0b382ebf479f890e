//! Test utilities for light-config crates
//!
//! Tests build their configuration layouts in an isolated temporary directory
//! instead of the real working directory, and pass that directory explicitly
//! as the base directory of the loader. This keeps tests independent of each
//! other and of the machine they run on.
//!
//! ## Usage
//!
//! ```no_run
//! use light_config_test_utils::ConfigFixture;
//!
//! #[test]
//! fn test_something() {
//!     let fixture = ConfigFixture::new().unwrap();
//!     fixture.write("etc/utest/app.json", r#"{"name": "utest"}"#).unwrap();
//!     // Load with fixture.root() as the base directory
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// RAII guard for an isolated configuration directory
///
/// The directory is removed on drop, and any environment variable changed
/// through [`ConfigFixture::set_env_var`] is restored.
pub struct ConfigFixture {
    temp_dir: TempDir,
    original_env_vars: HashMap<String, Option<String>>,
}

impl ConfigFixture {
    /// Create a new empty fixture directory
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp_dir: create_temp_dir_with_retry()?,
            original_env_vars: HashMap::new(),
        })
    }

    /// Root of the fixture, to be used as the loader's base directory
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the fixture
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn write(
        &self,
        relative: impl AsRef<Path>,
        content: impl AsRef<[u8]>,
    ) -> std::io::Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Create an (empty) directory at `relative`
    pub fn create_dir(&self, relative: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = self.path(relative);
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Set an environment variable and remember original value for restoration
    ///
    /// Tests calling this must be marked `#[serial]` since the process
    /// environment is shared by all threads.
    pub fn set_env_var(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) {
        self.remember_env_var(key.as_ref());
        std::env::set_var(key.as_ref(), value.as_ref());
    }

    /// Remove an environment variable and remember original value for restoration
    pub fn remove_env_var(&mut self, key: impl AsRef<str>) {
        self.remember_env_var(key.as_ref());
        std::env::remove_var(key.as_ref());
    }

    fn remember_env_var(&mut self, key: &str) {
        if !self.original_env_vars.contains_key(key) {
            self.original_env_vars.insert(key.to_string(), std::env::var(key).ok());
        }
    }
}

impl Drop for ConfigFixture {
    fn drop(&mut self) {
        for (key, original_value) in &self.original_env_vars {
            match original_value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

/// Create a temporary directory, retrying on transient failures
pub fn create_temp_dir_with_retry() -> std::io::Result<TempDir> {
    let mut attempt = 1;
    loop {
        match TempDir::new() {
            Ok(dir) => return Ok(dir),
            Err(_) if attempt < 3 => {
                std::thread::sleep(std::time::Duration::from_millis(10 * attempt));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
