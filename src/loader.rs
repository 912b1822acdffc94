use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::{Chain, TargetEnv};
use crate::error::Error;
use crate::model::LoadReport;
use crate::parser::{EnvMap, parse_file_with};

const DEFAULT_FILE: &str = ".env";

/// Load `.env` from the current working directory into the process environment.
///
/// # Safety
///
/// Same contract as [`TargetEnv::process`]: no other thread may read or write
/// the process environment while this runs.
pub unsafe fn dotenv() -> Result<LoadReport, Error> {
    unsafe { from_path(DEFAULT_FILE) }
}

/// Load a dotenv file into the process environment.
///
/// # Safety
///
/// Same contract as [`TargetEnv::process`]: no other thread may read or write
/// the process environment while this runs.
pub unsafe fn from_path(path: impl AsRef<Path>) -> Result<LoadReport, Error> {
    let target = unsafe { TargetEnv::process() };
    EnvLoader::new().path(path).target(target).load()
}

/// Builder-style dotenv loader.
///
/// Files are parsed in the order they were added. References in a later file
/// resolve against the keys of earlier files first, then against the target
/// environment. Later files win on duplicate keys.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    paths: Vec<PathBuf>,
    override_existing: bool,
    ignore_missing: bool,
    target: TargetEnv,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.paths
            .extend(paths.into_iter().map(|path| path.as_ref().to_path_buf()));
        self
    }

    /// Replace variables already present in the target. Off by default.
    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// Skip files that do not exist instead of failing.
    pub fn ignore_missing(mut self, ignore_missing: bool) -> Self {
        self.ignore_missing = ignore_missing;
        self
    }

    pub fn target(mut self, target: TargetEnv) -> Self {
        self.target = target;
        self
    }

    pub fn target_env(&self) -> &TargetEnv {
        &self.target
    }

    pub fn into_target(self) -> TargetEnv {
        self.target
    }

    /// Parse all configured files and return the merged variables without
    /// touching the target.
    pub fn parse_only(&self) -> Result<EnvMap, Error> {
        let (merged, _) = self.collect()?;
        Ok(merged)
    }

    /// Parse all configured files and apply the result to the target.
    pub fn load(&mut self) -> Result<LoadReport, Error> {
        let (merged, files_read) = self.collect()?;
        let mut report = LoadReport {
            files_read,
            ..LoadReport::default()
        };

        let mut entries: Vec<_> = merged.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        // Nothing is written unless every entry fits the target.
        if let Some((key, _)) = entries
            .iter()
            .find(|(key, value)| !self.target.accepts(key, value))
        {
            return Err(Error::InvalidEntry { key: key.clone() });
        }

        for (key, value) in entries {
            if !self.override_existing && self.target.contains_key(&key) {
                debug!(key = %key, "skipping existing key");
                report.skipped_existing += 1;
                continue;
            }

            self.target.set_var(&key, &value);
            report.loaded += 1;
        }

        debug!(
            loaded = report.loaded,
            skipped_existing = report.skipped_existing,
            files_read = report.files_read,
            "loaded dotenv files"
        );
        Ok(report)
    }

    fn collect(&self) -> Result<(EnvMap, usize), Error> {
        let mut merged = EnvMap::new();
        let mut files_read = 0usize;

        for path in self.effective_paths() {
            let env = Chain {
                first: &merged,
                second: &self.target,
            };
            let parsed = match parse_file_with(&path, &env) {
                Ok(parsed) => parsed,
                Err(Error::FileRead { source, .. })
                    if self.ignore_missing && source.kind() == ErrorKind::NotFound =>
                {
                    debug!(path = %path.display(), "skipping missing env file");
                    continue;
                }
                Err(err) => return Err(err),
            };

            files_read += 1;
            merged.extend(parsed);
        }

        Ok((merged, files_read))
    }

    fn effective_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(DEFAULT_FILE)]
        } else {
            self.paths.clone()
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            override_existing: false,
            ignore_missing: false,
            target: TargetEnv::memory(),
        }
    }
}
