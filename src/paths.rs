// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Directories derived from the location of the running program.

use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;

use crate::Error;
use crate::LogdotConfig;
use crate::PATH_SEPARATOR;

/// The program directory and the runtime directory below it.
///
/// These are computed once, typically at start-up, and passed on explicitly.
///
/// # Examples
///
/// ```
/// use logdot::paths::ProgramPaths;
///
/// let paths = ProgramPaths::from_program("/opt/app/bin/server").unwrap();
/// assert_eq!(paths.program_dir(), std::path::Path::new("/opt/app/bin"));
/// assert_eq!(paths.runtime_dir(), std::path::Path::new("/opt/app/bin/runtime"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramPaths {
    program_dir: PathBuf,
    runtime_dir: PathBuf,
}

impl ProgramPaths {
    /// Derive the paths from the executable of the current process.
    ///
    /// # Errors
    ///
    /// Return an error if the executable path cannot be determined.
    pub fn from_current_exe() -> Result<Self, Error> {
        let exe = std::env::current_exe().map_err(|err| {
            Error::new("failed to determine the current executable").with_source(err)
        })?;
        Self::from_program(exe)
    }

    /// Derive the paths from the path of a program file.
    ///
    /// # Errors
    ///
    /// Return an error if the path cannot be made absolute or has no parent directory.
    pub fn from_program(program: impl AsRef<Path>) -> Result<Self, Error> {
        let program = program.as_ref();
        let absolute = std::path::absolute(program).map_err(|err| {
            Error::new("failed to resolve program path")
                .with_context("program", program.display())
                .with_source(err)
        })?;
        let program_dir = absolute
            .parent()
            .ok_or_else(|| {
                Error::new("program path has no parent directory")
                    .with_context("program", absolute.display())
            })?
            .to_path_buf();
        let runtime_dir = program_dir.join("runtime");
        Ok(Self {
            program_dir,
            runtime_dir,
        })
    }

    /// The directory containing the program.
    pub fn program_dir(&self) -> &Path {
        &self.program_dir
    }

    /// The directory for files generated at runtime.
    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }

    /// The runtime subdirectory for the day of `now`, named `YYYY-MM-DD`.
    pub fn daily_dir(&self, now: &Zoned) -> PathBuf {
        self.runtime_dir.join(now.strftime("%Y-%m-%d").to_string())
    }

    /// A [`LogdotConfig`] writing the default log file pattern into the runtime directory.
    pub fn log_config(&self, file: impl Into<String>) -> LogdotConfig {
        let dir = format!("{}{PATH_SEPARATOR}", self.runtime_dir.display());
        LogdotConfig::new(dir, file)
    }
}
