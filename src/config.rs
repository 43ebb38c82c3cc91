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

use std::collections::BTreeMap;

/// The configuration record a [`Logdot`](crate::Logdot) is built from.
///
/// File paths are formed by appending a time pattern to `dir` verbatim, so `dir` usually ends
/// with a path separator.
///
/// # Examples
///
/// ```
/// use logdot::LogdotConfig;
///
/// let config = LogdotConfig::new("logs/", "%Y-%m-%d.log")
///     .category("access", "access-%Y-%m-%d.log")
///     .stdout(true);
/// assert_eq!(config.categories.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct LogdotConfig {
    /// The base directory, including a trailing separator.
    pub dir: String,
    /// The time pattern of the default log file.
    pub file: String,
    /// Category names mapped to the time pattern of their log file.
    #[cfg_attr(feature = "serde", serde(default))]
    pub categories: BTreeMap<String, String>,
    /// Whether the default logger also writes to standard output.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stdout: bool,
    /// Whether files are written by background threads instead of the logging thread.
    #[cfg_attr(feature = "serde", serde(default))]
    pub non_blocking: bool,
}

impl LogdotConfig {
    /// Create a configuration with only the default log file.
    pub fn new(dir: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file: file.into(),
            categories: BTreeMap::new(),
            stdout: false,
            non_blocking: false,
        }
    }

    /// Add a category logger writing to its own file pattern.
    pub fn category(mut self, name: impl Into<String>, file: impl Into<String>) -> Self {
        self.categories.insert(name.into(), file.into());
        self
    }

    /// Mirror the default logger to standard output.
    pub fn stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }

    /// Write files from background threads.
    pub fn non_blocking(mut self, non_blocking: bool) -> Self {
        self.non_blocking = non_blocking;
        self
    }
}
