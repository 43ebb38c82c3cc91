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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::clock::Clock;
use crate::writer::PathPattern;

/// A writer that appends to a file whose path is derived from the current time.
///
/// Before every write the path is resolved again from the [`PathPattern`]. When it differs from
/// the path of the open file, the writer switches: the new file is opened first and the previous
/// one is closed afterwards, so no write is lost in between.
///
/// A writer that cannot reach its destination does not keep running degraded: if the new file
/// cannot be opened during a switch, the write panics with the failing path.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use logdot::writer::DailyWriter;
///
/// let dir = tempfile::tempdir().unwrap();
/// let fixed = format!("{}/", dir.path().display());
/// let mut writer = DailyWriter::new(fixed, "%Y-%m-%d.log").unwrap();
/// writer.write_all(b"hello\n").unwrap();
/// ```
#[derive(Debug)]
pub struct DailyWriter {
    state: State,
    writer: File,
}

impl DailyWriter {
    /// Create a writer for the given prefix and time pattern.
    ///
    /// The target file is opened immediately.
    ///
    /// # Errors
    ///
    /// Return an error if the pattern is invalid, or the log directory or file cannot be created.
    pub fn new(fixed: impl Into<String>, variable: impl Into<String>) -> Result<Self, Error> {
        DailyWriter::builder(fixed, variable).build()
    }

    /// Create a new [`DailyWriterBuilder`].
    #[must_use]
    pub fn builder(fixed: impl Into<String>, variable: impl Into<String>) -> DailyWriterBuilder {
        DailyWriterBuilder::new(fixed, variable)
    }

    /// The path of the file currently written to.
    pub fn path(&self) -> &Path {
        &self.state.path
    }

    /// The pattern paths are resolved from.
    pub fn pattern(&self) -> &PathPattern {
        &self.state.pattern
    }

    fn switch(&mut self, path: PathBuf) -> Result<(), Error> {
        let file = open_log_file(&path).map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })?;
        let previous = std::mem::replace(&mut self.writer, file);
        drop(previous);
        self.state.path = path;
        Ok(())
    }
}

impl Write for DailyWriter {
    /// # Panics
    ///
    /// Panic if the path changed and the new log file cannot be opened. The previous file is
    /// left untouched in that case.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let now = self.state.clock.now();
        let path = self.state.pattern.resolve(&now).map_err(io::Error::other)?;
        if path != self.state.path {
            if let Err(err) = self.switch(path) {
                panic!("{err}");
            }
        }
        self.writer.write(buf).map_err(|err| {
            let kind = err.kind();
            let err = Error::new("failed to write log file")
                .with_context("path", self.state.path.display())
                .with_source(err);
            io::Error::new(kind, err)
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A builder for configuring [`DailyWriter`].
#[derive(Debug)]
pub struct DailyWriterBuilder {
    pattern: PathPattern,
    clock: Clock,
}

impl DailyWriterBuilder {
    /// Create a new [`DailyWriterBuilder`].
    #[must_use]
    pub fn new(fixed: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            pattern: PathPattern::new(fixed, variable),
            clock: Clock::DefaultClock,
        }
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the [`DailyWriter`], opening the file for the current time.
    ///
    /// # Errors
    ///
    /// Return an error if the pattern is invalid, or the log directory or file cannot be created.
    pub fn build(self) -> Result<DailyWriter, Error> {
        let DailyWriterBuilder { pattern, clock } = self;
        let path = pattern.resolve(&clock.now())?;
        let writer = open_log_file(&path).map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })?;
        let state = State {
            pattern,
            path,
            clock,
        };
        Ok(DailyWriter { state, writer })
    }
}

#[derive(Debug)]
struct State {
    pattern: PathPattern,
    path: PathBuf,
    clock: Clock,
}

pub(crate) fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().append(true).create(true).open(path)
}
