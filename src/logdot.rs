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

use std::collections::HashMap;
use std::io;

use log::LevelFilter;
use log::Log;
use log::Metadata;
use log::Record;

use crate::Error;
use crate::Logger;
use crate::LogdotConfig;
use crate::non_blocking::FileChannel;
use crate::non_blocking::WorkerGuard;
use crate::writer::DailyWriter;
use crate::writer::FanOut;
use crate::writer::Sink;

/// A default logger plus a set of named category loggers, built from a [`LogdotConfig`].
///
/// Every logger writes to its own daily rotating file below `config.dir`. The default logger
/// additionally writes to standard output when `config.stdout` is set.
///
/// # Examples
///
/// ```
/// use logdot::Logdot;
/// use logdot::LogdotConfig;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = LogdotConfig::new(format!("{}/", dir.path().display()), "%Y-%m-%d.log")
///     .category("access", "access-%Y-%m-%d.log");
///
/// let logdot = Logdot::new(config).unwrap();
/// logdot.logger().info(format_args!("started"));
/// if let Some(access) = logdot.category("access") {
///     access.print("GET /index.html 200");
/// }
/// assert!(logdot.category("audit").is_none());
/// ```
#[derive(Debug)]
pub struct Logdot {
    logger: Logger,
    categories: HashMap<String, Logger>,
    channels: Vec<FileChannel>,
    // dropped after the loggers so that the workers see every line
    _guards: Vec<WorkerGuard>,
}

impl Logdot {
    /// Build all loggers named by `config`.
    ///
    /// # Errors
    ///
    /// Return an error if any log directory cannot be created, any log file cannot be opened,
    /// or any file pattern is invalid.
    pub fn new(config: LogdotConfig) -> Result<Logdot, Error> {
        let LogdotConfig {
            dir,
            file,
            categories: patterns,
            stdout,
            non_blocking,
        } = config;

        let mut channels = vec![];
        let mut guards = vec![];

        let mut categories = HashMap::with_capacity(patterns.len());
        for (name, pattern) in patterns {
            let sink = if non_blocking {
                let (channel, guard) = FileChannel::builder(dir.as_str(), pattern)
                    .thread_name(format!("logdot-{name}"))
                    .build()?;
                let sink: Sink = Box::new(channel.writer());
                channels.push(channel);
                guards.push(guard);
                sink
            } else {
                Box::new(DailyWriter::new(dir.as_str(), pattern)?)
            };
            categories.insert(name, Logger::new(FanOut::new([sink])));
        }

        let writer = if non_blocking {
            let (channel, guard) = FileChannel::builder(dir.as_str(), file)
                .thread_name("logdot-default")
                .build()?;
            let sink: Sink = if stdout {
                Box::new(channel.console_writer())
            } else {
                Box::new(channel.writer())
            };
            channels.push(channel);
            guards.push(guard);
            FanOut::new([sink])
        } else {
            let sink: Sink = Box::new(DailyWriter::new(dir.as_str(), file)?);
            let mut writer = FanOut::new([sink]);
            if stdout {
                writer.push(io::stdout());
            }
            writer
        };

        Ok(Logdot {
            logger: Logger::new(writer),
            categories,
            channels,
            _guards: guards,
        })
    }

    /// The default logger.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The logger of category `name`, if one is configured.
    pub fn category(&self, name: &str) -> Option<&Logger> {
        self.categories.get(name)
    }

    /// The names of all configured categories, in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Whether every background file worker is still running.
    ///
    /// Always `true` when the loggers write synchronously.
    pub fn is_healthy(&self) -> bool {
        self.channels.iter().all(FileChannel::is_alive)
    }

    /// Set up this instance as the global logger of the `log` crate.
    ///
    /// Records whose target names a configured category are written by that category's
    /// logger, all others by the default logger. The instance is never dropped afterwards, so
    /// pending lines of background workers are only written while the process keeps running.
    ///
    /// # Errors
    ///
    /// Return an error if a global logger has already been set.
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }

    fn route(&self, target: &str) -> &Logger {
        self.category(target).unwrap_or(&self.logger)
    }
}

impl Log for Logdot {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.route(record.target()).log(record);
    }

    fn flush(&self) {
        self.logger.flush();
        for logger in self.categories.values() {
            logger.flush();
        }
    }
}
