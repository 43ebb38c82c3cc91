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

//! Logdot is a small logging utility that routes formatted lines to the console, daily rotating
//! files and per-category files.
//!
//! # Overview
//!
//! Every destination is a plain [`std::io::Write`]. A [`writer::FanOut`] writes each line to
//! several destinations in order, a [`writer::DailyWriter`] switches to a new file whenever the
//! time-derived file name changes, and a [`non_blocking::FileChannel`] moves file I/O onto a
//! background thread fed through a bounded queue. A [`Logger`] renders lines with a timestamp
//! and the caller's location, and a [`Logdot`] assembles a default logger and named category
//! loggers from a [`LogdotConfig`].
//!
//! # Examples
//!
//! Compose writers by hand:
//!
//! ```
//! use logdot::Logger;
//! use logdot::writer::DailyWriter;
//! use logdot::writer::FanOut;
//! use logdot::writer::Sink;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let fixed = format!("{}/", dir.path().display());
//! let daily: Sink = Box::new(DailyWriter::new(fixed, "%Y-%m-%d.log").unwrap());
//!
//! let logger = Logger::new(FanOut::with_console([daily]));
//! logdot::info!(logger, "listening on {}", 8080);
//! ```
//!
//! Build everything from a configuration:
//!
//! ```
//! use logdot::Logdot;
//! use logdot::LogdotConfig;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = LogdotConfig::new(format!("{}/", dir.path().display()), "%Y-%m-%d.log")
//!     .category("access", "access-%Y-%m-%d.log")
//!     .stdout(true);
//!
//! let logdot = Logdot::new(config).unwrap();
//! logdot.logger().warn(format_args!("cache miss ratio {:.2}", 0.37));
//! logdot.category("access").unwrap().print("GET / 200");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod layout;
pub mod non_blocking;
pub mod paths;
pub mod trap;
pub mod writer;

pub use self::config::LogdotConfig;
pub use self::error::Error;
pub use self::layout::Layout;
pub use self::logdot::Logdot;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::trap::Trap;

mod clock;
mod config;
mod error;
mod logdot;
mod logger;

/// The platform path separator.
pub const PATH_SEPARATOR: &str = std::path::MAIN_SEPARATOR_STR;

/// The line separator used by hosts that expect CRLF line endings.
pub const LINE_SEPARATOR: &str = "\r\n";
