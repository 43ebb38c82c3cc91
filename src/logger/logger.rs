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

use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::Mutex;
use std::sync::MutexGuard;

use log::Level;
use log::LevelFilter;
use log::Metadata;
use log::Record;

use crate::Error;
use crate::Layout;
use crate::LoggerBuilder;
use crate::Trap;

/// A logger that formats lines and writes them to a single writer.
///
/// The writer is usually a [`FanOut`](crate::writer::FanOut) over the actual destinations. Every
/// line carries the location of the code that called the logger, not of the logger itself.
///
/// Write failures cannot be returned from a logging call; they are reported to the logger's
/// [`Trap`].
///
/// # Examples
///
/// ```
/// use logdot::Logger;
///
/// let logger = Logger::new(std::io::stdout());
/// logger.print("raw line");
/// logger.info(format_args!("{} jobs queued", 3));
/// logdot::warn!(logger, "disk at {}%", 91);
/// logger.errorf(format_args!("exit code {}", 1));
/// ```
pub struct Logger {
    writer: Mutex<Box<dyn Write + Send>>,
    layout: Box<dyn Layout>,
    trap: Box<dyn Trap>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("layout", &self.layout)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Create a logger writing to `writer` with the default layout and trap.
    pub fn new(writer: impl Write + Send + 'static) -> Logger {
        Logger::builder(writer).build()
    }

    /// Create a [`LoggerBuilder`] writing to `writer`.
    pub fn builder(writer: impl Write + Send + 'static) -> LoggerBuilder {
        LoggerBuilder::new(writer)
    }

    pub(crate) fn from_parts(
        writer: Box<dyn Write + Send>,
        layout: Box<dyn Layout>,
        trap: Box<dyn Trap>,
    ) -> Logger {
        Logger {
            writer: Mutex::new(writer),
            layout,
            trap,
        }
    }

    /// Write a message without any level tag.
    #[track_caller]
    pub fn print(&self, msg: impl fmt::Display) {
        self.output(Level::Info, format_args!("{msg}"), Location::caller());
    }

    /// Write a message tagged `[INFO]`.
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.output_tagged(Level::Info, args, Location::caller());
    }

    /// Write a message tagged `[WARN]`.
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.output_tagged(Level::Warn, args, Location::caller());
    }

    /// Write a message tagged `[ERROR]`.
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.output_tagged(Level::Error, args, Location::caller());
    }

    /// Write an info message as formatted, without a level tag.
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Info, args, Location::caller());
    }

    /// Write a warning message as formatted, without a level tag.
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Warn, args, Location::caller());
    }

    /// Write an error message as formatted, without a level tag.
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.output(Level::Error, args, Location::caller());
    }

    /// Flush the underlying writer.
    pub fn flush(&self) {
        if let Err(err) = self.writer().flush() {
            let err = Error::new("failed to flush log writer").with_source(err);
            self.trap.trap(&err);
        }
    }

    /// Set up this logger as the global logger of the `log` crate.
    ///
    /// # Errors
    ///
    /// Return an error if a global logger has already been set.
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }

    fn output_tagged(&self, level: Level, args: fmt::Arguments<'_>, location: &Location<'_>) {
        self.output(level, format_args!("[{level}] {args}"), location);
    }

    fn output(&self, level: Level, args: fmt::Arguments<'_>, location: &Location<'_>) {
        self.write_record(
            &Record::builder()
                .args(args)
                .level(level)
                .file(Some(location.file()))
                .line(Some(location.line()))
                .build(),
        );
    }

    pub(crate) fn write_record(&self, record: &Record) {
        let bytes = match self.layout.format(record) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.trap.trap(&err);
                return;
            }
        };

        if let Err(err) = self.writer().write_all(&bytes) {
            let err = Error::new("failed to write log line").with_source(err);
            self.trap.trap(&err);
        }
    }

    fn writer(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl log::Log for Logger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let level = record.level();
        self.write_record(
            &Record::builder()
                .args(format_args!("[{level}] {}", record.args()))
                .level(level)
                .target(record.target())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use jiff::tz::TimeZone;
    use log::Log;

    use super::*;
    use crate::layout::TextLayout;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Clone, Default)]
    struct CountingTrap(Arc<Mutex<Vec<String>>>);

    impl Trap for CountingTrap {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.to_string());
        }
    }

    fn logger(buffer: &SharedBuffer) -> Logger {
        Logger::builder(buffer.clone())
            .layout(TextLayout::default().timezone(TimeZone::UTC))
            .build()
    }

    fn strip_time(line: &str) -> &str {
        &line["2024/01/01 00:00:00 ".len()..]
    }

    #[test]
    fn test_tagged_calls_report_the_call_site() {
        let buffer = SharedBuffer::default();
        let logger = logger(&buffer);

        let line = line!() + 1;
        logger.info(format_args!("hello {}", "world"));
        logger.warn(format_args!("careful"));
        logger.error(format_args!("failed: {}", 42));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            strip_time(&lines[0]),
            format!("{}:{}: [INFO] hello world", file!(), line)
        );
        assert_eq!(
            strip_time(&lines[1]),
            format!("{}:{}: [WARN] careful", file!(), line + 1)
        );
        assert_eq!(
            strip_time(&lines[2]),
            format!("{}:{}: [ERROR] failed: 42", file!(), line + 2)
        );
    }

    #[test]
    fn test_untagged_calls() {
        let buffer = SharedBuffer::default();
        let logger = logger(&buffer);

        let line = line!() + 1;
        logger.print("raw");
        logger.infof(format_args!("{}-{}", "a", "b"));
        logger.errorf(format_args!("code={}", 7));
        logger.warnf(format_args!("plain"));

        let lines = buffer.lines();
        assert_eq!(strip_time(&lines[0]), format!("{}:{}: raw", file!(), line));
        assert_eq!(strip_time(&lines[1]), format!("{}:{}: a-b", file!(), line + 1));
        assert_eq!(strip_time(&lines[2]), format!("{}:{}: code=7", file!(), line + 2));
        assert_eq!(strip_time(&lines[3]), format!("{}:{}: plain", file!(), line + 3));
    }

    #[test]
    fn test_macros_expand_to_tagged_calls() {
        let buffer = SharedBuffer::default();
        let logger = logger(&buffer);

        let line = line!() + 1;
        crate::info!(logger, "{} + {} = {}", 1, 2, 3);
        crate::warn!(logger, "low memory");
        crate::error!(&logger, "gone");

        let lines = buffer.lines();
        assert_eq!(strip_time(&lines[0]), format!("{}:{}: [INFO] 1 + 2 = 3", file!(), line));
        assert_eq!(strip_time(&lines[1]), format!("{}:{}: [WARN] low memory", file!(), line + 1));
        assert_eq!(strip_time(&lines[2]), format!("{}:{}: [ERROR] gone", file!(), line + 2));
    }

    #[test]
    fn test_log_facade_records() {
        let buffer = SharedBuffer::default();
        let logger = logger(&buffer);

        logger.log(
            &Record::builder()
                .args(format_args!("from the facade"))
                .level(Level::Debug)
                .file(Some("src/worker.rs"))
                .line(Some(7))
                .build(),
        );

        let lines = buffer.lines();
        assert_eq!(strip_time(&lines[0]), "src/worker.rs:7: [DEBUG] from the facade");
    }

    #[test]
    fn test_write_errors_go_to_the_trap() {
        let trap = CountingTrap::default();
        let logger = Logger::builder(BrokenWriter).trap(trap.clone()).build();

        logger.info(format_args!("lost"));
        logger.print("lost again");

        let errors = trap.0.lock().unwrap().clone();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("failed to write log line"));
        assert!(errors[0].contains("disk full"));
    }
}
