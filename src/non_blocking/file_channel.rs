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
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;

use crate::Error;
use crate::Trap;
use crate::clock::Clock;
use crate::non_blocking::ChannelWriter;
use crate::non_blocking::ConsoleChannelWriter;
use crate::non_blocking::Health;
use crate::non_blocking::worker::Worker;
use crate::trap::DefaultTrap;
use crate::writer::PathPattern;

const DEFAULT_BUFFERED_LINES_LIMIT: usize = 1000;
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

/// A guard that drains and flushes a [`FileChannel`] worker on drop.
///
/// Writing to a [`FileChannel`] does **not** write to the file immediately. Instead, a dedicated
/// thread picks up the entries at some later point. Dropping the guard asks that thread to write
/// out everything still queued, flush and exit, waiting at most the configured shutdown timeout
/// for each step.
///
/// The guard should be held for as long as the channel is used, typically in `main`. Once it is
/// dropped, further writes to the channel fail.
#[derive(Debug)]
pub struct WorkerGuard {
    _handle: JoinHandle<()>,
    shutdown: Sender<()>,
    shutdown_timeout: Duration,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let shutdown_timeout = self.shutdown_timeout;
        match self.shutdown.send_timeout((), shutdown_timeout) {
            Ok(()) => {
                // The worker receives once more after draining and flushing, so this returns
                // when the queue is written out or the timeout elapses.
                let _ = self.shutdown.send_timeout((), shutdown_timeout);
            }
            Err(SendTimeoutError::Disconnected(_)) => (),
            Err(SendTimeoutError::Timeout(err)) => {
                eprintln!("failed to send shutdown signal to file channel worker: {err:?}")
            }
        }
    }
}

/// A bounded channel whose entries a background thread appends to time-named files.
///
/// The file name is `dir` followed by the current time formatted with `format`, resolved again
/// for every entry. When it changes, the previous file is closed and the new one is opened
/// lazily with the next entry.
///
/// If a file cannot be opened, the worker reports the error to its [`Trap`] and stops for good.
/// [`FileChannel::is_alive`] and [`FileChannel::failure`] expose that state, and writers fail with
/// [`std::io::ErrorKind::BrokenPipe`] rather than blocking on a queue nobody drains.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use logdot::non_blocking::FileChannel;
///
/// let dir = tempfile::tempdir().unwrap();
/// let fixed = format!("{}/", dir.path().display());
/// let (channel, guard) = FileChannel::builder(fixed, "%Y-%m-%d.log").build().unwrap();
///
/// let mut writer = channel.writer();
/// writer.write_all(b"written by the worker thread\n").unwrap();
/// drop(guard);
/// ```
#[derive(Clone, Debug)]
pub struct FileChannel {
    sender: Sender<Vec<u8>>,
    pattern: PathPattern,
    health: Arc<Health>,
}

impl FileChannel {
    /// Create a new [`FileChannelBuilder`].
    #[must_use]
    pub fn builder(dir: impl Into<String>, format: impl Into<String>) -> FileChannelBuilder {
        FileChannelBuilder::new(dir, format)
    }

    /// A writer that enqueues into this channel.
    pub fn writer(&self) -> ChannelWriter {
        ChannelWriter::new(self.sender.clone())
    }

    /// A writer that prints to standard output and enqueues into this channel.
    pub fn console_writer(&self) -> ConsoleChannelWriter {
        ConsoleChannelWriter::new(self.sender.clone())
    }

    /// The pattern file names are resolved from.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Whether the worker thread is still consuming entries.
    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// The error that stopped the worker, if it stopped on a failure.
    pub fn failure(&self) -> Option<String> {
        self.health.failure()
    }
}

/// A builder for configuring [`FileChannel`].
#[derive(Debug)]
pub struct FileChannelBuilder {
    dir: String,
    format: String,
    thread_name: String,
    buffered_lines_limit: usize,
    shutdown_timeout: Duration,
    trap: Box<dyn Trap>,
    clock: Clock,
}

impl FileChannelBuilder {
    /// Create a new [`FileChannelBuilder`].
    #[must_use]
    pub fn new(dir: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            format: format.into(),
            thread_name: "logdot-file-channel".to_string(),
            buffered_lines_limit: DEFAULT_BUFFERED_LINES_LIMIT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            trap: Box::new(DefaultTrap::default()),
            clock: Clock::DefaultClock,
        }
    }

    /// Set the number of pending entries before writers block.
    ///
    /// Default to 1000.
    #[must_use]
    pub fn buffered_lines_limit(mut self, n: usize) -> Self {
        self.buffered_lines_limit = n;
        self
    }

    /// Set the timeout the [`WorkerGuard`] waits on drop.
    ///
    /// Default to 100 milliseconds.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Override the worker thread's name.
    ///
    /// Default to `logdot-file-channel`.
    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the trap the worker reports errors to.
    ///
    /// Default to [`DefaultTrap`].
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Create the log directory and start the worker thread.
    ///
    /// # Errors
    ///
    /// Return an error if the directory cannot be created, the format is invalid or the thread
    /// cannot be spawned.
    pub fn build(self) -> Result<(FileChannel, WorkerGuard), Error> {
        let FileChannelBuilder {
            dir,
            format,
            thread_name,
            buffered_lines_limit,
            shutdown_timeout,
            trap,
            clock,
        } = self;

        fs::create_dir_all(&dir).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("dir", &dir)
                .with_source(err)
        })?;

        let pattern = PathPattern::new(dir, format);
        pattern.resolve(&clock.now())?;

        let (sender, receiver) = bounded(buffered_lines_limit);
        let (shutdown_sender, shutdown_receiver) = bounded(0);
        let health = Arc::new(Health::default());

        let worker = Worker::new(
            pattern.clone(),
            receiver,
            shutdown_receiver,
            clock,
            trap,
            health.clone(),
        );
        let handle = worker.make_thread(thread_name).map_err(|err| {
            Error::new("failed to spawn file channel worker").with_source(err)
        })?;

        let channel = FileChannel {
            sender,
            pattern,
            health,
        };
        let guard = WorkerGuard {
            _handle: handle,
            shutdown: shutdown_sender,
            shutdown_timeout,
        };
        Ok((channel, guard))
    }
}
