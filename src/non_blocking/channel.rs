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

use std::io;
use std::io::Write;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;

/// A writer that hands every buffer to a channel for another thread to consume.
///
/// Each write copies the buffer, so callers may reuse theirs as soon as the call returns. A write
/// only blocks while the channel is full. Once every receiver is gone, writes fail with
/// [`io::ErrorKind::BrokenPipe`].
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use logdot::non_blocking::ChannelWriter;
///
/// let (mut writer, receiver) = ChannelWriter::bounded(16);
/// writer.write_all(b"hello").unwrap();
/// assert_eq!(receiver.recv().unwrap(), b"hello");
/// ```
#[derive(Clone, Debug)]
pub struct ChannelWriter {
    sender: Sender<Vec<u8>>,
}

impl ChannelWriter {
    /// Create a writer that sends into the given channel.
    pub fn new(sender: Sender<Vec<u8>>) -> Self {
        Self { sender }
    }

    /// Create a writer over a new channel holding at most `cap` pending buffers.
    pub fn bounded(cap: usize) -> (Self, Receiver<Vec<u8>>) {
        let (sender, receiver) = bounded(cap);
        (Self::new(sender), receiver)
    }

    fn send(&self, buf: &[u8]) -> io::Result<()> {
        self.sender.send(buf.to_vec()).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "log channel is disconnected")
        })
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A [`ChannelWriter`] that also prints every buffer to standard output.
///
/// The stdout write happens synchronously before the buffer is enqueued, and its result is
/// ignored. Console output therefore never waits for the consumer.
#[derive(Clone, Debug)]
pub struct ConsoleChannelWriter {
    inner: ChannelWriter,
}

impl ConsoleChannelWriter {
    /// Create a console-mirroring writer that sends into the given channel.
    pub fn new(sender: Sender<Vec<u8>>) -> Self {
        Self {
            inner: ChannelWriter::new(sender),
        }
    }
}

impl From<ChannelWriter> for ConsoleChannelWriter {
    fn from(inner: ChannelWriter) -> Self {
        Self { inner }
    }
}

impl Write for ConsoleChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = io::stdout().write_all(buf);
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stdout().flush();
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_write_copies_the_buffer() {
        let (mut writer, receiver) = ChannelWriter::bounded(4);

        let mut buf = b"first".to_vec();
        assert_eq!(writer.write(&buf).unwrap(), 5);
        buf.copy_from_slice(b"XXXXX");
        assert_eq!(writer.write(&buf).unwrap(), 5);

        assert_eq!(receiver.recv().unwrap(), b"first");
        assert_eq!(receiver.recv().unwrap(), b"XXXXX");
    }

    #[test]
    fn test_entries_are_received_in_order() {
        let (mut writer, receiver) = ChannelWriter::bounded(100);
        for i in 0..100 {
            writer.write_all(format!("{i}\n").as_bytes()).unwrap();
        }
        drop(writer);

        let received = receiver.iter().collect::<Vec<_>>();
        assert_eq!(received.len(), 100);
        for (i, entry) in received.iter().enumerate() {
            assert_eq!(entry, format!("{i}\n").as_bytes());
        }
    }

    #[test]
    fn test_write_blocks_while_channel_is_full() {
        let (mut writer, receiver) = ChannelWriter::bounded(1);
        writer.write_all(b"fills the queue").unwrap();

        let mut blocked = writer.clone();
        let handle = thread::spawn(move || blocked.write(b"waits"));

        thread::sleep(Duration::from_millis(100));
        assert!(!handle.is_finished());

        assert_eq!(receiver.recv().unwrap(), b"fills the queue");
        assert_eq!(handle.join().unwrap().unwrap(), 5);
        assert_eq!(receiver.recv().unwrap(), b"waits");
    }

    #[test]
    fn test_write_fails_once_disconnected() {
        let (mut writer, receiver) = ChannelWriter::bounded(1);
        drop(receiver);

        let err = writer.write(b"lost").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_console_writer_still_enqueues() {
        let (writer, receiver) = ChannelWriter::bounded(1);
        let mut writer = ConsoleChannelWriter::from(writer);

        assert_eq!(writer.write(b"mirrored\n").unwrap(), 9);
        assert_eq!(receiver.recv().unwrap(), b"mirrored\n");
    }
}
