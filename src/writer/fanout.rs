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
use std::io;
use std::io::Write;

use crate::writer::Sink;

/// A writer that copies every buffer to an ordered list of sinks.
///
/// Sinks are written in insertion order. The first sink that fails stops the write: its error is
/// returned as is and the remaining sinks are not invoked. Sinks written before the failure keep
/// what they received.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use logdot::writer::FanOut;
/// use logdot::writer::Sink;
///
/// let memory: Sink = Box::new(Vec::<u8>::new());
/// let mut fanout = FanOut::with_console(vec![memory]);
/// fanout.write_all(b"to memory and stdout\n").unwrap();
/// ```
pub struct FanOut {
    sinks: Vec<Sink>,
}

impl fmt::Debug for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl FanOut {
    /// Create a fan-out writer over exactly the given sinks.
    pub fn new(sinks: impl IntoIterator<Item = Sink>) -> Self {
        Self {
            sinks: sinks.into_iter().collect(),
        }
    }

    /// Create a fan-out writer over the given sinks followed by standard output.
    pub fn with_console(sinks: impl IntoIterator<Item = Sink>) -> Self {
        let mut fanout = Self::new(sinks);
        fanout.push(io::stdout());
        fanout
    }

    /// Append a sink after the existing ones.
    pub fn push(&mut self, sink: impl Write + Send + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// The number of sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether there is no sink at all.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Write for FanOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in self.sinks.iter_mut() {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    #[derive(Clone, Default)]
    struct CountingSink {
        calls: Arc<AtomicUsize>,
        data: Arc<Mutex<Vec<u8>>>,
        fail: bool,
    }

    impl CountingSink {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn data(&self) -> Vec<u8> {
            self.data.lock().unwrap().clone()
        }
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "sink failed"));
            }
            self.data.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_reaches_every_sink_in_order() {
        let sinks = vec![CountingSink::default(), CountingSink::default()];
        let mut fanout = FanOut::new(sinks.iter().cloned().map(|s| Box::new(s) as Sink));

        assert_eq!(fanout.write(b"hello").unwrap(), 5);
        assert_eq!(fanout.write(b" world").unwrap(), 6);
        fanout.flush().unwrap();

        for sink in &sinks {
            assert_eq!(sink.calls(), 2);
            assert_eq!(sink.data(), b"hello world");
        }
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let first = CountingSink::default();
        let second = CountingSink::failing();
        let third = CountingSink::default();
        let mut fanout = FanOut::new([
            Box::new(first.clone()) as Sink,
            Box::new(second.clone()),
            Box::new(third.clone()),
        ]);

        let err = fanout.write(b"payload").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(err.to_string(), "sink failed");

        assert_eq!(first.calls(), 1);
        assert_eq!(first.data(), b"payload");
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);
    }

    #[test]
    fn test_with_console_appends_stdout_last() {
        let fanout = FanOut::with_console([Box::new(CountingSink::default()) as Sink]);
        assert_eq!(fanout.len(), 2);

        let fanout = FanOut::with_console(Vec::new());
        assert_eq!(fanout.len(), 1);
        assert!(!fanout.is_empty());
    }

    #[test]
    fn test_empty_fanout_accepts_writes() {
        let mut fanout = FanOut::new(Vec::new());
        assert!(fanout.is_empty());
        assert_eq!(fanout.write(b"dropped").unwrap(), 7);
    }
}
