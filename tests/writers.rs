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
use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use log::Record;
use logdot::Error;
use logdot::Layout;
use logdot::Logger;
use logdot::Trap;
use logdot::non_blocking::ChannelWriter;
use logdot::writer::DailyWriter;
use logdot::writer::FanOut;
use logdot::writer::Sink;
use rand::Rng;
use rand::distr::Alphanumeric;

#[derive(Debug)]
struct BareLayout;

impl Layout for BareLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        Ok(format!("{}\n", record.args()).into_bytes())
    }
}

#[derive(Debug, Clone, Default)]
struct CollectingTrap(Arc<Mutex<Vec<String>>>);

impl Trap for CollectingTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

#[derive(Debug)]
struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn random_lines(n: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            let len = rng.random_range(1..64);
            std::iter::repeat(())
                .map(|()| rng.sample(Alphanumeric))
                .map(char::from)
                .take(len)
                .collect()
        })
        .collect()
}

#[test]
fn test_fan_out_to_file_and_channel() {
    let dir = tempfile::tempdir().unwrap();
    let fixed = format!("{}/", dir.path().display());
    let daily: Sink = Box::new(DailyWriter::new(fixed, "app.log").unwrap());

    let (channel, receiver) = ChannelWriter::bounded(16);
    let consumer = thread::spawn(move || receiver.iter().collect::<Vec<_>>());

    let channel: Sink = Box::new(channel);
    let logger = Logger::builder(FanOut::new([daily, channel]))
        .layout(BareLayout)
        .build();

    let lines = random_lines(100);
    for line in &lines {
        logger.print(line);
    }
    logger.flush();
    drop(logger);

    let queued = consumer.join().unwrap();
    assert_eq!(queued.len(), lines.len());
    for (entry, line) in queued.iter().zip(&lines) {
        assert_eq!(entry, format!("{line}\n").as_bytes());
    }

    let written = fs::read_to_string(dir.path().join("app.log")).unwrap();
    assert_eq!(written.lines().collect::<Vec<_>>(), lines);
}

#[test]
fn test_failing_destination_stops_fan_out_and_reaches_trap() {
    let (channel, receiver) = ChannelWriter::bounded(4);
    let broken: Sink = Box::new(FullDisk);
    let channel: Sink = Box::new(channel);

    let trap = CollectingTrap::default();
    let logger = Logger::builder(FanOut::new([broken, channel]))
        .layout(BareLayout)
        .trap(trap.clone())
        .build();

    logger.print("never delivered");

    assert!(receiver.try_recv().is_err());
    let trapped = trap.0.lock().unwrap();
    assert_eq!(trapped.len(), 1);
    assert!(trapped[0].contains("disk full"));
}
