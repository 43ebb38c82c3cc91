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

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::Select;

use crate::Error;
use crate::Trap;
use crate::clock::Clock;
use crate::non_blocking::Health;
use crate::writer::PathPattern;
use crate::writer::open_log_file;

pub(crate) struct Worker {
    receiver: Receiver<Vec<u8>>,
    shutdown: Receiver<()>,
    target: Target,
    health: Arc<Health>,
}

#[derive(Debug)]
enum WorkerState {
    Disconnected,
    Shutdown,
    Failed(Error),
}

/// The file the worker appends to, switched whenever the resolved path changes.
struct Target {
    pattern: PathPattern,
    clock: Clock,
    trap: Box<dyn Trap>,
    path: Option<PathBuf>,
    file: Option<File>,
}

impl Target {
    /// Returns an error only if the file cannot be opened, which stops the worker.
    fn append(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let path = self.pattern.resolve(&self.clock.now())?;
        if self.path.as_ref() != Some(&path) {
            self.close();
            self.path = Some(path.clone());
        }

        let file = match self.file.take() {
            Some(file) => file,
            None => open_log_file(&path).map_err(|err| {
                Error::new("failed to open log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })?,
        };
        let file = self.file.insert(file);

        if let Err(err) = file.write_all(bytes) {
            let err = Error::new("failed to write log file")
                .with_context("path", path.display())
                .with_source(err);
            self.trap.trap(&err);
        }
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush() {
                let err = Error::new("failed to flush log file").with_source(err);
                self.trap.trap(&err);
            }
        }
    }
}

impl Worker {
    pub(crate) fn new(
        pattern: PathPattern,
        receiver: Receiver<Vec<u8>>,
        shutdown: Receiver<()>,
        clock: Clock,
        trap: Box<dyn Trap>,
        health: Arc<Health>,
    ) -> Worker {
        let target = Target {
            pattern,
            clock,
            trap,
            path: None,
            file: None,
        };
        Self {
            receiver,
            shutdown,
            target,
            health,
        }
    }

    fn work(&mut self) -> WorkerState {
        let mut select = Select::new();
        let records = select.recv(&self.receiver);
        select.recv(&self.shutdown);

        loop {
            let oper = select.select();
            if oper.index() == records {
                match oper.recv(&self.receiver) {
                    Ok(bytes) => {
                        if let Err(err) = self.target.append(&bytes) {
                            return WorkerState::Failed(err);
                        }
                    }
                    Err(_) => return WorkerState::Disconnected,
                }
            } else {
                let _ = oper.recv(&self.shutdown);
                while let Ok(bytes) = self.receiver.try_recv() {
                    if let Err(err) = self.target.append(&bytes) {
                        return WorkerState::Failed(err);
                    }
                }
                return WorkerState::Shutdown;
            }
        }
    }

    fn run(mut self) {
        let state = self.work();

        let Worker {
            receiver,
            shutdown,
            mut target,
            health,
        } = self;

        // senders observe the disconnection from here on, instead of filling the queue
        drop(receiver);
        target.close();

        match state {
            WorkerState::Failed(err) => {
                target.trap.trap(&err);
                health.fail(&err);
            }
            WorkerState::Shutdown => {
                health.stop();
                // rendezvous with the guard waiting for the flush
                let _ = shutdown.recv();
            }
            WorkerState::Disconnected => health.stop(),
        }
    }

    pub(crate) fn make_thread(self, name: String) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name(name)
            .spawn(move || self.run())
    }
}
