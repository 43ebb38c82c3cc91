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

//! Writers that decouple callers from file I/O through a bounded channel.
//!
//! [`ChannelWriter`] and [`ConsoleChannelWriter`] only enqueue. [`FileChannel`] pairs such a
//! channel with a worker thread that appends the entries to files named after the current time.

use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::Error;

mod channel;
mod file_channel;
mod worker;

pub use self::channel::ChannelWriter;
pub use self::channel::ConsoleChannelWriter;
pub use self::file_channel::FileChannel;
pub use self::file_channel::FileChannelBuilder;
pub use self::file_channel::WorkerGuard;

/// Liveness of a worker thread, shared with the handles that feed it.
#[derive(Debug)]
pub(crate) struct Health {
    alive: AtomicBool,
    failure: Mutex<Option<String>>,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            alive: AtomicBool::new(true),
            failure: Mutex::new(None),
        }
    }
}

impl Health {
    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub(crate) fn failure(&self) -> Option<String> {
        self.failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub(crate) fn stop(&self) {
        self.alive.store(false, Ordering::Release);
    }

    pub(crate) fn fail(&self, err: &Error) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(err.to_string());
        self.stop();
    }
}
