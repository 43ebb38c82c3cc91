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

//! Byte writers that log lines are routed through.
//!
//! All writers here implement [`std::io::Write`], so they compose freely: a [`FanOut`] may hold
//! a [`DailyWriter`], standard output and any channel writer from
//! [`non_blocking`](crate::non_blocking) at the same time.

use std::io::Write;

mod daily;
mod fanout;
mod pattern;

pub use self::daily::DailyWriter;
pub use self::daily::DailyWriterBuilder;
pub use self::fanout::FanOut;
pub use self::pattern::PathPattern;

pub(crate) use self::daily::open_log_file;

/// A destination that accepts byte buffers.
pub type Sink = Box<dyn Write + Send + 'static>;
