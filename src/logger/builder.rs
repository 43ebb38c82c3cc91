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

use crate::Layout;
use crate::Logger;
use crate::Trap;
use crate::layout::TextLayout;
use crate::trap::DefaultTrap;

/// A builder for configuring a [`Logger`].
///
/// # Examples
///
/// ```
/// use logdot::Logger;
/// use logdot::layout::TextLayout;
///
/// let logger = Logger::builder(std::io::stdout())
///     .layout(TextLayout::default().timezone(jiff::tz::TimeZone::UTC))
///     .build();
/// logger.print("hello");
/// ```
#[must_use = "call `build` to construct the logger"]
pub struct LoggerBuilder {
    writer: Box<dyn Write + Send>,
    layout: Box<dyn Layout>,
    trap: Box<dyn Trap>,
}

impl LoggerBuilder {
    pub(crate) fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            layout: Box::new(TextLayout::default()),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the layout lines are formatted with.
    ///
    /// Default to [`TextLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the trap write errors are reported to.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the [`Logger`].
    pub fn build(self) -> Logger {
        let LoggerBuilder {
            writer,
            layout,
            trap,
        } = self;
        Logger::from_parts(writer, layout, trap)
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("layout", &self.layout)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}
