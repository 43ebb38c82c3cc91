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

use std::fmt::Write;

use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Record;

use crate::Error;
use crate::layout::Layout;

/// A layout that prefixes the message with a timestamp and the caller's location.
///
/// Output format:
///
/// ```text
/// 2024/08/11 22:44:57 src/main.rs:51: [ERROR] Hello error!
/// 2024/08/11 22:44:57 src/main.rs:52: [WARN] Hello warn!
/// 2024/08/11 22:44:57 src/main.rs:53: Hello raw!
/// ```
///
/// A line terminator is appended unless the message already ends with one.
///
/// The system time zone is used unless another one is set with [`TextLayout::timezone`].
///
/// # Examples
///
/// ```
/// use logdot::layout::TextLayout;
///
/// let layout = TextLayout::default().timezone(jiff::tz::TimeZone::UTC);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    tz: Option<TimeZone>,
}

impl TextLayout {
    /// Set the time zone of the timestamp.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    fn now(&self) -> Zoned {
        match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        }
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let time = self.now().strftime("%Y/%m/%d %H:%M:%S");
        let file = record.file().unwrap_or("???");
        let line = record.line().unwrap_or_default();

        let mut text = String::new();
        write!(&mut text, "{time} {file}:{line}: {}", record.args())
            .map_err(|err| Error::new("failed to format log record").with_source(err))?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    #[test]
    fn test_format_prefixes_time_and_location() {
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let bytes = layout
            .format(
                &Record::builder()
                    .args(format_args!("[INFO] hello"))
                    .level(Level::Info)
                    .file(Some("src/app.rs"))
                    .line(Some(42))
                    .build(),
            )
            .unwrap();

        let line = String::from_utf8(bytes).unwrap();
        let (time, rest) = line.split_at("2024/01/01 00:00:00".len());
        assert_eq!(rest, " src/app.rs:42: [INFO] hello\n");
        assert_eq!(time.as_bytes()[4], b'/');
        assert_eq!(time.as_bytes()[13], b':');
    }

    #[test]
    fn test_format_keeps_a_single_line_terminator() {
        let layout = TextLayout::default();
        let bytes = layout
            .format(
                &Record::builder()
                    .args(format_args!("already terminated\n"))
                    .file(Some("src/app.rs"))
                    .line(Some(1))
                    .build(),
            )
            .unwrap();

        let line = String::from_utf8(bytes).unwrap();
        assert!(line.ends_with(" src/app.rs:1: already terminated\n"));
        assert_eq!(line.matches('\n').count(), 1);
    }
}
