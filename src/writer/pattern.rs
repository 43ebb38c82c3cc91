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
use std::path::PathBuf;

use jiff::Zoned;

use crate::Error;

/// A log file path made of a fixed prefix and a time-formatted suffix.
///
/// The suffix is a `strftime` pattern (for example `%Y-%m-%d.log`). A path is resolved by
/// appending the formatted suffix to the prefix verbatim, so `("logs/", "%Y-%m-%d.log")` and
/// `("logs/app-", "%Y%m%d.log")` both work.
///
/// # Examples
///
/// ```
/// use logdot::writer::PathPattern;
///
/// let pattern = PathPattern::new("logs/", "%Y-%m-%d.log");
/// let now: jiff::Zoned = "2024-01-01T08:00:00[UTC]".parse().unwrap();
/// assert_eq!(pattern.resolve(&now).unwrap(), std::path::Path::new("logs/2024-01-01.log"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    fixed: String,
    variable: String,
}

impl PathPattern {
    /// Create a pattern from its fixed and variable parts.
    pub fn new(fixed: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
            variable: variable.into(),
        }
    }

    /// The fixed prefix.
    pub fn fixed(&self) -> &str {
        &self.fixed
    }

    /// The time-format suffix.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Resolve the concrete path for the given time.
    ///
    /// # Errors
    ///
    /// Return an error if the variable part is not a valid `strftime` pattern.
    pub fn resolve(&self, now: &Zoned) -> Result<PathBuf, Error> {
        let suffix = jiff::fmt::strtime::format(&self.variable, now).map_err(|err| {
            Error::new("failed to format log path")
                .with_context("pattern", &self.variable)
                .with_source(err)
        })?;
        Ok(PathBuf::from(format!("{}{suffix}", self.fixed)))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.fixed, self.variable)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_resolve_concatenates_prefix_and_suffix() {
        let now = Zoned::from_str("2024-08-10T17:12:52+08[+08]").unwrap();

        let pattern = PathPattern::new("logs/", "%Y-%m-%d.log");
        assert_eq!(
            pattern.resolve(&now).unwrap(),
            Path::new("logs/2024-08-10.log")
        );

        let pattern = PathPattern::new("logs/access-", "%Y%m%d%H.log");
        assert_eq!(
            pattern.resolve(&now).unwrap(),
            Path::new("logs/access-2024081017.log")
        );
    }

    #[test]
    fn test_resolve_is_stable_within_a_day() {
        let pattern = PathPattern::new("logs/", "%Y-%m-%d.log");
        let morning = Zoned::from_str("2024-01-01T00:00:01[UTC]").unwrap();
        let night = Zoned::from_str("2024-01-01T23:59:59[UTC]").unwrap();
        let next = Zoned::from_str("2024-01-02T00:00:00[UTC]").unwrap();

        assert_eq!(pattern.resolve(&morning).unwrap(), pattern.resolve(&night).unwrap());
        assert_ne!(pattern.resolve(&night).unwrap(), pattern.resolve(&next).unwrap());
    }

    #[test]
    fn test_resolve_without_directives() {
        let now = Zoned::from_str("2024-01-01T00:00:00[UTC]").unwrap();
        let pattern = PathPattern::new("logs/", "app.log");
        assert_eq!(pattern.resolve(&now).unwrap(), Path::new("logs/app.log"));
    }

    #[test]
    fn test_resolve_rejects_invalid_pattern() {
        let now = Zoned::from_str("2024-01-01T00:00:00[UTC]").unwrap();
        let pattern = PathPattern::new("logs/", "app.log%");
        let err = pattern.resolve(&now).unwrap_err();
        assert!(err.to_string().contains("failed to format log path"));
    }
}
