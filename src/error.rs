// This file is part of horse-tournament.
//
// horse-tournament is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// horse-tournament is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The engine was called outside its contract, e.g. with the wrong number
    /// of participants.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Stored bracket data breaks an invariant and can't be shown.
    #[error("structural error: {0}")]
    Structural(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Ron(#[from] ron::Error),
    #[error(transparent)]
    RonSpanned(#[from] ron::error::SpannedError),
}

/// Every problem found in one piece of user supplied data.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct ValidationError {
    pub summary: String,
    pub errors: Vec<String>,
}

impl ValidationError {
    /// Returns `Ok` when `errors` is empty.
    ///
    /// # Errors
    ///
    /// If there is at least one error.
    pub fn check(summary: &str, errors: Vec<String>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self {
                summary: summary.to_string(),
                errors,
            })
        }
    }

    /// The summary followed by one line per error.
    #[must_use]
    pub fn itemized(&self) -> String {
        let mut string = format!("{}:", self.summary);
        for error in &self.errors {
            string.push_str("\n  - ");
            string.push_str(error);
        }

        string
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.errors.join(", "))
    }
}
