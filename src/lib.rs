//! Seeding, standings trees and result validation for eight horse knockout
//! tournaments.
//!
//! ## Rounds
//!
//! Every participant carries the round it reached: 0 before it played, 1
//! when it lost in the first round, 2 when it lost in the semifinal, 3 when
//! it lost the final and 4 when it won the tournament.
//!
//! * [`seeding`] places the participants into the first round.
//! * [`standings`] rebuilds the bracket from the stored rounds.
//! * [`validate`] checks new rounds before they are stored.

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

#![deny(clippy::panic)]

pub mod error;
pub mod participant;
pub mod seeding;
pub mod service;
pub mod standings;
pub mod store;
pub mod tournament;
pub mod utils;
pub mod validate;

pub use error::{Error, ValidationError};

pub type Id = u64;
pub const HOME: &str = "horse-tournament";

/// Participants in every tournament.
pub const BRACKET_SIZE: usize = 8;

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2025-2026 David Lawrence Campbell

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2025 David Lawrence Campbell
Licensed under the AGPLv3"
);
