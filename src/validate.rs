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

use chrono::{Datelike, NaiveDate};
use log::trace;
use rustc_hash::FxHashSet;

use crate::{
    BRACKET_SIZE, error::ValidationError, participant::Participant, tournament::TournamentCreate,
};

/// Rounds 0 to 4.
const ROUNDS: usize = 5;
const MAX_NAME_LEN: usize = 255;
const MIN_AGE: i32 = 3;
const MAX_AGE: i32 = 25;

pub const UPDATE_FAILED: &str = "Validation of participants for update failed";

/// 1 January 1894, no tournament or horse is older.
fn first_valid_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1894, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// The most participants that can have reached each round, indexed by round.
///
/// Every round at most halves the field, but the bounds are checked
/// independently of each other.
fn round_limits() -> [usize; ROUNDS] {
    let mut limits = [BRACKET_SIZE; ROUNDS];
    for round in 2..ROUNDS {
        limits[round] = limits[round - 1] / 2;
    }

    limits
}

/// Checks new `round_reached` values describe a possible knockout bracket.
///
/// # Errors
///
/// With every out of range round and every round reached by too many
/// participants.
pub fn validate_advancement(participants: &[Participant]) -> Result<(), ValidationError> {
    trace!("validate_advancement: {participants:?}");

    let limits = round_limits();
    let mut counts = [0; ROUNDS];
    let mut errors = Vec::new();

    for participant in participants {
        match usize::try_from(participant.round_reached)
            .ok()
            .and_then(|round| counts.get_mut(round))
        {
            Some(count) => *count += 1,
            None => errors.push(format!(
                "roundReached: {} for participant with id: {} is not valid",
                participant.round_reached, participant.id
            )),
        }
    }

    for (round, (count, limit)) in counts.iter().zip(limits).enumerate().rev() {
        if *count > limit {
            errors.push(format!(
                "invalid number of horses, which stay for round {round}"
            ));
        }
    }

    ValidationError::check(UPDATE_FAILED, errors)
}

/// Checks a tournament and its horses before it is stored.
///
/// # Errors
///
/// With every problem found.
pub fn validate_for_insert(tournament: &TournamentCreate) -> Result<(), ValidationError> {
    trace!("validate_for_insert: {tournament:?}");

    let mut errors = Vec::new();
    let first_valid_date = first_valid_date();

    if tournament.name.trim().is_empty() {
        errors.push("name must not be empty".to_string());
    }
    if tournament.name.chars().count() > MAX_NAME_LEN {
        errors.push("name is too long".to_string());
    }
    if tournament.start_date > tournament.end_date {
        errors.push("end date is before start date".to_string());
    }
    if tournament.start_date < first_valid_date {
        errors.push("start date comes before first valid date 1 January 1894".to_string());
    }
    if tournament.participants.len() != BRACKET_SIZE {
        errors.push(format!("tournament must have {BRACKET_SIZE} participants"));
    }

    let mut horses = FxHashSet::default();
    for horse in &tournament.participants {
        if !horses.insert(horse.id) {
            errors.push(format!("horse {} takes part more than once", horse.id));
        }

        if horse.date_of_birth < first_valid_date {
            errors.push(format!(
                "date of birth of {} comes before first valid date 1 January 1894",
                horse.name
            ));
        }

        match age_at(horse.date_of_birth, tournament.start_date) {
            age if age > MAX_AGE => errors.push(format!(
                "horse with date of birth: {} is too old for the tournament with start: {}",
                horse.date_of_birth, tournament.start_date
            )),
            age if age < MIN_AGE => errors.push(format!(
                "horse with date of birth: {} is too young for the tournament with start: {}. \
                 It must be at least {MIN_AGE} years old",
                horse.date_of_birth, tournament.start_date
            )),
            _ => {}
        }
    }

    ValidationError::check("Validation of tournament for insert failed", errors)
}

/// Full years between `born` and `on`.
fn age_at(born: NaiveDate, on: NaiveDate) -> i32 {
    let years = on.year() - born.year();
    if (on.month(), on.day()) < (born.month(), born.day()) {
        years - 1
    } else {
        years
    }
}
