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

use std::cmp::Ordering;

use chrono::{Months, NaiveDate};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{BRACKET_SIZE, error::Error, participant::Participant};

/// The first round slot of each rank, best rank first.
///
/// Rank `r` meets rank `9 - r` in the first round, ranks 1 and 2 can only
/// meet in the final, ranks 3 and 4 only from the semifinal on.
pub const SEED_SLOTS: [i32; BRACKET_SIZE] = [0, 7, 2, 5, 4, 3, 6, 1];

/// How far back other tournaments count towards the seeding points.
const HISTORY_MONTHS: u32 = 12;

/// One result of a horse in another tournament.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PastResult {
    pub end_date: NaiveDate,
    pub round_reached: i32,
}

/// Points earned by reaching `round_reached` in a past tournament.
#[must_use]
pub fn points_for_round(round_reached: i32) -> u32 {
    match round_reached {
        2 => 1,
        3 => 3,
        4 => 5,
        _ => 0,
    }
}

/// Sums the points of every result from a tournament that ended in the
/// twelve months before `start_date`.
#[must_use]
pub fn history_points(start_date: NaiveDate, history: &[PastResult]) -> u32 {
    let since = start_date
        .checked_sub_months(Months::new(HISTORY_MONTHS))
        .unwrap_or(NaiveDate::MIN);

    history
        .iter()
        .filter(|result| result.end_date >= since && result.end_date < start_date)
        .map(|result| points_for_round(result.round_reached))
        .sum()
}

fn rank_order(a: &Participant, b: &Participant) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Assigns every participant its first round slot from its `points`.
///
/// Participants are ranked by points, best first, with ties going to the
/// name that sorts first. The result is ordered by `entry_number`; nothing
/// but `entry_number` changes.
///
/// # Errors
///
/// If there aren't exactly [`BRACKET_SIZE`] participants.
pub fn seed_first_round(participants: &[Participant]) -> Result<Vec<Participant>, Error> {
    trace!("seed_first_round: {participants:?}");

    if participants.len() != BRACKET_SIZE {
        return Err(Error::InvalidInput(format!(
            "seeding needs {BRACKET_SIZE} participants, got {}",
            participants.len()
        )));
    }

    let mut ranked: Vec<&Participant> = participants.iter().collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    let mut seeded: Vec<Participant> = ranked
        .into_iter()
        .zip(SEED_SLOTS)
        .map(|(participant, slot)| Participant {
            entry_number: slot,
            ..participant.clone()
        })
        .collect();

    seeded.sort_unstable_by_key(|participant| participant.entry_number);

    for participant in &seeded {
        debug!(
            "seeded {} with {} points into slot {}",
            participant.name, participant.points, participant.entry_number
        );
    }

    Ok(seeded)
}
