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

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Id;

/// The `entry_number` of a participant that has not been seeded.
pub const UNSEEDED: i32 = -1;

/// A horse as supplied by the horse registry when a tournament is created.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseSelection {
    pub id: Id,
    pub name: String,
    pub date_of_birth: NaiveDate,
}

/// A horse's entry in one tournament.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Id,
    pub horse_id: Id,
    pub name: String,
    pub date_of_birth: NaiveDate,
    /// Slot in the first round, [`UNSEEDED`] until seeded.
    pub entry_number: i32,
    /// 0 not played, 1 lost in the first round, 2 lost in the semifinal,
    /// 3 lost in the final, 4 won.
    pub round_reached: i32,
    /// Only used while seeding.
    #[serde(skip)]
    pub points: u32,
}

impl Participant {
    #[must_use]
    pub fn new(id: Id, horse: &HorseSelection) -> Self {
        Self {
            id,
            horse_id: horse.id,
            name: horse.name.clone(),
            date_of_birth: horse.date_of_birth,
            entry_number: UNSEEDED,
            round_reached: 0,
            points: 0,
        }
    }

    /// The slot this participant was seeded into, if any.
    ///
    /// Negative entry numbers other than [`UNSEEDED`] also give `None`; the
    /// standings builder rejects those separately.
    #[must_use]
    pub fn slot(&self) -> Option<usize> {
        usize::try_from(self.entry_number).ok()
    }

    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.entry_number != UNSEEDED
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.id, self.name, self.entry_number, self.round_reached
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horse() -> HorseSelection {
        HorseSelection {
            id: 7,
            name: "Wendy".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
        }
    }

    #[test]
    fn new_participants_are_unseeded() {
        let participant = Participant::new(3, &horse());

        assert_eq!(participant.horse_id, 7);
        assert_eq!(participant.entry_number, UNSEEDED);
        assert_eq!(participant.round_reached, 0);
        assert!(!participant.is_seeded());
        assert_eq!(participant.slot(), None);
    }

    #[test]
    fn slot_follows_entry_number() {
        let mut participant = Participant::new(3, &horse());
        participant.entry_number = 5;

        assert!(participant.is_seeded());
        assert_eq!(participant.slot(), Some(5));
        assert_eq!(participant.to_string(), "3 Wendy 5 0");
    }

    #[test]
    fn points_are_not_serialized() {
        let mut participant = Participant::new(3, &horse());
        participant.points = 12;

        let string = ron::to_string(&participant).unwrap();
        assert!(!string.contains("points"));
        assert!(string.contains("entryNumber"));

        let participant: Participant = ron::from_str(&string).unwrap();
        assert_eq!(participant.points, 0);
    }
}
