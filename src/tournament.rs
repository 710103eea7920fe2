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

use crate::{
    Id,
    error::Error,
    participant::{HorseSelection, Participant},
    standings::{StandingsNode, View, build_standings},
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: Id,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Tournament {
    /// Whether this is the same event as `create`.
    #[must_use]
    pub fn same_event(&self, create: &TournamentCreate) -> bool {
        self.name == create.name
            && self.start_date == create.start_date
            && self.end_date == create.end_date
    }

    /// # Errors
    ///
    /// If the stored bracket is broken, see
    /// [`build_standings`](crate::standings::build_standings).
    pub fn standings(&self, view: View) -> Result<TournamentStandings, Error> {
        let bracket = build_standings(&self.participants, view)?;

        Ok(TournamentStandings {
            id: self.id,
            name: self.name.clone(),
            participants: bracket.participants,
            tree: bracket.tree,
        })
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.id, self.start_date, self.end_date, self.name
        )
    }
}

/// A new tournament as entered by a user.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentCreate {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub participants: Vec<HorseSelection>,
}

/// Each field that is set narrows the search.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSearch {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TournamentSearch {
    /// Matches names case insensitively and dates by overlap with
    /// `start_date..=end_date`.
    #[must_use]
    pub fn matches(&self, tournament: &Tournament) -> bool {
        if let Some(name) = &self.name
            && !tournament
                .name
                .to_lowercase()
                .contains(&name.to_lowercase())
        {
            return false;
        }

        if let Some(start_date) = self.start_date
            && start_date > tournament.end_date
        {
            return false;
        }

        if let Some(end_date) = self.end_date
            && end_date < tournament.start_date
        {
            return false;
        }

        true
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TournamentStandings {
    pub id: Id,
    pub name: String,
    pub participants: Vec<Participant>,
    pub tree: StandingsNode,
}
