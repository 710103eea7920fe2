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

use std::{collections::BTreeMap, fmt, fs, io::ErrorKind, path::Path};

use log::{debug, info, trace};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::{
    Id,
    error::Error,
    participant::Participant,
    seeding::PastResult,
    tournament::{Tournament, TournamentCreate, TournamentSearch},
};

/// Where tournaments and their participants are kept.
pub trait TournamentStore {
    /// Matching tournaments, latest start first, without participants.
    fn search(&self, search: &TournamentSearch) -> Vec<Tournament>;

    /// # Errors
    ///
    /// If there is no tournament `id`.
    fn tournament(&self, id: Id) -> Result<Tournament, Error>;

    /// Stores a tournament with unseeded participants for `create`'s horses.
    ///
    /// # Errors
    ///
    /// If the same tournament already exists.
    fn insert(&mut self, create: &TournamentCreate) -> Result<Tournament, Error>;

    /// Replaces `entry_number` and `round_reached` of the given participants
    /// of tournament `id`, all of them or none.
    ///
    /// # Errors
    ///
    /// If there is no tournament `id` or a participant isn't part of it.
    fn update_participants(
        &mut self,
        id: Id,
        participants: &[Participant],
    ) -> Result<Vec<Participant>, Error>;

    /// Results of `horse_id` in every tournament but `exclude`.
    fn history(&self, horse_id: Id, exclude: Id) -> Vec<PastResult>;
}

/// Tournaments kept in memory and saved as RON.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Tournaments {
    next_id: Id,
    next_participant_id: Id,
    tournaments: BTreeMap<Id, Tournament>,
}

impl Tournaments {
    /// Loads the tournaments saved at `path`, or none if there is no file yet.
    ///
    /// # Errors
    ///
    /// If the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        match fs::read_to_string(path) {
            Ok(string) => {
                let tournaments: Self = ron::from_str(&string)?;
                info!(
                    "loaded {} tournaments from {}",
                    tournaments.tournaments.len(),
                    path.display()
                );
                Ok(tournaments)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("{} doesn't exist yet, starting empty", path.display());
                Ok(Self::default())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// # Errors
    ///
    /// If serializing or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let string = ron::ser::to_string_pretty(self, PrettyConfig::default())?;
        fs::write(path, string)?;
        debug!("saved {} tournaments to {}", self.tournaments.len(), path.display());

        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }

    fn not_found(id: Id) -> Error {
        Error::NotFound(format!("no tournament with id {id}"))
    }
}

impl fmt::Display for Tournaments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tournaments: Vec<String> = self
            .tournaments
            .values()
            .map(ToString::to_string)
            .collect();

        write!(f, "{}", tournaments.join("\n"))
    }
}

impl TournamentStore for Tournaments {
    fn search(&self, search: &TournamentSearch) -> Vec<Tournament> {
        trace!("search: {search:?}");

        let mut found: Vec<Tournament> = self
            .tournaments
            .values()
            .filter(|tournament| search.matches(tournament))
            .map(|tournament| Tournament {
                participants: Vec::new(),
                ..tournament.clone()
            })
            .collect();

        found.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));
        found
    }

    fn tournament(&self, id: Id) -> Result<Tournament, Error> {
        self.tournaments
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    fn insert(&mut self, create: &TournamentCreate) -> Result<Tournament, Error> {
        trace!("insert: {create:?}");

        if self
            .tournaments
            .values()
            .any(|tournament| tournament.same_event(create))
        {
            return Err(Error::Conflict(format!(
                "the tournament {} from {} to {} already exists",
                create.name, create.start_date, create.end_date
            )));
        }

        self.next_id += 1;
        let id = self.next_id;

        let participants = create
            .participants
            .iter()
            .map(|horse| {
                self.next_participant_id += 1;
                Participant::new(self.next_participant_id, horse)
            })
            .collect();

        let tournament = Tournament {
            id,
            name: create.name.clone(),
            start_date: create.start_date,
            end_date: create.end_date,
            participants,
        };

        self.tournaments.insert(id, tournament.clone());
        Ok(tournament)
    }

    fn update_participants(
        &mut self,
        id: Id,
        participants: &[Participant],
    ) -> Result<Vec<Participant>, Error> {
        trace!("update_participants {id}: {participants:?}");

        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or_else(|| Self::not_found(id))?;

        let mut updated = tournament.participants.clone();
        for participant in participants {
            let stored = updated
                .iter_mut()
                .find(|stored| stored.id == participant.id)
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "could not update participant with id {}, it isn't part of tournament {id}",
                        participant.id
                    ))
                })?;

            stored.entry_number = participant.entry_number;
            stored.round_reached = participant.round_reached;
        }

        tournament.participants.clone_from(&updated);
        Ok(updated)
    }

    fn history(&self, horse_id: Id, exclude: Id) -> Vec<PastResult> {
        self.tournaments
            .values()
            .filter(|tournament| tournament.id != exclude)
            .flat_map(|tournament| {
                tournament
                    .participants
                    .iter()
                    .filter(move |participant| participant.horse_id == horse_id)
                    .map(move |participant| PastResult {
                        end_date: tournament.end_date,
                        round_reached: participant.round_reached,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use chrono::NaiveDate;

    use super::*;
    use crate::participant::{HorseSelection, UNSEEDED};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn create(name: &str, start_date: NaiveDate) -> TournamentCreate {
        TournamentCreate {
            name: name.to_string(),
            start_date,
            end_date: start_date,
            participants: (1..=8)
                .map(|id| HorseSelection {
                    id,
                    name: format!("Horse {id}"),
                    date_of_birth: date(2015, 1, 1),
                })
                .collect(),
        }
    }

    #[test]
    fn insert_creates_unseeded_participants() {
        let mut tournaments = Tournaments::default();
        let tournament = tournaments.insert(&create("Cup", date(2024, 1, 1))).unwrap();

        assert_eq!(tournament.id, 1);
        assert_eq!(tournament.participants.len(), 8);
        assert!(tournament.participants.iter().all(|p| p.entry_number == UNSEEDED));
        assert!(tournament.participants.iter().all(|p| p.round_reached == 0));

        let second = tournaments.insert(&create("Cup", date(2024, 2, 1))).unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(second.participants[0].id, 9);
    }

    #[test]
    fn the_same_tournament_conflicts() {
        let mut tournaments = Tournaments::default();
        tournaments.insert(&create("Cup", date(2024, 1, 1))).unwrap();

        assert!(matches!(
            tournaments.insert(&create("Cup", date(2024, 1, 1))),
            Err(Error::Conflict(_))
        ));
        assert_eq!(tournaments.len(), 1);
    }

    #[test]
    fn unknown_tournaments_are_not_found() {
        let mut tournaments = Tournaments::default();

        assert!(matches!(tournaments.tournament(3), Err(Error::NotFound(_))));
        assert!(matches!(
            tournaments.update_participants(3, &[]),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn updates_are_all_or_nothing() {
        let mut tournaments = Tournaments::default();
        let tournament = tournaments.insert(&create("Cup", date(2024, 1, 1))).unwrap();

        let mut changed = tournament.participants.clone();
        changed[0].round_reached = 2;
        changed[1].id = 99;

        assert!(matches!(
            tournaments.update_participants(tournament.id, &changed),
            Err(Error::NotFound(_))
        ));
        assert_eq!(tournaments.tournament(tournament.id).unwrap(), tournament);

        changed[1].id = tournament.participants[1].id;
        changed[1].entry_number = 4;
        let updated = tournaments.update_participants(tournament.id, &changed).unwrap();
        assert_eq!(updated, changed);
        assert_eq!(tournaments.tournament(tournament.id).unwrap().participants, changed);
    }

    #[test]
    fn search_orders_by_start_date() {
        let mut tournaments = Tournaments::default();
        tournaments.insert(&create("Winter Cup", date(2023, 12, 1))).unwrap();
        tournaments.insert(&create("Spring Cup", date(2024, 4, 1))).unwrap();
        tournaments.insert(&create("Spring Derby", date(2024, 5, 1))).unwrap();

        let found = tournaments.search(&TournamentSearch {
            name: Some("SPRING".to_string()),
            ..TournamentSearch::default()
        });
        let names: Vec<&str> = found.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["Spring Derby", "Spring Cup"]);
        assert!(found.iter().all(|t| t.participants.is_empty()));
    }

    #[test]
    fn history_skips_the_excluded_tournament() {
        let mut tournaments = Tournaments::default();
        let old = tournaments.insert(&create("Old", date(2023, 10, 1))).unwrap();
        let new = tournaments.insert(&create("New", date(2024, 3, 1))).unwrap();

        let mut results = old.participants.clone();
        results[0].round_reached = 4;
        tournaments.update_participants(old.id, &results).unwrap();

        let history = tournaments.history(1, new.id);
        assert_eq!(
            history,
            vec![PastResult {
                end_date: date(2023, 10, 1),
                round_reached: 4
            }]
        );
        assert_eq!(tournaments.history(1, old.id).len(), 1);
        assert!(tournaments.history(42, new.id).is_empty());
    }

    #[test]
    fn save_and_load() {
        let path = env::temp_dir().join(format!("horse-tournament-{}.ron", std::process::id()));
        let mut tournaments = Tournaments::default();
        tournaments.insert(&create("Cup", date(2024, 1, 1))).unwrap();

        tournaments.save(&path).unwrap();
        let loaded = Tournaments::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, tournaments);
        assert!(Tournaments::load(&path).unwrap().is_empty());
    }
}
