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

use log::{info, trace};

use crate::{
    Id,
    error::{Error, ValidationError},
    participant::Participant,
    seeding::{history_points, seed_first_round},
    standings::View,
    store::TournamentStore,
    tournament::{Tournament, TournamentCreate, TournamentSearch, TournamentStandings},
    validate::{UPDATE_FAILED, validate_advancement, validate_for_insert},
};

/// Ties the engine to a [`TournamentStore`]. Callers must not run writes for
/// the same tournament at the same time.
#[derive(Clone, Debug, Default)]
pub struct TournamentService<S> {
    pub store: S,
}

impl<S: TournamentStore> TournamentService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn search(&self, search: &TournamentSearch) -> Vec<Tournament> {
        trace!("search: {search:?}");
        self.store.search(search)
    }

    /// # Errors
    ///
    /// If `create` isn't valid or the tournament already exists.
    pub fn insert(&mut self, create: &TournamentCreate) -> Result<Tournament, Error> {
        trace!("insert: {create:?}");

        validate_for_insert(create)?;
        let tournament = self.store.insert(create)?;
        info!("created tournament {tournament}");

        Ok(tournament)
    }

    /// The bracket as stored, nothing is seeded.
    ///
    /// # Errors
    ///
    /// If the tournament doesn't exist or its bracket is broken.
    pub fn standings(&self, id: Id, view: View) -> Result<TournamentStandings, Error> {
        trace!("standings {view}: {id}");
        self.store.tournament(id)?.standings(view)
    }

    /// Seeds the tournament if it hasn't been seeded and shows the bracket
    /// before the first round.
    ///
    /// # Errors
    ///
    /// If the tournament doesn't exist or its participants can't be seeded.
    pub fn generate_first_round(&mut self, id: Id) -> Result<TournamentStandings, Error> {
        trace!("generate_first_round: {id}");

        let mut tournament = self.store.tournament(id)?;
        if !tournament.participants.iter().all(Participant::is_seeded) {
            let participants: Vec<Participant> = tournament
                .participants
                .iter()
                .map(|participant| {
                    let history = self.store.history(participant.horse_id, id);
                    Participant {
                        points: history_points(tournament.start_date, &history),
                        ..participant.clone()
                    }
                })
                .collect();

            let seeded = seed_first_round(&participants)?;
            tournament.participants = self.store.update_participants(id, &seeded)?;
            info!("seeded tournament {tournament}");
        }

        tournament
            .participants
            .sort_unstable_by_key(|participant| participant.entry_number);
        tournament.standings(View::FirstRound)
    }

    /// Stores new results and returns the updated bracket.
    ///
    /// `participants` may be any subset of the tournament. The results are
    /// checked together with the stored ones and nothing is stored unless the
    /// whole bracket is valid. Only seeding sets entry numbers, so they must
    /// match the stored ones.
    ///
    /// # Errors
    ///
    /// If the results aren't valid, a participant isn't part of the
    /// tournament, or the updated bracket is broken.
    pub fn save_standings(
        &mut self,
        id: Id,
        participants: &[Participant],
    ) -> Result<TournamentStandings, Error> {
        trace!("save_standings {id}: {participants:?}");

        let mut tournament = self.store.tournament(id)?;
        let mut errors = Vec::new();
        for participant in participants {
            let stored = tournament
                .participants
                .iter_mut()
                .find(|stored| stored.id == participant.id)
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "participant {} isn't part of tournament {id}",
                        participant.id
                    ))
                })?;

            if stored.entry_number != participant.entry_number {
                errors.push(format!(
                    "entryNumber of participant with id: {} can't change from {} to {}",
                    participant.id, stored.entry_number, participant.entry_number
                ));
            }
            stored.round_reached = participant.round_reached;
        }

        if let Err(error) = validate_advancement(&tournament.participants) {
            errors.extend(error.errors);
        }
        ValidationError::check(UPDATE_FAILED, errors)?;

        let standings = tournament.standings(View::Current)?;
        self.store.update_participants(id, participants)?;
        info!("saved standings of tournament {tournament}");

        Ok(standings)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{BRACKET_SIZE, participant::HorseSelection, store::Tournaments};

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
    fn invalid_tournaments_are_not_stored() {
        let mut service = TournamentService::new(Tournaments::default());
        let mut tournament = create("Cup", date(2024, 1, 1));
        tournament.participants.truncate(4);

        assert!(matches!(service.insert(&tournament), Err(Error::Validation(_))));
        assert!(service.store.is_empty());
    }

    #[test]
    fn first_round_is_seeded_once() {
        let mut service = TournamentService::new(Tournaments::default());
        let id = service.insert(&create("Cup", date(2024, 1, 1))).unwrap().id;

        let first = service.generate_first_round(id).unwrap();
        let slots: Vec<i32> = first.participants.iter().map(|p| p.entry_number).collect();
        assert_eq!(slots, (0..8).collect::<Vec<_>>());

        // Everyone has zero points, so names decide.
        assert_eq!(first.participants[0].name, "Horse 1");
        assert_eq!(first.participants[7].name, "Horse 2");

        let again = service.generate_first_round(id).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn entry_numbers_can_not_change() {
        let mut service = TournamentService::new(Tournaments::default());
        let id = service.insert(&create("Cup", date(2024, 1, 1))).unwrap().id;
        let mut participants = service.generate_first_round(id).unwrap().participants;

        participants.swap(0, 1);
        let (a, b) = (participants[0].entry_number, participants[1].entry_number);
        participants[0].entry_number = b;
        participants[1].entry_number = a;

        let Err(Error::Validation(error)) = service.save_standings(id, &participants) else {
            panic!("changing entry numbers must fail");
        };
        assert_eq!(error.errors.len(), 2);
    }

    #[test]
    fn only_seeding_sets_entry_numbers() {
        let mut service = TournamentService::new(Tournaments::default());
        let id = service.insert(&create("Cup", date(2024, 1, 1))).unwrap().id;
        let before = service.store.tournament(id).unwrap();

        let mut participants = before.participants.clone();
        for participant in &mut participants {
            participant.entry_number = 3;
        }

        let Err(Error::Validation(error)) = service.save_standings(id, &participants) else {
            panic!("entry numbers outside seeding must fail");
        };
        assert_eq!(error.errors.len(), BRACKET_SIZE);

        assert_eq!(service.store.tournament(id).unwrap(), before);
        assert!(service.standings(id, View::Current).is_ok());
        assert!(service.generate_first_round(id).is_ok());
    }

    #[test]
    fn partial_updates_are_checked_with_the_stored_results() {
        let mut service = TournamentService::new(Tournaments::default());
        let id = service.insert(&create("Cup", date(2024, 1, 1))).unwrap().id;
        let mut participants = service.generate_first_round(id).unwrap().participants;

        participants[0].round_reached = 4;
        service.save_standings(id, &participants[..1]).unwrap();

        participants[1].round_reached = 4;
        let Err(Error::Validation(error)) = service.save_standings(id, &participants[1..2]) else {
            panic!("a second champion must fail");
        };
        assert_eq!(
            error.errors,
            vec!["invalid number of horses, which stay for round 4".to_string()]
        );

        let stored = service.store.tournament(id).unwrap().participants;
        assert_eq!(stored.iter().filter(|p| p.round_reached == 4).count(), 1);
    }

    #[test]
    fn recorded_rounds_can_be_corrected() {
        let mut service = TournamentService::new(Tournaments::default());
        let id = service.insert(&create("Cup", date(2024, 1, 1))).unwrap().id;
        let mut participants = service.generate_first_round(id).unwrap().participants;

        participants[0].round_reached = 4;
        service.save_standings(id, &participants).unwrap();

        participants[0].round_reached = 1;
        let standings = service.save_standings(id, &participants).unwrap();
        assert!(standings.participants.iter().all(|p| p.round_reached != 4));
    }

    #[test]
    fn unknown_participants_are_not_found() {
        let mut service = TournamentService::new(Tournaments::default());
        let id = service.insert(&create("Cup", date(2024, 1, 1))).unwrap().id;
        let mut participants = service.standings(id, View::Current).unwrap().participants;
        participants[2].id = 1_000;

        assert!(matches!(
            service.save_standings(id, &participants),
            Err(Error::NotFound(_))
        ));
    }
}
