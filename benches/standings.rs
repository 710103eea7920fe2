#[cfg(feature = "bench")]
use std::time::Duration;

#[cfg(feature = "bench")]
use chrono::NaiveDate;
#[cfg(feature = "bench")]
use criterion::{Criterion, criterion_group, criterion_main};

#[cfg(feature = "bench")]
use horse_tournament::{
    participant::{HorseSelection, Participant},
    seeding::seed_first_round,
    standings::{build_current_standings, build_first_round_standings},
};

#[cfg(feature = "bench")]
fn participants() -> Vec<Participant> {
    let date_of_birth = NaiveDate::from_ymd_opt(2016, 4, 1).unwrap_or_default();

    (1..=8)
        .map(|id| {
            let horse = HorseSelection {
                id,
                name: format!("Horse {id}"),
                date_of_birth,
            };
            Participant {
                points: u32::try_from(id * 7 % 5).unwrap_or_default(),
                ..Participant::new(id, &horse)
            }
        })
        .collect()
}

#[cfg(feature = "bench")]
fn standings(c: &mut Criterion) {
    let mut seeded = seed_first_round(&participants()).unwrap();
    for (participant, round) in seeded.iter_mut().zip([4, 1, 2, 1, 3, 1, 2, 1]) {
        participant.round_reached = round;
    }

    c.bench_function("seed_first_round", |b| {
        let participants = participants();
        b.iter(|| seed_first_round(&participants));
    });
    c.bench_function("build_current_standings", |b| {
        b.iter(|| build_current_standings(&seeded));
    });
    c.bench_function("build_first_round_standings", |b| {
        b.iter(|| build_first_round_standings(&seeded));
    });
}

#[cfg(feature = "bench")]
criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = standings
}

#[cfg(feature = "bench")]
criterion_main!(benches);

#[cfg(not(feature = "bench"))]
fn main() {
    eprintln!("You must enable pass `--features=bench`");
}
