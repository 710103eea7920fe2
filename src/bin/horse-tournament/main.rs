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

#![deny(clippy::expect_used)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use std::{fs, path::Path, process::exit};

use clap::{CommandFactory, Parser};
use horse_tournament::{
    Error,
    participant::Participant,
    service::TournamentService,
    store::Tournaments,
    tournament::{TournamentCreate, TournamentSearch},
    utils::{self, create_data_folder, data_file},
};
use log::{debug, error};
use ron::ser::PrettyConfig;
use serde::Serialize;

use crate::command_line::{Args, Command};

const TOURNAMENTS_FILE: &str = "tournaments.ron";

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger("horse_tournament", args.debug);

    if args.man {
        return Args::generate_man_page();
    }

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let path = match args.data_file {
        Some(path) => path,
        None => {
            let path = data_file(TOURNAMENTS_FILE);
            if let Some(folder) = path.parent() {
                create_data_folder(folder)?;
            }
            path
        }
    };
    debug!("data file: {}", path.display());

    let mut service = TournamentService::new(Tournaments::load(&path)?);

    match run(&mut service, command, &path) {
        Ok(()) => Ok(()),
        Err(Error::Validation(error)) => {
            eprintln!("{}", error.itemized());
            exit(1)
        }
        Err(error) => {
            error!("{error}");
            exit(1)
        }
    }
}

fn run(
    service: &mut TournamentService<Tournaments>,
    command: Command,
    path: &Path,
) -> Result<(), Error> {
    match command {
        Command::Search {
            name,
            start_date,
            end_date,
        } => {
            let search = TournamentSearch {
                name,
                start_date,
                end_date,
            };

            for tournament in service.search(&search) {
                println!("{tournament}");
            }
        }
        Command::Create { file } => {
            let create: TournamentCreate = ron::from_str(&fs::read_to_string(file)?)?;
            let tournament = service.insert(&create)?;
            service.store.save(path)?;
            print_ron(&tournament)?;
        }
        Command::FirstRound { id } => {
            let standings = service.generate_first_round(id)?;
            service.store.save(path)?;
            print_ron(&standings)?;
        }
        Command::Standings { id, view } => {
            print_ron(&service.standings(id, view)?)?;
        }
        Command::Update { id, file } => {
            let participants: Vec<Participant> = ron::from_str(&fs::read_to_string(file)?)?;
            let standings = service.save_standings(id, &participants)?;
            service.store.save(path)?;
            print_ron(&standings)?;
        }
    }

    Ok(())
}

fn print_ron<T: Serialize>(value: &T) -> Result<(), Error> {
    println!(
        "{}",
        ron::ser::to_string_pretty(value, PrettyConfig::default())?
    );
    Ok(())
}
