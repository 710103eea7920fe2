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

use std::{io::Write as _, path::PathBuf};

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use horse_tournament::{COPYRIGHT, Id, LONG_VERSION, standings::View};

/// Horse Tournament
///
/// Keeps eight horse knockout tournaments in a RON file: seeds the first
/// round, records results and shows the bracket.
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "Horse Tournament")]
pub(crate) struct Args {
    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Read and write tournaments from this file
    ///
    /// [default: <data dir>/horse-tournament/tournaments.ron]
    #[arg(long, value_name = "path")]
    pub data_file: Option<PathBuf>,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// List tournaments, latest first
    Search {
        /// Part of the name, any case
        #[arg(long)]
        name: Option<String>,

        /// Only tournaments that end on or after this date
        #[arg(long, value_name = "yyyy-mm-dd")]
        start_date: Option<NaiveDate>,

        /// Only tournaments that start on or before this date
        #[arg(long, value_name = "yyyy-mm-dd")]
        end_date: Option<NaiveDate>,
    },

    /// Create a tournament from a RON file
    Create {
        #[arg(index = 1, value_name = "file")]
        file: PathBuf,
    },

    /// Seed the tournament if needed and show the first round
    FirstRound {
        #[arg(index = 1)]
        id: Id,
    },

    /// Show the bracket of a tournament
    Standings {
        #[arg(index = 1)]
        id: Id,

        /// current or first_round
        #[arg(default_value_t = View::Current, long)]
        view: View,
    },

    /// Store new results from a RON file with a list of participants
    Update {
        #[arg(index = 1)]
        id: Id,

        #[arg(index = 2, value_name = "file")]
        file: PathBuf,
    },
}

impl Args {
    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("horse-tournament").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2026-10-19");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("horse-tournament.1", buffer)?;
        Ok(())
    }
}
