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

//! Rebuilds the bracket of a tournament from its participants.
//!
//! Only `entry_number` and `round_reached` are stored, so who beat whom is
//! inferred: a node is held by the child that got strictly further, and is
//! left empty whenever that can't be told.

use std::{fmt, str::FromStr};

use log::{error, trace};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{error::Error, participant::Participant};

/// Which state of the bracket to show.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum View {
    /// Everything recorded so far.
    #[default]
    Current,
    /// The bracket before any round was played.
    FirstRound,
}

impl View {
    /// A participant found through a redirect whose `round_reached` equals
    /// this value doesn't take the slot.
    #[must_use]
    pub fn threshold(self) -> i32 {
        match self {
            Self::Current => 0,
            Self::FirstRound => 1,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::FirstRound => write!(f, "first_round"),
        }
    }
}

impl FromStr for View {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        match string {
            "current" => Ok(Self::Current),
            "first_round" | "first-round" => Ok(Self::FirstRound),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a View!"
            ))),
        }
    }
}

/// One match of the bracket, or a first round slot when it has no branches.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsNode {
    pub this_participant: Option<Participant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<StandingsNode>,
}

impl StandingsNode {
    #[must_use]
    pub fn leaf(participant: Option<Participant>) -> Self {
        Self {
            this_participant: participant,
            branches: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.branches.is_empty()
    }

    /// The first round slots, left to right.
    #[must_use]
    pub fn leaves(&self) -> Vec<&StandingsNode> {
        if self.is_leaf() {
            return vec![self];
        }

        self.branches.iter().flat_map(StandingsNode::leaves).collect()
    }

    #[must_use]
    pub fn internal_nodes(&self) -> usize {
        if self.is_leaf() {
            0
        } else {
            1 + self
                .branches
                .iter()
                .map(StandingsNode::internal_nodes)
                .sum::<usize>()
        }
    }

    /// Levels of matches above the first round slots.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.branches
            .iter()
            .map(|branch| branch.depth() + 1)
            .max()
            .unwrap_or_default()
    }
}

/// The participants as shown together with the tree built from them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bracket {
    pub participants: Vec<Participant>,
    pub tree: StandingsNode,
}

/// A first round slot before it is resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    /// Claimed by the participant at this index through its entry number.
    Claimed(usize),
    /// Nobody claims the slot; it is taken over from the participant stored
    /// at the same index.
    Vacated,
}

/// The bracket with everything recorded so far.
///
/// # Errors
///
/// See [`build_standings`].
pub fn build_current_standings(participants: &[Participant]) -> Result<Bracket, Error> {
    build_standings(participants, View::Current)
}

/// The bracket as it looked before any round was recorded. Every
/// participant in the result has `round_reached` 0; nothing is stored.
///
/// # Errors
///
/// See [`build_standings`].
pub fn build_first_round_standings(participants: &[Participant]) -> Result<Bracket, Error> {
    build_standings(participants, View::FirstRound)
}

/// # Errors
///
/// If the number of participants isn't a power of two of at least two, an
/// entry number is out of range or used twice, or the entry numbers form a
/// cycle. All of these mean the stored data is broken.
pub fn build_standings(participants: &[Participant], view: View) -> Result<Bracket, Error> {
    trace!("build_standings {view}: {participants:?}");

    let participants: Vec<Participant> = match view {
        View::Current => participants.to_vec(),
        View::FirstRound => participants
            .iter()
            .map(|participant| Participant {
                round_reached: 0,
                ..participant.clone()
            })
            .collect(),
    };

    let tree = build_tree(&participants, view.threshold()).inspect_err(|error| {
        error!("build_standings: {error}");
    })?;

    Ok(Bracket { participants, tree })
}

fn build_tree(participants: &[Participant], threshold: i32) -> Result<StandingsNode, Error> {
    let slots = claim_slots(participants)?;

    let mut leaves = Vec::with_capacity(slots.len());
    for (index, slot) in slots.into_iter().enumerate() {
        let occupant = match slot {
            Slot::Claimed(claimed) => participants.get(claimed),
            Slot::Vacated => take_over(participants, index, threshold)?,
        };
        leaves.push(StandingsNode::leaf(occupant.cloned()));
    }

    Ok(build_level(leaves, 0))
}

fn claim_slots(participants: &[Participant]) -> Result<Vec<Slot>, Error> {
    let len = participants.len();
    if len < 2 || !len.is_power_of_two() {
        return Err(Error::Structural(format!(
            "a bracket needs a power of two participants, got {len}"
        )));
    }

    let mut slots = vec![Slot::Vacated; len];
    for (index, participant) in participants.iter().enumerate() {
        if !participant.is_seeded() {
            continue;
        }

        let claimed = participant
            .slot()
            .and_then(|slot| slots.get_mut(slot))
            .ok_or_else(|| {
                Error::Structural(format!(
                    "participant {} has entry number {} outside the bracket",
                    participant.id, participant.entry_number
                ))
            })?;

        if *claimed != Slot::Vacated {
            return Err(Error::Structural(format!(
                "entry number {} is used more than once",
                participant.entry_number
            )));
        }
        *claimed = Slot::Claimed(index);
    }

    Ok(slots)
}

/// Finds who holds the slot at `index` that no entry number claims.
fn take_over(
    participants: &[Participant],
    index: usize,
    threshold: i32,
) -> Result<Option<&Participant>, Error> {
    let Some(participant) = participants.get(index) else {
        return Ok(None);
    };

    if participant.round_reached == threshold {
        return Ok(None);
    }

    let Some(next) = participant.slot() else {
        return Ok(Some(participant));
    };

    let end = follow_redirects(participants, next)?;
    Ok(participants
        .get(end)
        .filter(|participant| participant.round_reached != threshold))
}

/// Follows entry numbers, each one the index of the next participant, until
/// an unseeded participant is reached and returns its index.
fn follow_redirects(participants: &[Participant], start: usize) -> Result<usize, Error> {
    let mut visited = FxHashSet::default();
    let mut index = start;

    loop {
        let participant = participants.get(index).ok_or_else(|| {
            Error::Structural(format!("redirect to {index} points outside the bracket"))
        })?;

        let Some(next) = participant.slot() else {
            return Ok(index);
        };

        if !visited.insert(index) {
            return Err(Error::Structural(format!(
                "the entry numbers starting at {start} form a cycle"
            )));
        }
        index = next;
    }
}

/// Pairs neighbouring nodes until only the final is left. `level` is how many
/// rounds lie below `nodes`.
fn build_level(mut nodes: Vec<StandingsNode>, level: i32) -> StandingsNode {
    if nodes.len() <= 1 {
        return nodes.pop().unwrap_or_default();
    }

    let mut parents = Vec::with_capacity(nodes.len() / 2);
    let mut nodes = nodes.into_iter();
    while let (Some(left), Some(right)) = (nodes.next(), nodes.next()) {
        parents.push(join(left, right, level + 1));
    }

    build_level(parents, level + 1)
}

/// The match decided in round `round` between `left` and `right`.
fn join(left: StandingsNode, right: StandingsNode, round: i32) -> StandingsNode {
    let winner = match (&left.this_participant, &right.this_participant) {
        (Some(a), Some(b)) if a.round_reached > b.round_reached => Some(a),
        (Some(a), Some(b)) if b.round_reached > a.round_reached => Some(b),
        _ => None,
    };

    // Whoever wins the match in round `round` has reached at least the round
    // after it.
    let this_participant = winner
        .filter(|winner| winner.round_reached > round)
        .cloned();

    StandingsNode {
        this_participant,
        branches: vec![left, right],
    }
}
