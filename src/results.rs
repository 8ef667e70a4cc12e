use crate::console::Console;
use crate::rounds::{RoundScore, ScoreTable};
use crate::teams::{Roster, TeamId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io;
use std::marker::PhantomData;

/// How a game ended.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    Winner(TeamId),
    Tie,
}

impl Outcome {
    /// Compares the total points of the two teams.
    #[inline]
    pub fn from_totals(first: u64, second: u64) -> Outcome {
        match first.cmp(&second) {
            Ordering::Greater => Outcome::Winner(TeamId::First),
            Ordering::Equal => Outcome::Tie,
            Ordering::Less => Outcome::Winner(TeamId::Second),
        }
    }
}

/// The final standing of a game.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
pub struct FinalResult {
    /// Total points of each team over all rounds.
    pub totals: RoundScore,
    pub outcome: Outcome,

    #[serde(skip)]
    _phantom: PhantomData<()>,
}

/// Sums every round of the table and picks the winner.
pub fn evaluate(table: &ScoreTable) -> FinalResult {
    let totals = table.totals();
    FinalResult {
        totals,
        outcome: Outcome::from_totals(totals.first, totals.second),
        _phantom: PhantomData,
    }
}

/// Prints the final points and the outcome.
pub fn report(result: &FinalResult, roster: &Roster, console: &mut impl Console) -> io::Result<()> {
    let [first, second] = roster.teams();
    console.print(&format!(
        "Final results:\n{first} - {}\n{second} - {}",
        result.totals.first, result.totals.second
    ))?;
    match result.outcome {
        Outcome::Winner(team) => console.print(&format!("{} won!", roster.team(team))),
        Outcome::Tie => console.print("It's a tie!"),
    }
}
