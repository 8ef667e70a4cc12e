use crate::console::Console;
use crate::dice::DiceConfig;
use crate::rng::GameRng;
use crate::teams::{Roster, TeamId};
use crate::ROUNDS;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::io;
use thiserror::Error;

/// Where a game stands.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RoundState {
    /// The given round (1-based) is the next one to play.
    AwaitingRound(u8),
    /// All rounds were played.
    Complete,
}

/// Points made by each team, in a single round or overall.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct RoundScore {
    pub first: u64,
    pub second: u64,
}

impl RoundScore {
    #[inline]
    pub fn new(first: u64, second: u64) -> RoundScore {
        RoundScore { first, second }
    }

    #[inline]
    pub fn get(&self, team: TeamId) -> u64 {
        match team {
            TeamId::First => self.first,
            TeamId::Second => self.second,
        }
    }

    #[inline]
    fn set(&mut self, team: TeamId, points: u64) {
        match team {
            TeamId::First => self.first = points,
            TeamId::Second => self.second = points,
        }
    }
}

/// Per-round points of both teams, in round order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
#[serde(
    try_from = "IndexMap<u8, RoundScore>",
    into = "IndexMap<u8, RoundScore>"
)]
pub struct ScoreTable {
    rounds: IndexMap<u8, RoundScore>,
}

impl TryFrom<IndexMap<u8, RoundScore>> for ScoreTable {
    type Error = RoundError;

    /// Replays the rounds in order, rejecting tables that couldn't have been recorded.
    fn try_from(rounds: IndexMap<u8, RoundScore>) -> Result<Self, Self::Error> {
        let mut table = ScoreTable::new();
        for (round, score) in rounds {
            table.record(round, score)?;
        }
        Ok(table)
    }
}

impl From<ScoreTable> for IndexMap<u8, RoundScore> {
    #[inline]
    fn from(table: ScoreTable) -> Self {
        table.rounds
    }
}

impl ScoreTable {
    #[inline]
    pub fn new() -> ScoreTable {
        ScoreTable {
            rounds: IndexMap::with_capacity(ROUNDS as usize),
        }
    }

    /// Number of rounds recorded.
    #[inline]
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Points of the given round, if it was played.
    #[inline]
    pub fn get(&self, round: u8) -> Option<RoundScore> {
        self.rounds.get(&round).copied()
    }

    /// Rounds played so far, in order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, RoundScore)> + '_ {
        self.rounds.iter().map(|(&round, &score)| (round, score))
    }

    /// Sum of every recorded round, per team.
    pub fn totals(&self) -> RoundScore {
        self.rounds
            .values()
            .fold(RoundScore::default(), |acc, score| RoundScore {
                first: acc.first + score.first,
                second: acc.second + score.second,
            })
    }

    /// Records the next round. Rounds can only be appended, in order.
    pub(crate) fn record(&mut self, round: u8, score: RoundScore) -> Result<(), RoundError> {
        if round > ROUNDS {
            return Err(RoundError::TooManyRounds(round));
        }
        let expected = self.next_round();
        if round != expected {
            return Err(RoundError::OutOfOrder(expected, round));
        }
        self.rounds.insert(round, score);
        Ok(())
    }

    #[inline]
    fn next_round(&self) -> u8 {
        self.rounds.last().map_or(1, |(&round, _)| round + 1)
    }

    /// The whole table under the given team names, rounds not yet played showing 0 points.
    #[inline]
    pub fn display<'a>(
        &'a self,
        first_name: &'a str,
        second_name: &'a str,
    ) -> ScoreTableDisplay<'a> {
        ScoreTableDisplay {
            table: self,
            first_name,
            second_name,
        }
    }
}

/// Renders a [`ScoreTable`] with a column per team (see [`ScoreTable::display`]).
#[derive(Copy, Clone, Debug)]
pub struct ScoreTableDisplay<'a> {
    table: &'a ScoreTable,
    first_name: &'a str,
    second_name: &'a str,
}

impl ScoreTableDisplay<'_> {
    fn rows(&self) -> impl Iterator<Item = (u8, RoundScore)> + '_ {
        (1..=ROUNDS).map(move |round| (round, self.table.get(round).unwrap_or_default()))
    }

    fn column_width(&self, name: &str, team: TeamId) -> usize {
        self.rows()
            .map(|(_, score)| score.get(team).to_string().len())
            .chain([name.chars().count()])
            .max()
            .unwrap_or(1)
    }
}

impl Display for ScoreTableDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (first_name, second_name) = (self.first_name, self.second_name);
        let first_width = self.column_width(first_name, TeamId::First);
        let second_width = self.column_width(second_name, TeamId::Second);
        let label_width = ROUNDS.to_string().len();

        write!(
            f,
            "{:label_width$}  {first_name:>first_width$}  {second_name:>second_width$}",
            ""
        )?;
        for (round, score) in self.rows() {
            write!(
                f,
                "\n{round:<label_width$}  {:>first_width$}  {:>second_width$}",
                score.first, score.second
            )?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RoundError {
    /// All rounds were already played.
    #[error("all {} rounds were already played", ROUNDS)]
    AlreadyComplete,
    /// The game is still in progress.
    #[error("the game is not over yet ({0:?})")]
    NotComplete(RoundState),
    /// A round was recorded out of order.
    #[error("expected to record round {0}, but round {1} was provided")]
    OutOfOrder(u8, u8),
    /// A round past the last one was recorded.
    #[error("a game has {rounds} rounds, but round {0} was provided", rounds = ROUNDS)]
    TooManyRounds(u8),
    /// The console failed.
    #[error("console error: {0}")]
    Io(#[from] io::Error),
}

/// Plays the rounds of a game.
///
/// In every round each player of the first team rolls, in roster order, then each player of the
/// second team. The per-team sums are recorded in the [`ScoreTable`] and added to the teams'
/// scores.
#[derive(Debug)]
pub struct RoundEngine {
    roster: Roster,
    dice: DiceConfig,
    state: RoundState,
    table: ScoreTable,
}

impl RoundEngine {
    pub fn new(roster: Roster, dice: DiceConfig) -> RoundEngine {
        RoundEngine {
            roster,
            dice,
            state: RoundState::AwaitingRound(1),
            table: ScoreTable::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> RoundState {
        self.state
    }

    #[inline]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[inline]
    pub fn dice(&self) -> DiceConfig {
        self.dice
    }

    #[inline]
    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    /// Plays the next round and returns the new state.
    pub fn play_round(
        &mut self,
        rng: &mut impl GameRng,
        console: &mut impl Console,
    ) -> Result<RoundState, RoundError> {
        let RoundState::AwaitingRound(round) = self.state else {
            return Err(RoundError::AlreadyComplete);
        };

        let [first, second] = self.roster.teams();
        console.print(&self.table.display(first.name(), second.name()).to_string())?;
        console.print(&format!("Round number {round} - start").to_uppercase())?;

        let mut score = RoundScore::default();
        for team in self.roster.teams() {
            let mut team_points = 0;
            for player in team.members() {
                console.print(&format!("Player {player} - roll dice!"))?;
                console.wait_for_ack()?;
                let turn = self.dice.roll(rng);
                for die in &turn.rolls {
                    console.print(&die.to_string())?;
                }
                console.print(&format!("You have rolled a total of {}", turn.total))?;
                log::debug!("round {round}: {player} rolled {}", turn.total);
                team_points += turn.total;
            }
            console.print(&format!(
                "The score for {team} in round {round} is {team_points}!"
            ))?;
            score.set(team.id(), team_points);
        }

        self.table.record(round, score)?;
        for team in TeamId::ALL {
            self.roster.team_mut(team).add_score(score.get(team));
        }
        log::debug!("round {round} finished {}-{}", score.first, score.second);

        self.state = if round >= ROUNDS {
            RoundState::Complete
        } else {
            RoundState::AwaitingRound(round + 1)
        };
        Ok(self.state)
    }

    /// Plays every remaining round.
    pub fn play_all(
        &mut self,
        rng: &mut impl GameRng,
        console: &mut impl Console,
    ) -> Result<(), RoundError> {
        while let RoundState::AwaitingRound(_) = self.state {
            self.play_round(rng, console)?;
        }
        Ok(())
    }

    /// Hands back the roster and the score table of a complete game.
    pub fn finish(self) -> Result<(Roster, ScoreTable), RoundError> {
        match self.state {
            RoundState::Complete => Ok((self.roster, self.table)),
            state => Err(RoundError::NotComplete(state)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::teams::set_teams;
    use crate::{RandGen, ScriptedConsole, ScriptedRng, Seeder};
    use itertools::Itertools;

    fn roster(players: &[&str], rng: &mut impl GameRng) -> Roster {
        let players = players.iter().map(|&p| p.to_owned()).collect();
        set_teams("Red", "Blue", players, rng).unwrap()
    }

    #[test]
    fn test_ten_rounds() {
        let mut rng: RandGen = Seeder::from("ten rounds").make_rng();
        let roster = roster(&["Ann", "Bob", "Cid", "Dee", "Eve", "Fay"], &mut rng);
        let dice = DiceConfig::new(3, 6).unwrap();
        let mut console = ScriptedConsole::default();

        let mut engine = RoundEngine::new(roster, dice);
        engine.play_all(&mut rng, &mut console).unwrap();
        assert_eq!(engine.state(), RoundState::Complete);
        // One pause per turn
        assert_eq!(console.acks(), 10 * 6);

        let (roster, table) = engine.finish().unwrap();
        assert_eq!(table.len(), ROUNDS as usize);
        for (i, (round, score)) in table.iter().enumerate() {
            assert_eq!(round as usize, i + 1);
            // Three players per team rolling 3d6 each
            assert!((9..=54).contains(&score.first));
            assert!((9..=54).contains(&score.second));
        }
        let totals = table.totals();
        assert_eq!(roster.team(TeamId::First).score(), totals.first);
        assert_eq!(roster.team(TeamId::Second).score(), totals.second);
    }

    #[test]
    fn test_state_transitions() {
        let mut rng = ScriptedRng::new([2, 5]);
        let roster = roster(&["Ann", "Bob"], &mut rng);
        let mut engine = RoundEngine::new(roster, DiceConfig::new(1, 6).unwrap());
        let mut console = ScriptedConsole::default();

        assert_eq!(engine.state(), RoundState::AwaitingRound(1));
        assert!(matches!(
            engine.play_round(&mut rng, &mut console),
            Ok(RoundState::AwaitingRound(2))
        ));
        assert_eq!(engine.table().get(1), Some(RoundScore::new(2, 5)));
        assert_eq!(engine.roster().team(TeamId::First).score(), 2);

        for _ in 2..ROUNDS {
            engine.play_round(&mut rng, &mut console).unwrap();
        }
        assert!(matches!(
            engine.play_round(&mut rng, &mut console),
            Ok(RoundState::Complete)
        ));
        assert!(matches!(
            engine.play_round(&mut rng, &mut console),
            Err(RoundError::AlreadyComplete)
        ));
        assert_eq!(engine.table().totals(), RoundScore::new(20, 50));
    }

    #[test]
    fn test_finish_before_complete() {
        let mut rng = ScriptedRng::default();
        let roster = roster(&["Ann", "Bob"], &mut rng);
        let engine = RoundEngine::new(roster, DiceConfig::new(1, 6).unwrap());
        assert!(matches!(
            engine.finish(),
            Err(RoundError::NotComplete(RoundState::AwaitingRound(1)))
        ));
    }

    #[test]
    fn test_round_output() {
        let mut rng = ScriptedRng::new([6, 1, 3, 4]);
        let roster = roster(&["Ann", "Bob", "Cid", "Dee"], &mut rng);
        let mut engine = RoundEngine::new(roster, DiceConfig::new(1, 6).unwrap());
        let mut console = ScriptedConsole::default();
        engine.play_round(&mut rng, &mut console).unwrap();

        let output = console.output();
        // Header and ten rows
        assert_eq!(output[0], "    Red  Blue");
        assert_eq!(output[1], "1     0     0");
        assert_eq!(output[10], "10    0     0");
        assert_eq!(
            &output[11..],
            [
                "ROUND NUMBER 1 - START",
                "Player Ann - roll dice!",
                "You rolled a 6! Critical Success!",
                "You have rolled a total of 6",
                "Player Bob - roll dice!",
                "You rolled a 1! Critical Fail!",
                "You have rolled a total of 1",
                "The score for Red in round 1 is 7!",
                "Player Cid - roll dice!",
                "You rolled a 3",
                "You have rolled a total of 3",
                "Player Dee - roll dice!",
                "You rolled a 4",
                "You have rolled a total of 4",
                "The score for Blue in round 1 is 7!",
            ]
        );
    }

    #[test]
    fn test_record_out_of_order() {
        let mut table = ScoreTable::new();
        assert!(matches!(
            table.record(2, RoundScore::default()),
            Err(RoundError::OutOfOrder(1, 2))
        ));
        for round in 1..=ROUNDS {
            table.record(round, RoundScore::new(1, 2)).unwrap();
        }
        assert!(matches!(
            table.record(ROUNDS + 1, RoundScore::default()),
            Err(RoundError::TooManyRounds(11))
        ));
        assert_eq!(table.totals(), RoundScore::new(10, 20));
    }

    #[test]
    fn test_render_wide_values() {
        let mut table = ScoreTable::new();
        table.record(1, RoundScore::new(12345, 7)).unwrap();
        let rendered = table.display("A", "Blue").to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "        A  Blue");
        assert_eq!(lines[1], "1   12345     7");
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn test_serialization() {
        let mut table = ScoreTable::new();
        table.record(1, RoundScore::new(3, 4)).unwrap();
        table.record(2, RoundScore::new(5, 6)).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(
            json,
            r#"{"1":{"first":3,"second":4},"2":{"first":5,"second":6}}"#
        );
        assert_eq!(serde_json::from_str::<ScoreTable>(&json).unwrap(), table);
    }

    #[test]
    fn test_deserialization_replays_rounds() {
        let score = r#"{"first":5,"second":4}"#;
        let rejected = [
            format!(r#"{{"7":{score},"3":{score},"42":{score}}}"#),
            format!(r#"{{"0":{score}}}"#),
            format!(r#"{{"1":{score},"3":{score}}}"#),
            format!(r#"{{"2":{score},"1":{score}}}"#),
            format!(
                "{{{}}}",
                (1..=11).map(|round| format!(r#""{round}":{score}"#)).join(",")
            ),
        ];
        for json in rejected {
            assert!(serde_json::from_str::<ScoreTable>(&json).is_err(), "{json}");
        }

        let full = format!(
            "{{{}}}",
            (1..=ROUNDS).map(|round| format!(r#""{round}":{score}"#)).join(",")
        );
        let table: ScoreTable = serde_json::from_str(&full).unwrap();
        assert_eq!(table.len(), ROUNDS as usize);
        assert_eq!(table.totals(), RoundScore::new(50, 40));
    }
}
