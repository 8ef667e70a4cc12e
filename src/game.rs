use crate::config::GameConfig;
use crate::console::Console;
use crate::dice::{DiceConfig, DiceError};
use crate::results::{self, FinalResult};
use crate::rng::GameRng;
use crate::rounds::{RoundEngine, RoundError, ScoreTable};
use crate::teams::{parse_player_names, set_teams, Roster};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

const FIRST_TEAM_PROMPT: &str = "Name the first team:";
const SECOND_TEAM_PROMPT: &str = "Name the second team:";
const PLAYERS_PROMPT: &str = "Enter an even number of space-separated players' names:";
const DICE_COUNT_PROMPT: &str = "How many dice would you like to roll?";
const DICE_SIDES_PROMPT: &str = "How many sides are the dice?";

/// Everything that happened in a finished game.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct GameSummary {
    pub roster: Roster,
    pub table: ScoreTable,
    pub result: FinalResult,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GameError {
    /// The answer to a question expecting a number wasn't one.
    #[error("expected a whole number for \"{prompt}\", but got {input:?}")]
    FatalInput { prompt: &'static str, input: String },
    /// The dice can't be rolled.
    #[error(transparent)]
    InvalidDice(#[from] DiceError),
    /// An error occurred while playing the rounds.
    #[error(transparent)]
    Round(#[from] RoundError),
    /// The console failed, or ran out of input.
    #[error("console error: {0}")]
    Io(#[from] io::Error),
}

/// Plays a whole game on `console`: names the teams, draws the players, asks for the dice, plays
/// every round and reports the outcome.
///
/// Invalid player lists are asked for again until a valid one is entered.
pub fn play(
    config: &GameConfig,
    rng: &mut impl GameRng,
    console: &mut impl Console,
) -> Result<GameSummary, GameError> {
    let first_name = console.prompt(FIRST_TEAM_PROMPT)?;
    let second_name = console.prompt(SECOND_TEAM_PROMPT)?;
    let roster = draw_teams(&first_name, &second_name, rng, console)?;
    console.print(&roster.to_string())?;

    let dice = match config.dice {
        Some(dice) => dice,
        None => read_dice(console)?,
    };
    log::info!("playing with {dice}");
    console.wait_for_ack()?;

    let mut engine = RoundEngine::new(roster, dice);
    engine.play_all(rng, console)?;
    let (roster, table) = engine.finish()?;

    let result = results::evaluate(&table);
    results::report(&result, &roster, console)?;
    log::info!(
        "game over {}-{}: {:?}",
        result.totals.first,
        result.totals.second,
        result.outcome
    );

    Ok(GameSummary {
        roster,
        table,
        result,
    })
}

fn draw_teams(
    first_name: &str,
    second_name: &str,
    rng: &mut impl GameRng,
    console: &mut impl Console,
) -> Result<Roster, GameError> {
    loop {
        let players = parse_player_names(&console.prompt(PLAYERS_PROMPT)?);
        match set_teams(first_name, second_name, players, rng) {
            Ok(roster) => return Ok(roster),
            Err(e) => {
                log::info!("players rejected: {e}");
                console.print(&e.hint())?;
            }
        }
    }
}

fn read_dice(console: &mut impl Console) -> Result<DiceConfig, GameError> {
    let count = read_number(console, DICE_COUNT_PROMPT)?;
    let sides = read_number(console, DICE_SIDES_PROMPT)?;
    Ok(DiceConfig::new(count, sides)?)
}

fn read_number(console: &mut impl Console, prompt: &'static str) -> Result<i64, GameError> {
    let input = console.prompt(prompt)?;
    let number = input.trim().parse::<i64>();
    number.map_err(|_| GameError::FatalInput { prompt, input })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Outcome, RandGen, ScriptedConsole, ScriptedRng, Seeder, ROUNDS};

    #[test]
    fn test_seeded_game() {
        let config = GameConfig {
            seed: Some("seeded game".to_owned()),
            ..GameConfig::default()
        };
        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann Bob Cid Dee", "2", "8"]);
        let summary = play(&config, &mut config.make_rng(), &mut console).unwrap();

        assert_eq!(summary.table.len(), ROUNDS as usize);
        for (_, score) in summary.table.iter() {
            // Two players per team rolling 2d8 each
            assert!((4..=32).contains(&score.first));
            assert!((4..=32).contains(&score.second));
        }
        // One pause after the dice questions, then one per turn
        assert_eq!(console.acks(), 1 + 10 * 4);

        // Same seed, same game
        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann Bob Cid Dee", "2", "8"]);
        let again = play(&config, &mut config.make_rng(), &mut console).unwrap();
        assert_eq!(summary, again);
    }

    #[test]
    fn test_invalid_player_lists_are_asked_again() {
        let mut console = ScriptedConsole::new([
            "Red",
            "Blue",
            "Ann",
            "Ann Bob Cid",
            "A B C D E F G H I J K L",
            "Ann Bob",
            "1",
            "6",
        ]);
        let summary = play(&GameConfig::default(), &mut ScriptedRng::new([4]), &mut console)
            .unwrap();

        let output = console.output();
        for hint in [
            "Minimum number of players is 2. Please provide a valid number",
            "Enter an even number of players",
            "Maximum number of players is 10. Please provide a valid number",
        ] {
            assert!(output.iter().any(|l| l == hint), "{hint}");
        }
        assert_eq!(
            output.iter().filter(|l| l.as_str() == PLAYERS_PROMPT).count(),
            4
        );
        assert_eq!(summary.result.outcome, Outcome::Tie);
        assert_eq!(summary.result.totals.first, 40);
    }

    #[test]
    fn test_single_player_never_drawn() {
        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann", "Ann", "Ann"]);
        let err = play(&GameConfig::default(), &mut ScriptedRng::default(), &mut console)
            .unwrap_err();
        assert!(matches!(&err, GameError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
        assert!(!console.output().iter().any(|l| l.contains("players:")));
        assert_eq!(console.remaining_input(), 0);
    }

    #[test]
    fn test_non_numeric_dice() {
        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann Bob", "three"]);
        let err = play(&GameConfig::default(), &mut ScriptedRng::default(), &mut console)
            .unwrap_err();
        assert!(matches!(
            &err,
            GameError::FatalInput { prompt: DICE_COUNT_PROMPT, input } if input == "three"
        ));
        assert_eq!(
            err.to_string(),
            format!("expected a whole number for {DICE_COUNT_PROMPT:?}, but got \"three\"")
        );

        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann Bob", "1", "6.5"]);
        let err = play(&GameConfig::default(), &mut ScriptedRng::default(), &mut console)
            .unwrap_err();
        assert!(matches!(err, GameError::FatalInput { prompt: DICE_SIDES_PROMPT, .. }));
    }

    #[test]
    fn test_invalid_dice() {
        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann Bob", "0", "6"]);
        let err = play(&GameConfig::default(), &mut ScriptedRng::default(), &mut console)
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidDice(DiceError::InvalidDiceConfig { count: 0, sides: 6 })
        ));
        // Nothing was rolled
        assert_eq!(console.acks(), 0);
    }

    #[test]
    fn test_too_many_dice() {
        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann Bob", "4000000000", "6"]);
        let err = play(&GameConfig::default(), &mut ScriptedRng::default(), &mut console)
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidDice(DiceError::InvalidDiceConfig {
                count: 4_000_000_000,
                sides: 6
            })
        ));
        assert_eq!(console.acks(), 0);
    }

    #[test]
    fn test_preset_dice_skip_questions() {
        let config = GameConfig {
            dice: Some(DiceConfig::new(2, 6).unwrap()),
            ..GameConfig::default()
        };
        let mut console = ScriptedConsole::new(["Red", "Blue", "Ann Bob"]);
        let mut rng: RandGen = Seeder::from("preset").make_rng();
        let summary = play(&config, &mut rng, &mut console).unwrap();
        assert!(!console.output().iter().any(|l| l == DICE_COUNT_PROMPT));
        assert_eq!(summary.table.len(), ROUNDS as usize);
    }
}
