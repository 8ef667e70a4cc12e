#![forbid(unsafe_code)]

use rand::{thread_rng, Rng};

pub mod config;
pub mod console;
pub mod dice;
pub mod game;
pub mod results;
pub mod rng;
pub mod rounds;
pub mod teams;

pub use config::{GameConfig, Pacing};
pub use console::{Console, ScriptedConsole, StdConsole};
pub use dice::{DiceConfig, DiceError, DieRoll, RollKind, TurnRoll, MAX_DICE};
pub use game::{play, GameError, GameSummary};
pub use results::{evaluate, FinalResult, Outcome};
pub use rng::{GameRng, ScriptedRng};
pub use rounds::{RoundEngine, RoundError, RoundScore, RoundState, ScoreTable};
pub use teams::{Player, Roster, Team, TeamId, TeamSetupError};

/// Number of rounds in a game.
pub const ROUNDS: u8 = 10;

/// Minimum number of players in a game.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 10;

/// The random generator used by the game.
pub type RandGen = rand_pcg::Pcg64;

pub use rand_seeder::Seeder;

/// Generates a fresh random seed.
#[inline]
pub fn gen_seed() -> [u8; 32] {
    thread_rng().gen()
}
