use crate::dice::DiceConfig;
use crate::{gen_seed, RandGen, Seeder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the game waits before each turn.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Pacing {
    /// Wait for the user to press enter.
    #[default]
    Prompt,
    /// Sleep for a fixed time.
    Delay(Duration),
    /// Don't wait at all.
    Off,
}

/// Settings of a game session.
#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct GameConfig {
    /// Seed of the game's random generator. A random one is picked if missing.
    pub seed: Option<String>,
    /// Dice to use. The user is asked for them if missing.
    pub dice: Option<DiceConfig>,
    pub pacing: Pacing,
}

impl GameConfig {
    /// The seed to use, picking a random one if none was configured.
    pub fn resolve_seed(&self) -> String {
        match &self.seed {
            Some(seed) => seed.clone(),
            None => gen_seed()[..8]
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect(),
        }
    }

    /// Creates the game's random generator.
    ///
    /// The seed in use is logged, so any game can be replayed by passing it back in.
    pub fn make_rng(&self) -> RandGen {
        let seed = self.resolve_seed();
        log::info!("using seed {seed:?}");
        Seeder::from(seed.as_str()).make_rng()
    }
}
