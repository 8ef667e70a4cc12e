use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use team_dice::{play, DiceConfig, GameConfig, Pacing, StdConsole};

/// Two teams, ten rounds of dice: the team rolling the most points wins.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed of the game, to replay a previous one
    #[arg(long)]
    seed: Option<String>,

    /// Number of dice rolled per turn (skips the question)
    #[arg(long, requires = "sides")]
    dice: Option<u32>,

    /// Number of sides of each die (skips the question)
    #[arg(long, requires = "dice")]
    sides: Option<u32>,

    /// Don't wait for enter before each turn
    #[arg(long, conflicts_with = "delay_ms")]
    no_pause: bool,

    /// Wait this many milliseconds before each turn instead of waiting for enter
    #[arg(long)]
    delay_ms: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<GameConfig> {
        let dice = match (self.dice, self.sides) {
            (Some(count), Some(sides)) => Some(
                DiceConfig::new(count.into(), sides.into()).context("invalid --dice/--sides")?,
            ),
            _ => None,
        };
        let pacing = match (self.no_pause, self.delay_ms) {
            (true, _) => Pacing::Off,
            (false, Some(ms)) => Pacing::Delay(Duration::from_millis(ms)),
            (false, None) => Pacing::Prompt,
        };
        Ok(GameConfig {
            seed: self.seed,
            dice,
            pacing,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    log::debug!("args: {args:?}");
    let config = args.into_config()?;

    let mut rng = config.make_rng();
    let mut console = StdConsole::stdio(config.pacing);
    play(&config, &mut rng, &mut console).context("game aborted")?;
    Ok(())
}
