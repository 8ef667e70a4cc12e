use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Maximum number of dice rolled per turn.
pub const MAX_DICE: u32 = 100;

/// The dice every player rolls on their turn. Fixed for the whole game.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(try_from = "RawDiceConfig")]
pub struct DiceConfig {
    count: u32,
    sides: u32,
}

#[derive(Deserialize)]
struct RawDiceConfig {
    count: i64,
    sides: i64,
}

impl TryFrom<RawDiceConfig> for DiceConfig {
    type Error = DiceError;

    #[inline]
    fn try_from(raw: RawDiceConfig) -> Result<Self, Self::Error> {
        DiceConfig::new(raw.count, raw.sides)
    }
}

impl DiceConfig {
    /// Creates a new `DiceConfig` rolling `count` dice with `sides` faces each.
    ///
    /// Between 1 and [`MAX_DICE`] dice with at least 1 side are accepted. One-sided dice are
    /// accepted even though every roll is then both a critical fail and a critical success (see
    /// [`RollKind::classify`]).
    pub fn new(count: i64, sides: i64) -> Result<DiceConfig, DiceError> {
        let invalid = || DiceError::InvalidDiceConfig { count, sides };
        if !(1..=i64::from(MAX_DICE)).contains(&count) || sides < 1 {
            return Err(invalid());
        }
        Ok(DiceConfig {
            count: count.try_into().map_err(|_| invalid())?,
            sides: sides.try_into().map_err(|_| invalid())?,
        })
    }

    /// Number of dice rolled per turn.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of faces of each die.
    #[inline]
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Rolls every die once and sums the faces.
    pub fn roll(&self, rng: &mut impl GameRng) -> TurnRoll {
        let rolls: Vec<_> = (0..self.count)
            .map(|_| {
                let face = rng.roll_range(1, self.sides);
                log::trace!("rolled {face} on a d{}", self.sides);
                DieRoll {
                    face,
                    kind: RollKind::classify(face, self.sides),
                }
            })
            .collect();
        let total = rolls.iter().map(|r| u64::from(r.face)).sum();
        TurnRoll { rolls, total }
    }
}

impl Display for DiceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Cosmetic annotation of a single die. It has no effect on the score.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RollKind {
    CriticalFail,
    CriticalSuccess,
    Normal,
}

impl RollKind {
    /// Classifies `face` on a die with `sides` faces.
    ///
    /// A 1 is checked first, so on a one-sided die every roll is a [`RollKind::CriticalFail`].
    #[inline]
    pub fn classify(face: u32, sides: u32) -> RollKind {
        if face == 1 {
            RollKind::CriticalFail
        } else if face == sides {
            RollKind::CriticalSuccess
        } else {
            RollKind::Normal
        }
    }
}

/// The face shown by one die.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DieRoll {
    pub face: u32,
    pub kind: RollKind,
}

impl Display for DieRoll {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            RollKind::CriticalFail => write!(f, "You rolled a {}! Critical Fail!", self.face),
            RollKind::CriticalSuccess => {
                write!(f, "You rolled a {}! Critical Success!", self.face)
            }
            RollKind::Normal => write!(f, "You rolled a {}", self.face),
        }
    }
}

/// Everything a player rolled on one turn.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct TurnRoll {
    /// The dice, in the order they were rolled.
    pub rolls: Vec<DieRoll>,
    /// Sum of all the faces.
    pub total: u64,
}

#[derive(Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum DiceError {
    /// Dice count or number of sides is out of range.
    #[error(
        "invalid dice configuration ({count} dice with {sides} sides), \
         expected 1 to {max} dice with at least 1 side",
        max = MAX_DICE
    )]
    InvalidDiceConfig { count: i64, sides: i64 },
}
