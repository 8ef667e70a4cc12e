use crate::RandGen;
use rand::prelude::SliceRandom;
use rand::Rng;

/// A source of randomness for a game.
pub trait GameRng {
    /// Returns an integer uniformly distributed in `low..=high`.
    ///
    /// Returns `low` if `high < low`.
    fn roll_range(&mut self, low: u32, high: u32) -> u32;

    /// Shuffles `items` in place. Every permutation must be reachable.
    fn shuffle<T>(&mut self, items: &mut [T]);
}

impl GameRng for RandGen {
    #[inline]
    fn roll_range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }

    #[inline]
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

/// Replays a fixed sequence of values, starting over once it runs out.
///
/// Values outside the requested range are clamped into it and an empty sequence always yields the
/// low end of the range. [`GameRng::shuffle`] leaves the order untouched. Useful to replay a known
/// game.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    values: Vec<u32>,
    next: usize,
}

impl ScriptedRng {
    /// Creates a `ScriptedRng` replaying `values`.
    pub fn new(values: impl Into<Vec<u32>>) -> ScriptedRng {
        ScriptedRng {
            values: values.into(),
            next: 0,
        }
    }

    /// Number of values handed out so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl GameRng for ScriptedRng {
    fn roll_range(&mut self, low: u32, high: u32) -> u32 {
        if self.values.is_empty() {
            return low;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value.clamp(low, high.max(low))
    }

    #[inline]
    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}

// TRAIT DEFAULT IMPLEMENTATIONS

impl<G: GameRng> GameRng for &mut G {
    #[inline]
    fn roll_range(&mut self, low: u32, high: u32) -> u32 {
        (**self).roll_range(low, high)
    }

    #[inline]
    fn shuffle<T>(&mut self, items: &mut [T]) {
        (**self).shuffle(items);
    }
}
