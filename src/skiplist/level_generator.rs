// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::Rng;

use crate::config::Config;

/// Upon the insertion of a new key in the list, the node is replicated to
/// higher levels with a certain probability as determined by a
/// `LevelGenerator`.
pub trait LevelGenerator {
    /// The tallest tower this generator will ever hand out.
    fn total(&self) -> usize;
    /// Generate a tower height for a new node in the range `[1, total]`.
    ///
    /// This must never return `0` or a height that is `> self.total()`.
    fn random(&mut self) -> usize;
}

/// A level generator which will produce geometrically distributed heights.
///
/// Starting from a height of one, each extra level is granted with probability
/// `1/b`, so `P(height >= k) = b^-(k-1)`, truncated at the maximum height.
#[derive(Debug)]
pub struct GeometricalLevelGenerator<R> {
    total: usize,
    p: f64,
    rng: R,
}

impl<R: Rng> GeometricalLevelGenerator<R> {
    /// Create a generator from an already validated config, drawing from `rng`.
    pub fn new(config: &Config, rng: R) -> Self {
        GeometricalLevelGenerator {
            total: config.max_tower_height(),
            p: config.promotion_probability(),
            rng,
        }
    }
}

impl<R: Rng> LevelGenerator for GeometricalLevelGenerator<R> {
    fn random(&mut self) -> usize {
        let mut h = 1;
        while h < self.total && self.rng.gen::<f64>() < self.p {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use rand::{
        rngs::SmallRng,
        SeedableRng,
    };

    use super::{
        GeometricalLevelGenerator,
        LevelGenerator,
    };
    use crate::config::Config;

    fn generator(base: f64, height: usize, seed: u64) -> GeometricalLevelGenerator<SmallRng> {
        let config = Config::new(base)
            .unwrap()
            .with_max_tower_height(height)
            .unwrap();
        GeometricalLevelGenerator::new(&config, SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn test_heights_in_range() {
        let mut gen = generator(2.0, 6, 7);
        assert_eq!(gen.total(), 6);
        for _ in 0..10_000 {
            let h = gen.random();
            assert!((1..=6).contains(&h), "height {h} out of range");
        }
    }

    #[test]
    fn test_single_level() {
        let mut gen = generator(1.01, 1, 3);
        for _ in 0..1_000 {
            assert_eq!(gen.random(), 1);
        }
    }

    #[test]
    fn test_geometric_distribution() {
        const TRIALS: usize = 200_000;

        for base in [2.0_f64, 4.0] {
            let mut gen = generator(base, 32, 0xdead_beef);
            let mut at_least = [0usize; 5];
            for _ in 0..TRIALS {
                let h = gen.random();
                for (k, slot) in at_least.iter_mut().enumerate() {
                    if h > k {
                        *slot += 1;
                    }
                }
            }

            // at_least[k] counts heights >= k + 1
            for (k, &seen) in at_least.iter().enumerate() {
                let expected = base.powi(-(k as i32));
                let observed = seen as f64 / TRIALS as f64;
                assert!(
                    (observed - expected).abs() < 0.01,
                    "base {base}: P(h >= {}) = {observed}, expected {expected}",
                    k + 1
                );
            }
        }
    }
}
