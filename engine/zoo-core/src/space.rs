//! Observation, action and reward spaces
//!
//! Spaces describe the shape and bounds of the values an environment
//! produces or accepts. A `SeededSpace` additionally owns a deterministic
//! RNG so that `random_action` streams can be reproduced from a seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Exp1, StandardNormal};

/// Space variants
#[derive(Debug, Clone, PartialEq)]
pub enum Space {
    /// Integers in `0..n`
    Discrete { n: u32 },
    /// Real-valued vector with per-component bounds (may be infinite)
    Box {
        low: Vec<f32>,
        high: Vec<f32>,
        shape: Vec<usize>,
    },
}

impl Space {
    pub fn discrete(n: u32) -> Self {
        Space::Discrete { n }
    }

    /// Build a box space; `low` and `high` must have the same length.
    pub fn bounded(low: Vec<f32>, high: Vec<f32>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        let shape = vec![low.len()];
        Space::Box { low, high, shape }
    }

    /// Number of discrete actions, if this is a discrete space
    pub fn n(&self) -> Option<u32> {
        match self {
            Space::Discrete { n } => Some(*n),
            Space::Box { .. } => None,
        }
    }

    /// Flat number of components a sample from this space has
    pub fn flat_len(&self) -> usize {
        match self {
            Space::Discrete { .. } => 1,
            Space::Box { shape, .. } => shape.iter().product(),
        }
    }

    pub fn contains_discrete(&self, value: i64) -> bool {
        match self {
            Space::Discrete { n } => value >= 0 && value < *n as i64,
            Space::Box { .. } => false,
        }
    }

    pub fn contains(&self, values: &[f32]) -> bool {
        match self {
            Space::Discrete { .. } => false,
            Space::Box { low, high, .. } => {
                values.len() == low.len()
                    && values
                        .iter()
                        .zip(low.iter().zip(high.iter()))
                        .all(|(v, (lo, hi))| v >= lo && v <= hi)
            }
        }
    }
}

/// A value drawn from a space
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceSample {
    Discrete(i64),
    Box(Vec<f32>),
}

/// Space paired with its own sampling RNG
#[derive(Debug, Clone)]
pub struct SeededSpace {
    space: Space,
    rng: ChaCha20Rng,
}

impl SeededSpace {
    /// Wrap a space; the sampler starts from seed 0.
    pub fn new(space: Space) -> Self {
        Self {
            space,
            rng: ChaCha20Rng::seed_from_u64(0),
        }
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }

    pub fn sample(&mut self) -> SpaceSample {
        match &self.space {
            Space::Discrete { n } => SpaceSample::Discrete(self.rng.gen_range(0..*n as i64)),
            Space::Box { low, high, .. } => {
                let values = low
                    .iter()
                    .zip(high.iter())
                    .map(|(&lo, &hi)| sample_component(&mut self.rng, lo, hi))
                    .collect();
                SpaceSample::Box(values)
            }
        }
    }
}

fn sample_component(rng: &mut ChaCha20Rng, low: f32, high: f32) -> f32 {
    match (low.is_finite(), high.is_finite()) {
        (true, true) if low < high => rng.gen_range(low..high),
        (true, true) => low,
        (false, false) => rng.sample::<f32, _>(StandardNormal),
        (true, false) => low + rng.sample::<f32, _>(Exp1),
        (false, true) => high - rng.sample::<f32, _>(Exp1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_contains() {
        let space = Space::discrete(2);
        assert!(space.contains_discrete(0));
        assert!(space.contains_discrete(1));
        assert!(!space.contains_discrete(2));
        assert!(!space.contains_discrete(-1));
        assert_eq!(space.n(), Some(2));
    }

    #[test]
    fn test_box_contains_with_infinite_bounds() {
        let space = Space::bounded(
            vec![-4.8, f32::NEG_INFINITY],
            vec![4.8, f32::INFINITY],
        );
        assert!(space.contains(&[0.0, 1e30]));
        assert!(!space.contains(&[5.0, 0.0]));
        assert!(!space.contains(&[0.0]));
        assert_eq!(space.flat_len(), 2);
        assert_eq!(space.n(), None);
    }

    #[test]
    fn test_discrete_sampling_is_seeded() {
        let mut a = SeededSpace::new(Space::discrete(2));
        let mut b = SeededSpace::new(Space::discrete(2));
        a.seed(11);
        b.seed(11);
        let xs: Vec<_> = (0..32).map(|_| a.sample()).collect();
        let ys: Vec<_> = (0..32).map(|_| b.sample()).collect();
        assert_eq!(xs, ys);
        for x in xs {
            match x {
                SpaceSample::Discrete(v) => assert!((0..2).contains(&v)),
                other => panic!("unexpected sample {:?}", other),
            }
        }
    }

    #[test]
    fn test_box_sampling_respects_bounds() {
        let mut space = SeededSpace::new(Space::bounded(
            vec![0.0, f32::NEG_INFINITY, 1.0, f32::NEG_INFINITY],
            vec![1.0, f32::INFINITY, f32::INFINITY, -1.0],
        ));
        for _ in 0..100 {
            let SpaceSample::Box(values) = space.sample() else {
                panic!("expected a box sample");
            };
            assert!((0.0..1.0).contains(&values[0]));
            assert!(values[1].is_finite());
            assert!(values[2] >= 1.0);
            assert!(values[3] <= -1.0);
        }
    }
}
