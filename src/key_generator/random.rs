use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::iter::{ExactSizeIterator, FusedIterator};
use std::vec;

/// An iterator over the integers `0..num`, each one exactly once, in a random order
/// fully determined by `seed`
#[derive(Clone)]
pub struct RandomGenerator {
    keys: vec::IntoIter<i64>,
}

impl RandomGenerator {
    pub fn new(num: usize, seed: u64) -> RandomGenerator {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut keys: Vec<i64> = (0..num as i64).collect();
        keys.shuffle(&mut rng);
        RandomGenerator {
            keys: keys.into_iter(),
        }
    }
}

impl Iterator for RandomGenerator {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl FusedIterator for RandomGenerator {}

impl ExactSizeIterator for RandomGenerator {}

/// An iterator that will generate `num` random floats uniformly drawn from `[0, scale)`
#[derive(Clone)]
pub struct FloatGenerator {
    remaining: usize,
    scale: f64,
    rng: Pcg64,
}

impl FloatGenerator {
    pub fn new(num: usize, scale: f64, seed: u64) -> FloatGenerator {
        FloatGenerator {
            remaining: num,
            scale,
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Iterator for FloatGenerator {
    type Item = OrderedFloat<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value: f64 = self.rng.gen();
        Some(OrderedFloat(value * self.scale))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl FusedIterator for FloatGenerator {}

impl ExactSizeIterator for FloatGenerator {}
