//! Sources of standard normal variates.

use rand::rngs::ThreadRng;
use rand_distr::{Distribution, StandardNormal};

/// Anything that can fill a buffer with independent N(0, 1) draws.
///
/// The simulator consumes draws in a fixed order, so a deterministic source
/// yields bit-identical paths.
pub trait NormalSource {
    /// Overwrite every element of `buffer` with a fresh draw.
    fn fill_normal(&mut self, buffer: &mut [f64]);
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        (**self).fill_normal(buffer)
    }
}

/// Draws from the calling thread's process-wide generator.
///
/// Not reproducible; use [`PricerRng`](super::PricerRng) when runs must be
/// replayed.
#[derive(Debug, Clone)]
pub struct ThreadRngSource {
    inner: ThreadRng,
}

impl ThreadRngSource {
    /// Source bound to the current thread's generator.
    pub fn new() -> Self {
        Self {
            inner: rand::thread_rng(),
        }
    }
}

impl Default for ThreadRngSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalSource for ThreadRngSource {
    #[inline]
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(f64);

    impl NormalSource for Counter {
        fn fill_normal(&mut self, buffer: &mut [f64]) {
            for value in buffer.iter_mut() {
                *value = self.0;
                self.0 += 1.0;
            }
        }
    }

    fn draw<S: NormalSource>(mut source: S, buffer: &mut [f64]) {
        source.fill_normal(buffer);
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut counter = Counter(0.0);
        let mut buffer = [0.0; 3];
        draw(&mut counter, &mut buffer);
        assert_eq!(buffer, [0.0, 1.0, 2.0]);
        assert_eq!(counter.0, 3.0);
    }

    #[test]
    fn test_thread_rng_fills_finite_values() {
        let mut source = ThreadRngSource::new();
        let mut buffer = vec![f64::NAN; 128];
        source.fill_normal(&mut buffer);
        assert!(buffer.iter().all(|x| x.is_finite()));
    }
}
