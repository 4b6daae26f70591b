/// Source of uniform random scalars in `[0.0, 1.0)`.
///
/// Every stochastic choice in the swarm (spawn position, initial velocity,
/// cognitive/social coefficients and jitter) is drawn through this trait.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[min, max)`
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }
}

#[cfg(feature = "std")]
impl<R: rand::RngCore> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        use rand::Rng;
        self.gen::<f64>()
    }
}

/// Small seeded linear congruential generator.
///
/// Used for reproducible runs and on targets without `rand`.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Generate next u64 value
    pub fn next_u64(&mut self) -> u64 {
        // Knuth's MMIX parameters
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;

        self.state = self.state.wrapping_mul(A).wrapping_add(C);
        self.state
    }
}

impl UniformSource for Lcg {
    fn next_unit(&mut self) -> f64 {
        // top 53 bits fill the mantissa exactly
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_repeatability() {
        let mut rng1 = Lcg::new(12345);
        let mut rng2 = Lcg::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_unit_range() {
        let mut rng = Lcg::new(12345);

        for _ in 0..1000 {
            let val = rng.next_unit();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = Lcg::new(0);
        let first = rng.next_u64();
        assert_ne!(first, rng.next_u64());
    }

    #[test]
    fn test_custom_range() {
        let mut rng = Lcg::new(7);
        for _ in 0..1000 {
            let val = rng.range(-0.5, 0.5);
            assert!((-0.5..0.5).contains(&val));
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_rand_rngs_are_sources() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let val = rng.next_unit();
        assert!((0.0..1.0).contains(&val));
    }
}
