use crate::config::{Bounds, SwarmConfig, PARTICLE_COUNT};
use crate::particle::{Goal, Particle};
use crate::rng::UniformSource;
use crate::Vector2D;

/// Best fitness seen by any particle since the last reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalBest {
    pub value: f64,
    pub index: usize,
    pub position: Vector2D,
}

impl GlobalBest {
    fn unset() -> Self {
        Self {
            value: f64::INFINITY,
            index: 0,
            position: Vector2D::zero(),
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.is_finite()
    }
}

/// A fixed-capacity particle swarm
///
/// The capacity `N` is the particle count; index order decides ties for the
/// global best and the pair order of the repulsion pass.
#[derive(Debug, Clone)]
pub struct Swarm<const N: usize> {
    pub particles: heapless::Vec<Particle, N>,
    pub config: SwarmConfig,
    pub bounds: Bounds,
    best: GlobalBest,
}

pub type StandardSwarm = Swarm<PARTICLE_COUNT>;

impl<const N: usize> Swarm<N> {
    pub fn new(bounds: Bounds, config: SwarmConfig) -> Self {
        Self {
            particles: heapless::Vec::new(),
            config,
            bounds,
            best: GlobalBest::unset(),
        }
    }

    /// Creates a swarm filled to capacity with randomly placed particles.
    pub fn random<R: UniformSource + ?Sized>(
        rng: &mut R,
        bounds: Bounds,
        config: SwarmConfig,
    ) -> Self {
        let mut swarm = Self::new(bounds, config);
        while !swarm.particles.is_full() {
            let _ = swarm.particles.push(Particle::random(rng, bounds));
        }
        log::debug!("spawned {} particles in {}x{}", N, bounds.width, bounds.height);
        swarm
    }

    pub fn add_particle(&mut self, particle: Particle) -> Result<(), Particle> {
        self.particles.push(particle)
    }

    pub fn global_best(&self) -> &GlobalBest {
        &self.best
    }

    pub fn global_best_particle(&self) -> Option<&Particle> {
        self.particles.iter().find(|p| p.is_global_best)
    }

    /// Runs one frame: best tracking, velocity, position, then repulsion.
    pub fn step<R: UniformSource + ?Sized>(&mut self, goal: &Goal, rng: &mut R) {
        self.update_bests(goal);
        self.update_velocity(rng);
        self.update_position();
        self.enforce_minimum_distance();
    }

    /// Evaluates every particle against `goal` and marks the global best.
    pub fn update_bests(&mut self, goal: &Goal) {
        let previous = self.best.index;

        for (index, particle) in self.particles.iter_mut().enumerate() {
            let fitness = goal.fitness(particle.position);
            particle.record_fitness(fitness);

            if fitness < self.best.value {
                self.best = GlobalBest {
                    value: fitness,
                    index,
                    position: particle.position,
                };
            }
        }

        // marking waits for the scan so only the final index is flagged
        let best_index = self.best.index;
        for (index, particle) in self.particles.iter_mut().enumerate() {
            particle.is_global_best = index == best_index;
        }

        if best_index != previous {
            log::trace!("global best moved to particle {} ({:.3})", best_index, self.best.value);
        }
    }

    pub fn update_velocity<R: UniformSource + ?Sized>(&mut self, rng: &mut R) {
        let config = self.config;
        let target = self.best.position;

        for particle in self.particles.iter_mut() {
            let r1 = rng.next_unit();
            let r2 = rng.next_unit();

            particle.velocity = particle.velocity * config.inertia;
            particle.velocity +=
                (particle.personal_best_position - particle.position) * (config.cognitive * r1);

            // The leader does not chase itself
            if !particle.is_global_best {
                particle.velocity += (target - particle.position) * (config.social * r2);
            }

            let wobble = Vector2D::new(
                (rng.next_unit() - 0.5) * 0.5 * config.jitter,
                (rng.next_unit() - 0.5) * 0.5 * config.jitter,
            );
            particle.velocity += wobble;

            particle.limit_speed(config.speed_limit);
            debug_assert!(
                particle.velocity.is_finite(),
                "non-finite velocity {:?}",
                particle.velocity
            );
        }
    }

    pub fn update_position(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.integrate(self.bounds, self.config.restitution);
        }
    }

    /// Pushes apart every pair closer than `min_separation`.
    ///
    /// Single pass over pairs in index order. Exactly coincident particles
    /// have no separation direction and are left alone.
    pub fn enforce_minimum_distance(&mut self) {
        let min_dist = self.config.min_separation;
        let count = self.particles.len();

        for i in 0..count {
            for j in (i + 1)..count {
                let offset = self.particles[i].position - self.particles[j].position;
                let distance = offset.magnitude();

                if distance > 0.0 && distance < min_dist {
                    let overlap = (min_dist - distance) / 2.0;
                    let push = offset / distance * overlap;
                    self.particles[i].position += push;
                    self.particles[j].position -= push;
                }
            }
        }
    }

    /// Forgets all personal bests and the global best.
    ///
    /// Called when the goal is relocated so the next `update_bests` re-anchors
    /// every particle on its current fitness.
    pub fn reset_bests(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.reset_personal_best();
        }
        self.best.value = f64::INFINITY;
        log::debug!("personal and global bests reset");
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = Bounds::new(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Lcg;

    const EPS: f64 = 1e-9;

    fn still(x: f64, y: f64) -> Particle {
        Particle::new(Vector2D::new(x, y), Vector2D::zero(), 0)
    }

    fn goal_at(x: f64, y: f64) -> Goal {
        Goal::new(Vector2D::new(x, y), 20.0)
    }

    fn random_swarm(seed: u64) -> (Swarm<16>, Lcg) {
        let mut rng = Lcg::new(seed);
        let swarm = Swarm::random(&mut rng, Bounds::new(400.0, 300.0), SwarmConfig::default());
        (swarm, rng)
    }

    #[test]
    fn test_swarm_creation() {
        let (swarm, _) = random_swarm(1);
        assert_eq!(swarm.particles.len(), 16);
        assert!(!swarm.global_best().is_set());
        assert!(swarm.particles.iter().all(|p| p.personal_best == f64::INFINITY));
    }

    #[test]
    fn test_add_particle_rejects_when_full() {
        let mut swarm: Swarm<1> = Swarm::new(Bounds::default(), SwarmConfig::default());
        assert!(swarm.add_particle(still(1.0, 1.0)).is_ok());

        let rejected = swarm.add_particle(still(2.0, 2.0));
        assert_eq!(rejected, Err(still(2.0, 2.0)));
    }

    #[test]
    fn test_update_bests_marks_single_closest_particle() {
        let mut swarm: Swarm<3> = Swarm::new(Bounds::default(), SwarmConfig::default());
        for p in [still(50.0, 0.0), still(10.0, 0.0), still(30.0, 0.0)] {
            swarm.add_particle(p).unwrap();
        }

        swarm.update_bests(&goal_at(0.0, 0.0));

        let flagged: Vec<bool> = swarm.particles.iter().map(|p| p.is_global_best).collect();
        assert_eq!(flagged, vec![false, true, false]);
        assert_eq!(swarm.global_best().index, 1);
        assert_eq!(swarm.global_best().value, 10.0);
        assert_eq!(swarm.global_best().position, Vector2D::new(10.0, 0.0));
        assert_eq!(swarm.global_best_particle(), Some(&swarm.particles[1]));
    }

    #[test]
    fn test_update_bests_tie_goes_to_lowest_index() {
        let mut swarm: Swarm<2> = Swarm::new(Bounds::default(), SwarmConfig::default());
        swarm.add_particle(still(0.0, 10.0)).unwrap();
        swarm.add_particle(still(10.0, 0.0)).unwrap();

        swarm.update_bests(&goal_at(0.0, 0.0));

        assert_eq!(swarm.global_best().index, 0);
        assert!(swarm.particles[0].is_global_best);
        assert!(!swarm.particles[1].is_global_best);
    }

    #[test]
    fn test_global_best_survives_particle_moving_away() {
        let mut swarm: Swarm<2> = Swarm::new(Bounds::default(), SwarmConfig::default());
        swarm.add_particle(still(5.0, 0.0)).unwrap();
        swarm.add_particle(still(50.0, 0.0)).unwrap();
        let goal = goal_at(0.0, 0.0);

        swarm.update_bests(&goal);
        swarm.particles[0].position = Vector2D::new(80.0, 0.0);
        swarm.update_bests(&goal);

        assert_eq!(swarm.global_best().value, 5.0);
        assert_eq!(swarm.global_best().index, 0);
        assert!(swarm.particles[0].is_global_best);
        assert_eq!(swarm.particles[0].personal_best_position, Vector2D::new(5.0, 0.0));
    }

    #[test]
    fn test_exactly_one_global_best_every_frame() {
        let (mut swarm, mut rng) = random_swarm(42);
        let goal = goal_at(100.0, 150.0);

        for _ in 0..100 {
            swarm.update_bests(&goal);
            assert_eq!(swarm.particles.iter().filter(|p| p.is_global_best).count(), 1);

            let min_personal = swarm
                .particles
                .iter()
                .map(|p| p.personal_best)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(swarm.global_best().value, min_personal);

            swarm.update_velocity(&mut rng);
            swarm.update_position();
            swarm.enforce_minimum_distance();
        }
    }

    #[test]
    fn test_bests_are_monotonic_without_reset() {
        let (mut swarm, mut rng) = random_swarm(7);
        let goal = goal_at(200.0, 100.0);

        swarm.step(&goal, &mut rng);
        let mut last_global = swarm.global_best().value;
        let mut last_personal: Vec<f64> = swarm.particles.iter().map(|p| p.personal_best).collect();

        for _ in 0..200 {
            swarm.step(&goal, &mut rng);
            assert!(swarm.global_best().value <= last_global);
            for (p, last) in swarm.particles.iter().zip(last_personal.iter()) {
                assert!(p.personal_best <= *last);
            }
            last_global = swarm.global_best().value;
            last_personal = swarm.particles.iter().map(|p| p.personal_best).collect();
        }
    }

    #[test]
    fn test_reset_reanchors_on_current_fitness() {
        let (mut swarm, mut rng) = random_swarm(11);
        let goal = goal_at(50.0, 50.0);
        for _ in 0..20 {
            swarm.step(&goal, &mut rng);
        }

        let moved = goal_at(350.0, 250.0);
        swarm.reset_bests();
        assert!(!swarm.global_best().is_set());
        assert!(swarm.particles.iter().all(|p| p.personal_best == f64::INFINITY));

        swarm.update_bests(&moved);
        for p in swarm.particles.iter() {
            assert_eq!(p.personal_best, moved.fitness(p.position));
            assert_eq!(p.personal_best_position, p.position);
        }
        let closest = swarm
            .particles
            .iter()
            .map(|p| moved.fitness(p.position))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(swarm.global_best().value, closest);
    }

    #[test]
    fn test_velocity_respects_speed_limit() {
        let (mut swarm, mut rng) = random_swarm(5);
        let goal = goal_at(10.0, 10.0);
        let limit = swarm.config.speed_limit;

        for _ in 0..50 {
            swarm.update_bests(&goal);
            swarm.update_velocity(&mut rng);
            for p in swarm.particles.iter() {
                assert!(p.velocity.magnitude() <= limit + EPS);
            }
            swarm.update_position();
            swarm.enforce_minimum_distance();
        }
    }

    #[test]
    fn test_fast_leader_is_clamped_along_its_heading() {
        let mut swarm: Swarm<1> = Swarm::new(Bounds::default(), SwarmConfig::default());
        let mut particle = still(100.0, 100.0);
        particle.velocity = Vector2D::new(100.0, 0.0);
        swarm.add_particle(particle).unwrap();
        swarm.update_bests(&goal_at(100.0, 100.0));

        swarm.update_velocity(&mut Lcg::new(3));

        let velocity = swarm.particles[0].velocity;
        assert!((velocity.magnitude() - 8.0).abs() < EPS);
        let heading = velocity.normalize();
        assert!((heading.x - 1.0).abs() < 1e-6);
        assert!(heading.y.abs() < 1e-3);
    }

    #[test]
    fn test_leader_ignores_social_pull() {
        let mut config = SwarmConfig::default();
        config.jitter = 0.0;
        let mut swarm: Swarm<2> = Swarm::new(Bounds::default(), config);
        swarm.add_particle(still(10.0, 10.0)).unwrap();
        swarm.add_particle(still(300.0, 300.0)).unwrap();
        swarm.update_bests(&goal_at(0.0, 0.0));

        swarm.update_velocity(&mut Lcg::new(9));

        // both sit on their personal best, only the follower feels a pull
        assert_eq!(swarm.particles[0].velocity, Vector2D::zero());
        let follower = swarm.particles[1].velocity;
        assert!(follower.x <= 0.0 && follower.y <= 0.0);
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let (mut swarm, mut rng) = random_swarm(21);
        let goal = goal_at(0.0, 0.0);

        for _ in 0..100 {
            swarm.update_bests(&goal);
            swarm.update_velocity(&mut rng);
            swarm.update_position();
            for p in swarm.particles.iter() {
                assert!(p.position.x >= 0.0 && p.position.x <= swarm.bounds.width);
                assert!(p.position.y >= 0.0 && p.position.y <= swarm.bounds.height);
            }
            swarm.enforce_minimum_distance();
        }
    }

    #[test]
    fn test_repulsion_separates_pair_symmetrically() {
        let mut swarm: Swarm<2> = Swarm::new(Bounds::default(), SwarmConfig::default());
        swarm.add_particle(still(0.0, 0.0)).unwrap();
        swarm.add_particle(still(5.0, 0.0)).unwrap();
        swarm.update_bests(&goal_at(100.0, 0.0));

        swarm.enforce_minimum_distance();

        let a = swarm.particles[0].position;
        let b = swarm.particles[1].position;
        assert!((a.x + 7.5).abs() < EPS && a.y.abs() < EPS);
        assert!((b.x - 12.5).abs() < EPS && b.y.abs() < EPS);
        assert!((a.distance(&b) - 20.0).abs() < EPS);
    }

    #[test]
    fn test_repulsion_skips_coincident_and_distant_pairs() {
        let mut swarm: Swarm<3> = Swarm::new(Bounds::default(), SwarmConfig::default());
        swarm.add_particle(still(40.0, 40.0)).unwrap();
        swarm.add_particle(still(40.0, 40.0)).unwrap();
        swarm.add_particle(still(200.0, 40.0)).unwrap();

        swarm.enforce_minimum_distance();

        assert_eq!(swarm.particles[0].position, Vector2D::new(40.0, 40.0));
        assert_eq!(swarm.particles[1].position, Vector2D::new(40.0, 40.0));
        assert_eq!(swarm.particles[2].position, Vector2D::new(200.0, 40.0));
    }

    #[test]
    fn test_repulsion_small_group_single_pass() {
        let mut swarm: Swarm<3> = Swarm::new(Bounds::default(), SwarmConfig::default());
        swarm.add_particle(still(100.0, 100.0)).unwrap();
        swarm.add_particle(still(110.0, 100.0)).unwrap();
        swarm.add_particle(still(400.0, 400.0)).unwrap();

        swarm.enforce_minimum_distance();

        for i in 0..3 {
            for j in (i + 1)..3 {
                let d = swarm.particles[i].position.distance(&swarm.particles[j].position);
                assert!(d >= 20.0 - EPS, "pair ({}, {}) at {}", i, j, d);
            }
        }
    }

    #[test]
    fn test_step_moves_swarm_toward_goal() {
        let (mut swarm, mut rng) = random_swarm(123);
        let goal = goal_at(200.0, 150.0);

        swarm.step(&goal, &mut rng);
        let first = swarm.global_best().value;
        for _ in 0..300 {
            swarm.step(&goal, &mut rng);
        }

        assert!(swarm.global_best().value <= first);
        assert_eq!(swarm.particles.iter().filter(|p| p.is_global_best).count(), 1);
    }

    #[test]
    fn test_resize_changes_bounds() {
        let (mut swarm, _) = random_swarm(2);
        swarm.resize(50.0, 60.0);
        assert_eq!(swarm.bounds, Bounds::new(50.0, 60.0));
    }
}
