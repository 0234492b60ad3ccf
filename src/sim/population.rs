// population.rs - Live particles of one level
//
// Membership is purely positional: a particle leaves only by falling off
// the bottom of the canvas, whatever its load state.

use super::{EnvironmentType, Particle, ParticleId};
use crate::config::Config;
use crate::render::{Canvas, Surface};

pub struct Population {
    particles: Vec<Particle>,

    // Sheet decodes the host has not been asked for yet
    requests: Vec<ParticleId>,

    next_id: ParticleId,
    capacity: Option<usize>,

    // Lifetime counters
    spawned: u64,
    culled: u64,
}

impl Population {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            particles: Vec::new(),
            requests: Vec::new(),
            next_id: 0,
            capacity,
            spawned: 0,
            culled: 0,
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.requests.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn culled(&self) -> u64 {
        self.culled
    }

    /// Rolls once against `config.spawn_probability` and spawns on a hit.
    /// A zero probability never spawns.
    pub fn maybe_spawn(
        &mut self,
        kind: EnvironmentType,
        config: &Config,
        canvas: Canvas,
        rng: &mut fastrand::Rng,
    ) -> Option<ParticleId> {
        if config.spawn_probability == 0 || rng.u32(..config.spawn_probability) != 0 {
            return None;
        }
        self.spawn(kind, config, canvas, rng)
    }

    /// Adds one particle at the top of the canvas and queues its sheet decode.
    pub fn spawn(
        &mut self,
        kind: EnvironmentType,
        config: &Config,
        canvas: Canvas,
        rng: &mut fastrand::Rng,
    ) -> Option<ParticleId> {
        if self.capacity.is_some_and(|cap| self.particles.len() >= cap) {
            log::trace!("population at capacity, spawn skipped");
            return None;
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        self.particles.push(Particle::new(id, kind, config, canvas, rng));
        self.requests.push(id);
        self.spawned += 1;
        Some(id)
    }

    /// Advance every particle, then drop the ones below the cull line.
    pub fn update(&mut self, surface: &mut dyn Surface, canvas: Canvas, margin: f64) {
        let before = self.particles.len();

        self.particles.retain_mut(|p| {
            p.advance(surface, canvas);
            p.y <= canvas.height + p.size + margin
        });

        self.culled += (before - self.particles.len()) as u64;
    }

    /// Particles spawned since the last call, in spawn order.
    pub fn take_requests(&mut self) -> Vec<ParticleId> {
        std::mem::take(&mut self.requests)
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id == id)
    }

    // Decode results for particles that were already culled are dropped.

    pub fn on_decoded(&mut self, id: ParticleId, width: u32, height: u32) -> bool {
        self.get_mut(id).map(|p| p.on_decoded(width, height)).is_some()
    }

    pub fn on_decode_failed(&mut self, id: ParticleId) -> bool {
        self.get_mut(id).map(Particle::on_decode_failed).is_some()
    }

    pub fn on_draw_failed(&mut self, id: ParticleId) -> bool {
        self.get_mut(id).map(Particle::on_draw_failed).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Encoder;

    const CANVAS: Canvas = Canvas { width: 800.0, height: 600.0 };

    fn setup() -> (Population, Config, fastrand::Rng) {
        (Population::new(None), Config::default(), fastrand::Rng::with_seed(42))
    }

    #[test]
    fn cull_line_is_exclusive() {
        let (mut pop, config, mut rng) = setup();
        let keep = pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).unwrap();
        let gone = pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).unwrap();

        // Cull line sits at height + size + margin = 645
        pop.get_mut(keep).unwrap().y = 600.0 + 35.0 + 9.0;
        pop.get_mut(gone).unwrap().y = 600.0 + 35.0 + 11.0;

        pop.update(&mut Encoder::new(800, 600), CANVAS, config.cull_margin);

        let ids: Vec<ParticleId> = pop.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![keep]);
        assert_eq!(pop.culled(), 1);
    }

    #[test]
    fn culling_keeps_neighbours_in_order() {
        let (mut pop, config, mut rng) = setup();
        let ids: Vec<ParticleId> = (0..6)
            .map(|_| pop.spawn(EnvironmentType::Water, &config, CANVAS, &mut rng).unwrap())
            .collect();
        for id in [ids[1], ids[2], ids[4]] {
            pop.get_mut(id).unwrap().y = 10_000.0;
        }

        pop.update(&mut Encoder::new(800, 600), CANVAS, config.cull_margin);

        let left: Vec<ParticleId> = pop.iter().map(|p| p.id).collect();
        assert_eq!(left, vec![ids[0], ids[3], ids[5]]);
    }

    #[test]
    fn failed_particles_stay_until_they_fall_out() {
        let (mut pop, config, mut rng) = setup();
        let id = pop.spawn(EnvironmentType::Thunder, &config, CANVAS, &mut rng).unwrap();
        assert!(pop.on_decode_failed(id));

        let mut enc = Encoder::new(800, 600);
        pop.update(&mut enc, CANVAS, config.cull_margin);
        assert_eq!(pop.len(), 1);
        assert!(enc.is_empty());

        // 35 above the top down to 645: (645 + 35) / 0.8 = 850 frames
        for _ in 0..851 {
            pop.update(&mut enc, CANVAS, config.cull_margin);
        }
        assert!(pop.is_empty());
    }

    #[test]
    fn spawn_rate_converges() {
        let (mut pop, config, mut rng) = setup();
        let frames = 90_000;
        let mut hits = 0;
        for _ in 0..frames {
            if pop.maybe_spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).is_some() {
                hits += 1;
            }
            pop.clear();
        }
        let expected = frames as f64 / config.spawn_probability as f64;
        assert!((hits as f64 - expected).abs() < expected * 0.1, "{hits} spawns, expected ~{expected}");
    }

    #[test]
    fn probability_of_one_always_spawns() {
        let (mut pop, mut config, mut rng) = setup();
        config.spawn_probability = 1;
        for _ in 0..20 {
            assert!(pop.maybe_spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).is_some());
        }
        assert_eq!(pop.len(), 20);
    }

    #[test]
    fn uncapped_population_takes_every_hit() {
        let (mut pop, mut config, mut rng) = setup();
        config.spawn_probability = 1;
        for _ in 0..2_000 {
            assert!(pop.maybe_spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).is_some());
        }
        assert_eq!(pop.len(), 2_000);
    }

    #[test]
    fn zero_probability_never_spawns() {
        let (mut pop, mut config, mut rng) = setup();
        config.spawn_probability = 0;
        for _ in 0..100 {
            assert!(pop.maybe_spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).is_none());
        }
        assert_eq!(pop.spawned(), 0);
    }

    #[test]
    fn capacity_caps_spawns() {
        let (_, config, mut rng) = setup();
        let mut pop = Population::new(Some(2));
        assert!(pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).is_some());
        assert!(pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).is_some());
        assert!(pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).is_none());
        assert_eq!(pop.spawned(), 2);
    }

    #[test]
    fn requests_are_drained_once() {
        let (mut pop, config, mut rng) = setup();
        let a = pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).unwrap();
        let b = pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).unwrap();
        assert_eq!(pop.take_requests(), vec![a, b]);
        assert!(pop.take_requests().is_empty());
    }

    #[test]
    fn events_for_culled_particles_are_ignored() {
        let (mut pop, config, mut rng) = setup();
        let id = pop.spawn(EnvironmentType::Sakura, &config, CANVAS, &mut rng).unwrap();
        pop.get_mut(id).unwrap().y = 10_000.0;
        pop.update(&mut Encoder::new(800, 600), CANVAS, config.cull_margin);

        assert!(!pop.on_decoded(id, 282, 94));
        assert!(!pop.on_decode_failed(id));
        assert!(!pop.on_draw_failed(id));
    }

    #[test]
    fn decoded_particles_draw_every_frame() {
        let (mut pop, config, mut rng) = setup();
        for _ in 0..3 {
            let id = pop.spawn(EnvironmentType::Snowflake, &config, CANVAS, &mut rng).unwrap();
            pop.on_decoded(id, 94 * 8, 94);
        }
        let mut enc = Encoder::new(800, 600);
        pop.update(&mut enc, CANVAS, config.cull_margin);
        assert_eq!(enc.commands(), 3);
    }
}
