//! Vertex lighting demo
//!
//! Runs a headless lighting session: a handful of lamps around a town square
//! and some villagers wandering between them. Halfway through, the scene
//! switches from day to night and a villager takes a hit. Per-tick statistics
//! and the villagers' colours are logged; run with `RUST_LOG=info` (or
//! `debug`) to see them.
//!
//! Usage: `lighting_demo [scene.toml|scene.ron]`

use rand::Rng;
use vertex_lighting::foundation::logging;
use vertex_lighting::prelude::*;

const TICKS: u32 = 600;
const DELTA_TIME: f32 = 1.0 / 60.0;
const SQUARE_HALF_EXTENT: f32 = 12.0;
const WALK_SPEED: f32 = 1.5;

/// A villager walking towards a random point on the square
struct Wanderer {
    key: LitObjectKey,
    mesh: SharedMesh,
    position: Vec3,
    target: Vec3,
}

impl Wanderer {
    fn step(&mut self, rng: &mut impl Rng, delta_time: f32) {
        let to_target = self.target - self.position;
        let distance = to_target.norm();
        let stride = WALK_SPEED * delta_time;

        if distance <= stride {
            self.position = self.target;
            self.target = random_point(rng);
        } else {
            self.position += to_target * (stride / distance);
        }
    }
}

fn random_point(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-SQUARE_HALF_EXTENT..SQUARE_HALF_EXTENT),
        0.0,
        rng.gen_range(-SQUARE_HALF_EXTENT..SQUARE_HALF_EXTENT),
    )
}

fn default_scene() -> SceneConfig {
    SceneConfig::default()
        .with_variant(
            SceneVariant::new(TimeIndex::Day, VertexColor::new(190, 185, 170))
                .with_lightmaps(["lightmaps/square_day_0", "lightmaps/square_day_1"]),
        )
        .with_variant(
            SceneVariant::new(TimeIndex::Night, VertexColor::new(35, 40, 70))
                .with_lightmaps(["lightmaps/square_night_0"]),
        )
}

struct LightingDemo {
    session: LightingSession,
    wanderers: Vec<Wanderer>,
    torches: Vec<DependentObjectKey>,
}

impl LightingDemo {
    fn new(config: SceneConfig) -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Creating lighting session...");
        let session = LightingSession::with_config(config)?;
        Ok(Self {
            session,
            wanderers: Vec::new(),
            torches: Vec::new(),
        })
    }

    fn populate(&mut self, rng: &mut impl Rng) -> Result<(), Box<dyn std::error::Error>> {
        let lamps = [
            (Vec3::new(-8.0, 3.0, -8.0), VertexColor::new(255, 190, 110), 7.0),
            (Vec3::new(8.0, 3.0, -8.0), VertexColor::new(255, 190, 110), 7.0),
            (Vec3::new(0.0, 4.0, 6.0), VertexColor::new(120, 160, 255), 9.0),
        ];
        for (position, color, radius) in lamps {
            let lamp = self.session.add_light(VertexLight::new(position, color, radius))?;
            self.session.register_light(lamp);
        }

        for index in 0..2 {
            let torch = self
                .session
                .register_variant_dependent_object(VariantDependentObject::new([TimeIndex::Night]))?;
            log::debug!("Torch {} tracked as {:?}", index, torch);
            self.torches.push(torch);
        }

        for index in 0..6 {
            let mesh = VertexMesh::new(format!("villager_{index}_body"), 32).shared();
            let hat = VertexMesh::new(format!("villager_{index}_hat"), 12).shared();
            let position = random_point(rng);

            let mut villager = LitObject::new(format!("villager_{index}"), LitObjectFlags::HAS_DAMAGE_EFFECT)
                .with_position(position);
            villager.bake(&[MeshNode::lit(mesh.clone()), MeshNode::lit(hat)])?;

            let key = self.session.add_lit_object(villager)?;
            self.session.register_lit_object(key);
            self.wanderers.push(Wanderer {
                key,
                mesh,
                position,
                target: random_point(rng),
            });
        }

        log::info!(
            "Queued {} lights and {} lit objects until a variant is selected",
            self.session.pending_light_count(),
            self.session.pending_lit_object_count()
        );
        Ok(())
    }

    fn run(&mut self, rng: &mut impl Rng) -> Result<(), Box<dyn std::error::Error>> {
        let change = self.session.set_variant(TimeIndex::Day)?;
        log::info!("Bind lightmaps {:?}", change.lightmap_paths);

        let mut painted = 0;
        let mut suppressed = 0;
        let mut steady = 0;

        for tick in 0..TICKS {
            if tick == TICKS / 2 {
                let change = self.session.set_variant(TimeIndex::Night)?;
                log::info!("Bind lightmaps {:?}", change.lightmap_paths);
                self.log_torches();

                if let Some(victim) = self.wanderers.first() {
                    let flashed = self.session.trigger_damage_effect(victim.key)?;
                    log::info!("Villager hit, flash started: {}", flashed);
                }
            }

            for wanderer in &mut self.wanderers {
                wanderer.step(rng, DELTA_TIME);
                self.session.set_position(wanderer.key, wanderer.position)?;
            }

            let report = self.session.tick(DELTA_TIME);
            painted += report.painted;
            suppressed += report.suppressed;
            steady += report.steady;

            for error in self.session.take_diagnostics() {
                log::warn!("Lighting diagnostic: {}", error);
            }

            if tick % 60 == 0 {
                self.log_colours(tick);
            }
        }

        log::info!(
            "{} ticks: {} repaints, {} suppressed as imperceptible, {} skipped as steady",
            TICKS,
            painted,
            suppressed,
            steady
        );
        Ok(())
    }

    fn log_colours(&self, tick: u32) {
        for wanderer in &self.wanderers {
            let Ok(mesh) = wanderer.mesh.read() else {
                continue;
            };
            let color = mesh.colors().first().copied().unwrap_or_default();
            log::debug!(
                "tick {:>3} {:<16} at ({:>6.2}, {:>6.2}) colour {:?}",
                tick,
                mesh.name(),
                wanderer.position.x,
                wanderer.position.z,
                color.to_array()
            );
        }
    }

    fn log_torches(&self) {
        for torch in &self.torches {
            if let Some(object) = self.session.variant_dependent_object(*torch) {
                log::info!("Torch {:?} active: {}", torch, object.is_active());
            }
        }
    }

    fn shutdown(&mut self) {
        self.session.release();
        // Owners outliving the session may still unregister safely
        for wanderer in &self.wanderers {
            self.session.unregister_lit_object(wanderer.key);
        }
        log::info!("Lighting session released");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene configuration from {}", path);
            SceneConfig::load_from_file(&path)?
        }
        None => default_scene(),
    };

    let mut rng = rand::thread_rng();
    let mut demo = LightingDemo::new(config)?;
    demo.populate(&mut rng)?;
    demo.run(&mut rng)?;
    demo.shutdown();
    Ok(())
}
