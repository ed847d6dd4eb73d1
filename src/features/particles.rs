//! Background particle field.
//!
//! The headless half of the canvas background: particle positions,
//! velocities, bounds bouncing, mouse repulsion, and the session-storage
//! save/restore that makes the field survive page navigations. The host
//! owns the canvas and the animation loop; it calls [`ParticleField::step`]
//! per frame and draws `particles()` plus `links()`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::host::KeyValueStore;

/// Number of particles in the field.
pub const PARTICLE_COUNT: usize = 80;

/// Maximum distance at which two particles are linked by a line.
pub const LINK_DISTANCE: f64 = 150.0;

/// Radius of mouse influence.
const MOUSE_RADIUS: f64 = 100.0;

/// Repulsion strength per frame at zero distance.
const MOUSE_FORCE: f64 = 0.02;

/// Session-storage key for the saved field.
const STATE_KEY: &str = "particleSystemState";

/// One particle: position, velocity, radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

/// Saved field snapshot, JSON-compatible with what the site has always
/// written to session storage.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedState {
    particles: Vec<Particle>,
    canvas_width: f64,
    canvas_height: f64,
}

/// A link between two particles, with its line opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub opacity: f64,
}

/// The particle field.
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    mouse: Option<(f64, f64)>,
    rng: SmallRng,
}

impl ParticleField {
    /// Build a field for a canvas, restoring the saved state from the
    /// session store when one exists. Restored positions are scaled to
    /// the new canvas size; velocities are preserved so the animation
    /// continues seamlessly. Corrupt state falls back to a fresh field.
    pub fn new(width: f64, height: f64, store: &dyn KeyValueStore) -> Self {
        let mut field = Self::fresh(width, height);
        if let Some(restored) = restore(width, height, store) {
            field.particles = restored;
        }
        field
    }

    /// Build a fresh, randomized field.
    pub fn fresh(width: f64, height: f64) -> Self {
        Self::with_rng(width, height, SmallRng::from_entropy())
    }

    /// Build a fresh field from a fixed seed (deterministic, for tests).
    pub fn with_seed(width: f64, height: f64, seed: u64) -> Self {
        Self::with_rng(width, height, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(width: f64, height: f64, mut rng: SmallRng) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|_| random_particle(&mut rng, width, height))
            .collect();
        Self {
            particles,
            width,
            height,
            mouse: None,
            rng,
        }
    }

    /// Handle a canvas resize: restore-and-scale from the session store
    /// when possible, otherwise re-randomize for the new bounds.
    pub fn resize(&mut self, width: f64, height: f64, store: &dyn KeyValueStore) {
        self.width = width;
        self.height = height;
        self.particles = restore(width, height, store).unwrap_or_else(|| {
            (0..PARTICLE_COUNT)
                .map(|_| random_particle(&mut self.rng, width, height))
                .collect()
        });
    }

    /// Advance every particle one frame: move, bounce off the bounds,
    /// clamp, and apply mouse repulsion when a pointer is active.
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            if p.x < 0.0 || p.x > width {
                p.vx = -p.vx;
            }
            if p.y < 0.0 || p.y > height {
                p.vy = -p.vy;
            }

            p.x = p.x.clamp(0.0, width);
            p.y = p.y.clamp(0.0, height);

            if let Some((mx, my)) = self.mouse {
                let dx = mx - p.x;
                let dy = my - p.y;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance < MOUSE_RADIUS {
                    let angle = dy.atan2(dx);
                    let force = (MOUSE_RADIUS - distance) / MOUSE_RADIUS;
                    p.vx -= angle.cos() * force * MOUSE_FORCE;
                    p.vy -= angle.sin() * force * MOUSE_FORCE;
                }
            }
        }
    }

    /// Pointer entered or moved over the canvas.
    pub fn set_mouse(&mut self, x: f64, y: f64) {
        self.mouse = Some((x, y));
    }

    /// Pointer left the canvas.
    pub fn clear_mouse(&mut self) {
        self.mouse = None;
    }

    /// Save the field to the session store. Called periodically by the
    /// host and once more before any full-reload fallback.
    pub fn save_state(&self, store: &dyn KeyValueStore) {
        let state = SavedState {
            particles: self.particles.clone(),
            canvas_width: self.width,
            canvas_height: self.height,
        };
        if let Ok(serialized) = serde_json::to_string(&state) {
            store.set(STATE_KEY, &serialized);
        }
    }

    /// The particles, for drawing.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// All particle pairs within link distance, with line opacity
    /// falling off linearly to zero at [`LINK_DISTANCE`].
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                let dx = self.particles[i].x - self.particles[j].x;
                let dy = self.particles[i].y - self.particles[j].y;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance < LINK_DISTANCE {
                    links.push(Link {
                        a: i,
                        b: j,
                        opacity: (1.0 - distance / LINK_DISTANCE) * 0.3,
                    });
                }
            }
        }
        links
    }
}

fn random_particle(rng: &mut SmallRng, width: f64, height: f64) -> Particle {
    Particle {
        x: rng.r#gen::<f64>() * width,
        y: rng.r#gen::<f64>() * height,
        vx: (rng.r#gen::<f64>() - 0.5) * 0.5,
        vy: (rng.r#gen::<f64>() - 0.5) * 0.5,
        radius: rng.r#gen::<f64>() * 2.0 + 1.0,
    }
}

/// Restore particles from the session store, scaled to the new canvas.
fn restore(width: f64, height: f64, store: &dyn KeyValueStore) -> Option<Vec<Particle>> {
    let raw = store.get(STATE_KEY)?;
    let state: SavedState = serde_json::from_str(&raw).ok()?;
    if state.particles.is_empty() || state.canvas_width <= 0.0 || state.canvas_height <= 0.0 {
        return None;
    }

    let scale_x = width / state.canvas_width;
    let scale_y = height / state.canvas_height;
    Some(
        state
            .particles
            .into_iter()
            .map(|p| Particle {
                x: p.x * scale_x,
                y: p.y * scale_y,
                ..p
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryStore;

    #[test]
    fn test_fresh_field_in_bounds() {
        let field = ParticleField::with_seed(800.0, 600.0, 42);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        for p in field.particles() {
            assert!((0.0..=800.0).contains(&p.x));
            assert!((0.0..=600.0).contains(&p.y));
            assert!((1.0..=3.0).contains(&p.radius));
        }
    }

    #[test]
    fn test_step_keeps_particles_in_bounds() {
        let mut field = ParticleField::with_seed(200.0, 100.0, 1);
        for _ in 0..1000 {
            field.step();
        }
        for p in field.particles() {
            assert!((0.0..=200.0).contains(&p.x));
            assert!((0.0..=100.0).contains(&p.y));
        }
    }

    #[test]
    fn test_mouse_repulsion_changes_velocity() {
        let mut field = ParticleField::with_seed(400.0, 400.0, 3);
        let before: Vec<f64> = field.particles().iter().map(|p| p.vx).collect();
        field.set_mouse(200.0, 200.0);
        field.step();
        let after: Vec<f64> = field.particles().iter().map(|p| p.vx).collect();
        // At least one particle sits within mouse radius of the center.
        assert!(before.iter().zip(&after).any(|(b, a)| b != a));
    }

    #[test]
    fn test_save_and_restore_scales_positions() {
        let store = MemoryStore::new();
        let field = ParticleField::with_seed(400.0, 300.0, 9);
        let first = field.particles()[0].clone();
        field.save_state(&store);

        // Restore at double the canvas size.
        let restored = ParticleField::new(800.0, 600.0, &store);
        let p = &restored.particles()[0];
        assert!((p.x - first.x * 2.0).abs() < 1e-9);
        assert!((p.y - first.y * 2.0).abs() < 1e-9);
        // Velocity preserved for seamless animation.
        assert_eq!(p.vx, first.vx);
        assert_eq!(p.vy, first.vy);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_fresh() {
        let store = MemoryStore::new();
        store.set(STATE_KEY, "{not json");
        let field = ParticleField::new(800.0, 600.0, &store);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_links_are_symmetric_pairs() {
        let field = ParticleField::with_seed(100.0, 100.0, 5);
        for link in field.links() {
            assert!(link.a < link.b);
            assert!(link.opacity > 0.0 && link.opacity <= 0.3);
        }
    }
}
