//! Particles, trails and color modes.
//!
//! Everything here is owned by the update loop. Lifetimes count frames, not
//! seconds: each `update_*` call is one frame.

use crate::config::{EffectsConfig, TiltConfig};
use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;
use std::collections::VecDeque;
use std::f64::consts::TAU;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub opacity: f32,
    pub remaining_life: i32,
    pub color: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrailPoint {
    pub position: Vec3,
    pub radius: f32,
    pub opacity: f32,
    pub remaining_life: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Normal,
    Rainbow,
    Danger,
}

impl ColorMode {
    pub fn next(self) -> Self {
        match self {
            ColorMode::Normal => ColorMode::Rainbow,
            ColorMode::Rainbow => ColorMode::Danger,
            ColorMode::Danger => ColorMode::Normal,
        }
    }

    pub fn index(self) -> usize {
        match self {
            ColorMode::Normal => 0,
            ColorMode::Rainbow => 1,
            ColorMode::Danger => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Normal => "Normal",
            ColorMode::Rainbow => "Rainbow 🌈",
            ColorMode::Danger => "Danger ⚠️",
        }
    }
}

/// Wall-clock source for time-driven colors.
pub trait Clock: Send {
    fn now_secs(&self) -> f64;
}

/// Seconds since construction.
pub struct SystemClock {
    start: instant::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: instant::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock frozen at a given instant.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_secs(&self) -> f64 {
        self.0
    }
}

pub struct EffectsManager {
    params: EffectsConfig,
    significant_movement: f32,
    particles: Vec<Particle>,
    trails: VecDeque<TrailPoint>,
    color_mode: ColorMode,
    frame_count: u64,
    /// Sum of per-frame |Δpitch| + |Δroll| since start or last reset.
    pub total_movement: f32,
    rng: StdRng,
    clock: Box<dyn Clock>,
}

impl EffectsManager {
    pub fn new(cfg: &TiltConfig, clock: Box<dyn Clock>) -> Self {
        let rng = match cfg.effects.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(cfg, rng, clock)
    }

    pub fn with_rng(cfg: &TiltConfig, rng: StdRng, clock: Box<dyn Clock>) -> Self {
        Self {
            params: cfg.effects.clone(),
            significant_movement: cfg.motion.significant_movement,
            particles: Vec::new(),
            trails: VecDeque::with_capacity(cfg.effects.trail_length + 1),
            color_mode: ColorMode::Normal,
            frame_count: 0,
            total_movement: 0.0,
            rng,
            clock,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Trail points, oldest first.
    pub fn trails(&self) -> impl ExactSizeIterator<Item = &TrailPoint> {
        self.trails.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trails.len()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_frame_count(&mut self) {
        self.frame_count += 1;
    }

    pub fn create_particle_burst(&mut self, center: Vec3, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let jitter = self.uniform_vec3(PARTICLE_JITTER);
            let velocity = self.uniform_vec3(PARTICLE_SPEED);
            let color = Vec3::new(self.rng.gen(), self.rng.gen(), self.rng.gen());
            self.particles.push(Particle {
                position: center + jitter,
                velocity,
                radius: self.params.particle_size,
                opacity: 1.0,
                remaining_life: self.params.particle_lifetime,
                color,
            });
        }
    }

    /// Integrate, fade and shrink every particle, then drop the ones that
    /// expired or shrank below the visible minimum in this same pass.
    pub fn update_particles(&mut self) {
        let lifetime = self.params.particle_lifetime.max(1) as f32;
        for p in &mut self.particles {
            p.position += p.velocity * FRAME_DT;
            p.velocity *= PARTICLE_DAMPING;
            p.remaining_life -= 1;
            p.opacity = (p.remaining_life as f32 / lifetime).clamp(0.0, 1.0);
            p.radius *= PARTICLE_SHRINK;
        }
        self.particles
            .retain(|p| p.remaining_life > 0 && p.radius >= PARTICLE_MIN_RADIUS);
    }

    /// Append a trail point; the oldest point goes once capacity is exceeded,
    /// however much life it has left.
    pub fn create_trail_point(&mut self, position: Vec3) {
        self.trails.push_back(TrailPoint {
            position,
            radius: TRAIL_RADIUS,
            opacity: TRAIL_OPACITY,
            remaining_life: self.params.trail_lifetime,
        });
        while self.trails.len() > self.params.trail_length {
            self.trails.pop_front();
        }
    }

    pub fn update_trails(&mut self) {
        let lifetime = self.params.trail_lifetime.max(1) as f32;
        for t in &mut self.trails {
            t.remaining_life -= 1;
            t.opacity = (t.remaining_life as f32 / lifetime * TRAIL_OPACITY).max(0.0);
            t.radius *= TRAIL_SHRINK;
        }
        self.trails.retain(|t| t.remaining_life > 0);
    }

    /// Main object color for the current mode.
    pub fn dynamic_color(&self, pitch: f32, roll: f32) -> Vec3 {
        match self.color_mode {
            ColorMode::Normal => orange(),
            ColorMode::Rainbow => {
                let hue = (self.clock.now_secs() * RAINBOW_HUE_SPEED).rem_euclid(TAU) as f32;
                Vec3::new(
                    0.5 + 0.5 * hue.sin(),
                    0.5 + 0.5 * (hue + 2.094).sin(),
                    0.5 + 0.5 * (hue + 4.188).sin(),
                )
            }
            ColorMode::Danger => {
                let intensity = (pitch.abs() + roll.abs()) / 180.0;
                Vec3::new(1.0, 1.0 - intensity, 1.0 - intensity)
            }
        }
    }

    /// Advance Normal -> Rainbow -> Danger -> Normal; returns the new name.
    pub fn cycle_color_mode(&mut self) -> &'static str {
        self.color_mode = self.color_mode.next();
        self.color_mode.name()
    }

    pub fn reset_effects(&mut self) {
        self.particles.clear();
        self.trails.clear();
        self.total_movement = 0.0;
    }

    /// Axis colors cycling with the frame counter, only in Rainbow mode.
    pub fn rainbow_axis_colors(&self) -> Option<[Vec3; 3]> {
        if self.color_mode != ColorMode::Rainbow {
            return None;
        }
        let phase = self.frame_count as f32 * RAINBOW_AXES_RATE;
        Some([
            Vec3::new(1.0, 0.5 + 0.5 * phase.sin(), 0.0),
            Vec3::new(0.5 + 0.5 * (phase + 2.0).sin(), 1.0, 0.0),
            Vec3::new(0.0, 0.5 + 0.5 * (phase + 4.0).sin(), 1.0),
        ])
    }

    /// Slow blue drift of the ground plane, refreshed every
    /// `GROUND_DRIFT_PERIOD` frames.
    pub fn ground_color(&self) -> Option<Vec3> {
        if self.frame_count % GROUND_DRIFT_PERIOD != 0 {
            return None;
        }
        let drift = 0.1 * (self.frame_count as f32 * 0.05).sin();
        Some(Vec3::new(GROUND_GRAY, GROUND_GRAY, GROUND_GRAY + drift))
    }

    /// Occasionally throw a small burst near `pos` while the device is moving
    /// a lot. Returns whether a sparkle was spawned.
    pub fn add_random_sparkles(&mut self, pos: Vec3, movement: f32) -> bool {
        let p = self.params.sparkle_probability;
        let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        if movement <= self.significant_movement || !self.rng.gen_bool(p) {
            return false;
        }
        let at = pos + self.uniform_vec3(SPARKLE_SPREAD);
        self.create_particle_burst(at, SPARKLE_BURST);
        true
    }

    pub fn status_text(&self) -> String {
        format!(
            "Mode: {} | Movement: {:.1}° | Particles: {}",
            self.color_mode.name(),
            self.total_movement,
            self.particles.len()
        )
    }

    fn uniform_vec3(&mut self, half_range: f32) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-half_range..=half_range),
            self.rng.gen_range(-half_range..=half_range),
            self.rng.gen_range(-half_range..=half_range),
        )
    }
}
