//! Fixed-rate update loop body.
//!
//! [`FrameScheduler::step`] is one virtual frame; the host decides how often
//! to call it, usually through [`FramePacer`].

use crate::audio::BeepRequest;
use crate::bus::SensorStateBus;
use crate::config::{MotionConfig, TiltConfig};
use crate::constants::*;
use crate::effects::EffectsManager;
use crate::orientation::orient;
use crate::scene::{DrawInstance, SceneState};
use crate::state::{Drained, OrientationSample};
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::Duration;

pub type Beeps = SmallVec<[BeepRequest; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserCommand {
    CycleColorMode,
    ResetEffects,
}

/// What happened during one frame, mostly for the host and for tests.
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub drained: Option<Drained>,
    pub movement: f32,
    pub trail_created: bool,
    pub shake_burst: bool,
    pub extreme_onset: bool,
    pub sparkled: bool,
    pub beeps: Beeps,
}

pub struct FrameScheduler {
    bus: Arc<SensorStateBus>,
    effects: EffectsManager,
    motion: MotionConfig,
    prev: OrientationSample,
    extreme_tilt: bool,
    scene: SceneState,
}

impl FrameScheduler {
    pub fn new(cfg: &TiltConfig, bus: Arc<SensorStateBus>, effects: EffectsManager) -> Self {
        Self {
            bus,
            effects,
            motion: cfg.motion.clone(),
            prev: OrientationSample::default(),
            extreme_tilt: false,
            scene: SceneState::default(),
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn effects(&self) -> &EffectsManager {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectsManager {
        &mut self.effects
    }

    pub fn in_extreme_tilt(&self) -> bool {
        self.extreme_tilt
    }

    pub fn step(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        self.effects.update_frame_count();
        self.effects.update_particles();
        self.effects.update_trails();

        if let Some(drained) = self.bus.drain() {
            self.apply_sample(drained, &mut report);
        }

        if let Some(ground) = self.effects.ground_color() {
            self.scene.ground_color = ground;
        }
        if let Some(axes) = self.effects.rainbow_axis_colors() {
            self.scene.axis_colors = axes;
        }
        report
    }

    fn apply_sample(&mut self, drained: Drained, report: &mut FrameReport) {
        let Drained { sample, shake } = drained;
        report.drained = Some(drained);

        let movement = sample.movement_from(&self.prev);
        report.movement = movement;
        self.effects.total_movement += movement;

        let object = &mut self.scene.object;
        object.orientation = orient(sample.pitch, sample.roll);
        object.color = self.effects.dynamic_color(sample.pitch, sample.roll);
        let position = object.position;

        let extreme_angle = sample.extreme_angle();
        if extreme_angle > self.motion.extreme_tilt_threshold {
            if !self.extreme_tilt {
                self.extreme_tilt = true;
                report.extreme_onset = true;
                report
                    .beeps
                    .push(BeepRequest::new(EXTREME_TILT_BEEP, EXTREME_TILT_BEEP_DURATION));
                self.effects.create_particle_burst(position, EXTREME_TILT_BURST);
            }
            let phase = self.effects.frame_count() as f32 * PULSE_RATE;
            let pulse = OBJECT_OPACITY + PULSE_DEPTH * phase.sin();
            self.scene.object.opacity = pulse;
            self.scene.object.outline_opacity = OUTLINE_PULSE_SCALE * pulse;
        } else {
            self.extreme_tilt = false;
            self.scene.object.opacity = OBJECT_OPACITY;
            self.scene.object.outline_opacity = OUTLINE_OPACITY;
        }

        if movement > self.motion.movement_threshold {
            self.effects.create_trail_point(position);
            report.trail_created = true;
        }

        if shake {
            self.effects.create_particle_burst(position, SHAKE_BURST);
            report.shake_burst = true;
            report
                .beeps
                .push(BeepRequest::new(SHAKE_BEEP, SHAKE_BEEP_DURATION));
            log::info!("Shake detected! Particle burst!");
        }

        self.scene.info_text = format!(
            "{} Pitch: {:+.0}°   Roll: {:+.0}°   Total Tilt: {:.1}°",
            tilt_icon(extreme_angle),
            sample.pitch,
            sample.roll,
            extreme_angle
        );
        self.scene.status_text = self.effects.status_text();

        self.prev = sample;

        report.sparkled = self.effects.add_random_sparkles(position, movement);
    }

    /// Apply a user command and return the beep it asks for.
    pub fn command(&mut self, cmd: UserCommand) -> BeepRequest {
        match cmd {
            UserCommand::CycleColorMode => {
                let name = self.effects.cycle_color_mode();
                log::info!("Color mode: {name}");
                self.scene.status_text = self.effects.status_text();
                let index = self.effects.color_mode().index() as f32;
                BeepRequest::tone(MODE_CHANGE_BEEP + index * MODE_CHANGE_STEP)
            }
            UserCommand::ResetEffects => {
                self.effects.reset_effects();
                self.scene.status_text = self.effects.status_text();
                BeepRequest::tone(RESET_BEEP)
            }
        }
    }

    /// Flatten the scene, trails and particles into billboards, back to front
    /// in that order.
    pub fn draw_list(&self, out: &mut Vec<DrawInstance>) {
        out.clear();
        self.scene.push_static(out);
        out.extend(self.effects.trails().map(|t| DrawInstance {
            position: t.position,
            radius: t.radius,
            color: cyan(),
            opacity: t.opacity,
        }));
        out.extend(self.effects.particles().iter().map(|p| DrawInstance {
            position: p.position,
            radius: p.radius,
            color: p.color,
            opacity: p.opacity,
        }));
    }
}

fn tilt_icon(extreme_angle: f32) -> &'static str {
    if extreme_angle < 15.0 {
        "📱"
    } else if extreme_angle < 45.0 {
        "📱⚠️"
    } else {
        "📱🚨"
    }
}

/// Converts wall-clock deltas into a count of virtual frames to run.
#[derive(Clone, Debug)]
pub struct FramePacer {
    interval: f64,
    accum: f64,
    max_catch_up: u32,
}

impl FramePacer {
    pub fn new(refresh_rate: u32) -> Self {
        Self {
            interval: 1.0 / refresh_rate.max(1) as f64,
            accum: 0.0,
            max_catch_up: 4,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }

    /// Frames due after `dt` has elapsed. Backlog beyond a few frames is
    /// dropped so a stalled host does not replay seconds of animation.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.accum += dt.as_secs_f64();
        let mut due = 0;
        while self.accum >= self.interval {
            self.accum -= self.interval;
            due += 1;
        }
        if due > self.max_catch_up {
            due = self.max_catch_up;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_counts_whole_intervals() {
        let mut pacer = FramePacer::new(50);
        assert!((pacer.interval().as_secs_f64() - 0.02).abs() < 1e-9);
        assert_eq!(pacer.advance(Duration::from_millis(10)), 0);
        assert_eq!(pacer.advance(Duration::from_millis(15)), 1);
        assert_eq!(pacer.advance(Duration::from_millis(45)), 2);
    }

    #[test]
    fn pacer_caps_catch_up() {
        let mut pacer = FramePacer::new(60);
        assert_eq!(pacer.advance(Duration::from_secs(2)), 4);
        assert_eq!(pacer.advance(Duration::ZERO), 0);
    }

    #[test]
    fn tilt_icon_bands() {
        assert_eq!(tilt_icon(0.0), "📱");
        assert_eq!(tilt_icon(20.0), "📱⚠️");
        assert_eq!(tilt_icon(45.0), "📱🚨");
    }
}
