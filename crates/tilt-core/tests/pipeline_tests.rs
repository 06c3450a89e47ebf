// Host-side integration tests for the ingestion -> bus -> frame pipeline.
// Sparkles are switched off and the RNG/clock fixed so frames are repeatable.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;
use tilt_core::*;

fn config() -> TiltConfig {
    let mut cfg = TiltConfig::default();
    cfg.effects.sparkle_probability = 0.0;
    cfg.motion.shake_count_trigger = 3;
    cfg
}

fn pipeline() -> (Ingestor, FrameScheduler, Arc<SensorStateBus>) {
    let cfg = config();
    let bus = Arc::new(SensorStateBus::new());
    let effects =
        EffectsManager::with_rng(&cfg, StdRng::seed_from_u64(42), Box::new(FixedClock(0.0)));
    let ingestor = Ingestor::new(&cfg.motion, Arc::clone(&bus));
    let scheduler = FrameScheduler::new(&cfg, Arc::clone(&bus), effects);
    (ingestor, scheduler, bus)
}

#[test]
fn tilt_up_line_reaches_frame_and_lays_trail() {
    let (mut ing, mut frames, _bus) = pipeline();
    ing.handle_line("Tilting up 30");

    let report = frames.step();
    let drained = report.drained.expect("sample drained");
    assert_eq!(drained.sample.pitch, -30.0);
    assert_eq!(report.movement, 30.0);
    assert!(report.trail_created);
    assert_eq!(frames.effects().trail_len(), 1);
    let point = frames.effects().trails().next().unwrap();
    assert_eq!(point.position, frames.scene().object.position);
    assert_eq!(frames.effects().total_movement, 30.0);
    assert_eq!(
        frames.scene().info_text,
        "📱⚠️ Pitch: -30°   Roll: +0°   Total Tilt: 30.0°"
    );
}

#[test]
fn frames_without_new_samples_only_age_effects() {
    let (mut ing, mut frames, _bus) = pipeline();
    ing.handle_line("Tilting down 20");
    frames.step();
    let orientation = frames.scene().object.orientation;
    let trail_life = frames.effects().trails().next().unwrap().remaining_life;

    let report = frames.step();
    assert!(report.drained.is_none());
    assert_eq!(report.movement, 0.0);
    assert_eq!(frames.scene().object.orientation, orientation);
    assert_eq!(
        frames.effects().trails().next().unwrap().remaining_life,
        trail_life - 1
    );
}

#[test]
fn small_movement_leaves_no_trail() {
    let (mut ing, mut frames, _bus) = pipeline();
    ing.handle_line("Tilting right 3");
    let report = frames.step();
    assert!(!report.trail_created);
    assert_eq!(frames.effects().trail_len(), 0);
}

#[test]
fn four_rapid_samples_trigger_one_shake_burst() {
    let (mut ing, mut frames, _bus) = pipeline();
    for line in [
        "Tilting up 40",
        "Tilting down 40",
        "Tilting up 40",
        "Tilting down 40",
    ] {
        ing.handle_line(line);
    }
    // only the last sample is drained, but the shake flag was kept
    let report = frames.step();
    assert!(report.shake_burst);
    assert!(report
        .beeps
        .contains(&BeepRequest::new(SHAKE_BEEP, SHAKE_BEEP_DURATION)));
    assert_eq!(frames.effects().particles().len(), SHAKE_BURST);

    ing.handle_line("Tilting down 41");
    let report = frames.step();
    assert!(!report.shake_burst);
}

#[test]
fn extreme_tilt_fires_once_then_pulses() {
    let (mut ing, mut frames, _bus) = pipeline();
    ing.handle_line("Tilting left 70");
    let first = frames.step();
    assert!(first.extreme_onset);
    assert_eq!(
        first.beeps.as_slice(),
        &[BeepRequest::new(EXTREME_TILT_BEEP, EXTREME_TILT_BEEP_DURATION)]
    );
    assert_eq!(frames.effects().particles().len(), EXTREME_TILT_BURST);
    assert!(frames.in_extreme_tilt());

    ing.handle_line("Tilting left 75");
    let second = frames.step();
    assert!(!second.extreme_onset);
    assert!(second.beeps.is_empty());
    let frame = frames.effects().frame_count() as f32;
    let pulse = OBJECT_OPACITY + PULSE_DEPTH * (frame * PULSE_RATE).sin();
    assert!((frames.scene().object.opacity - pulse).abs() < 1e-6);
    assert!((frames.scene().object.outline_opacity - OUTLINE_PULSE_SCALE * pulse).abs() < 1e-6);

    ing.handle_line("Tilting left 10");
    frames.step();
    assert!(!frames.in_extreme_tilt());
    assert_eq!(frames.scene().object.opacity, OBJECT_OPACITY);
    assert_eq!(frames.scene().object.outline_opacity, OUTLINE_OPACITY);
    assert_eq!(frames.scene().info_text.chars().next(), Some('📱'));
}

#[test]
fn orientation_follows_latest_sample() {
    let (mut ing, mut frames, _bus) = pipeline();
    ing.handle_line("Tilting down 90");
    frames.step();
    let o = frames.scene().object.orientation;
    assert!((o.axis - Vec3::X).length() < 1e-6);
    assert!((o.up - Vec3::Z).length() < 1e-6);
}

#[test]
fn commands_cycle_mode_and_reset() {
    let (mut ing, mut frames, _bus) = pipeline();
    ing.handle_line("Tilting up 30");
    frames.step();

    let beep = frames.command(UserCommand::CycleColorMode);
    assert_eq!(beep.frequency_hz, MODE_CHANGE_BEEP + MODE_CHANGE_STEP);
    assert_eq!(frames.effects().color_mode(), ColorMode::Rainbow);
    assert!(frames.scene().status_text.starts_with("Mode: Rainbow"));

    let beep = frames.command(UserCommand::ResetEffects);
    assert_eq!(beep.frequency_hz, RESET_BEEP);
    assert_eq!(frames.effects().trail_len(), 0);
    assert_eq!(frames.effects().total_movement, 0.0);
    assert_eq!(
        frames.scene().status_text,
        "Mode: Rainbow 🌈 | Movement: 0.0° | Particles: 0"
    );
}

#[test]
fn danger_mode_colors_object_by_tilt() {
    let (mut ing, mut frames, _bus) = pipeline();
    frames.command(UserCommand::CycleColorMode);
    frames.command(UserCommand::CycleColorMode);
    ing.handle_line("Tilting down 45");
    ing.handle_line("Tilting left 45");
    frames.step();
    let c = frames.scene().object.color;
    assert!((c - Vec3::new(1.0, 0.5, 0.5)).length() < 1e-6);
}

#[test]
fn rainbow_mode_animates_axes_every_frame() {
    let (_ing, mut frames, _bus) = pipeline();
    let initial = frames.scene().axis_colors;
    frames.step();
    assert_eq!(frames.scene().axis_colors, initial);
    frames.command(UserCommand::CycleColorMode);
    frames.step();
    let a = frames.scene().axis_colors;
    frames.step();
    assert_ne!(frames.scene().axis_colors, a);
}

#[test]
fn draw_list_contains_trails_and_particles() {
    let (mut ing, mut frames, _bus) = pipeline();
    let mut baseline = Vec::new();
    frames.draw_list(&mut baseline);

    ing.handle_line("Tilting right 80");
    frames.step();
    let mut list = Vec::new();
    frames.draw_list(&mut list);
    assert_eq!(list.len(), baseline.len() + 1 + EXTREME_TILT_BURST);
    assert!(list
        .iter()
        .all(|d| d.radius > 0.0 && (0.0..=1.0).contains(&d.opacity)));
}

#[test]
fn particles_expire_under_frame_loop() {
    let (_ing, mut frames, _bus) = pipeline();
    frames.effects_mut().create_particle_burst(Vec3::ZERO, 10);
    for _ in 0..PARTICLE_LIFETIME {
        assert!(frames.effects().particles().len() <= 10);
        frames.step();
    }
    assert!(frames.effects().particles().is_empty());
}

#[test]
fn threaded_ingestion_delivers_latest_value() {
    let (mut ing, mut frames, bus) = pipeline();
    let writer = thread::spawn(move || {
        for angle in 0..=60 {
            ing.handle_line(&format!("Tilting right {angle}"));
        }
    });
    writer.join().unwrap();
    let report = frames.step();
    assert_eq!(report.drained.unwrap().sample.roll, 60.0);
    assert_eq!(bus.drain(), None);
}
