use glam::Vec3;

// Shared tuning constants. `TiltConfig` defaults to these; the pipeline reads
// the config so a TOML file can override any of them.

// Serial link
pub const PORT: &str = "/dev/ttyUSB0";
pub const BAUD: u32 = 115_200;
pub const TIMEOUT_MS: u64 = 1000;

// Update loop
pub const REFRESH_RATE: u32 = 60; // virtual frames per second
pub const FRAME_DT: f32 = 0.02; // particle integration step, fixed per frame

// Main object
pub const BOX_LENGTH: f32 = 2.0;
pub const BOX_HEIGHT: f32 = 0.2;
pub const BOX_WIDTH: f32 = 1.0;

// Motion classification (degrees)
pub const SHAKE_THRESHOLD: f32 = 30.0;
pub const SHAKE_COUNT_TRIGGER: u32 = 3;
pub const MOVEMENT_THRESHOLD: f32 = 5.0;
pub const SIGNIFICANT_MOVEMENT: f32 = 10.0;
pub const EXTREME_TILT_THRESHOLD: f32 = 60.0;

// Trails
pub const TRAIL_LENGTH: usize = 50;
pub const TRAIL_LIFETIME: i32 = 100; // frames
pub const TRAIL_RADIUS: f32 = 0.02;
pub const TRAIL_OPACITY: f32 = 0.6;
pub const TRAIL_SHRINK: f32 = 0.998;

// Particles
pub const PARTICLE_SIZE: f32 = 0.05;
pub const PARTICLE_LIFETIME: i32 = 60; // frames
pub const PARTICLE_JITTER: f32 = 0.2;
pub const PARTICLE_SPEED: f32 = 2.0;
pub const PARTICLE_DAMPING: f32 = 0.98;
pub const PARTICLE_SHRINK: f32 = 0.99;
pub const PARTICLE_MIN_RADIUS: f32 = 0.01;
pub const SPARKLE_PROBABILITY: f64 = 0.005;
pub const SPARKLE_SPREAD: f32 = 1.0;

// Burst sizes
pub const EXTREME_TILT_BURST: usize = 20;
pub const SHAKE_BURST: usize = 30;
pub const SPARKLE_BURST: usize = 5;

// Beeps (Hz / seconds)
pub const BEEP_FREQUENCY: f32 = 1000.0;
pub const BEEP_DURATION: f32 = 0.1;
pub const MODE_CHANGE_BEEP: f32 = 800.0;
pub const MODE_CHANGE_STEP: f32 = 200.0; // added per mode index
pub const RESET_BEEP: f32 = 1500.0;
pub const EXTREME_TILT_BEEP: f32 = 2000.0;
pub const EXTREME_TILT_BEEP_DURATION: f32 = 0.2;
pub const SHAKE_BEEP: f32 = 1200.0;
pub const SHAKE_BEEP_DURATION: f32 = 0.1;

// Object styling
pub const OBJECT_OPACITY: f32 = 0.8;
pub const OUTLINE_OPACITY: f32 = 0.2;
pub const PULSE_RATE: f32 = 0.3; // radians per frame while extreme
pub const PULSE_DEPTH: f32 = 0.2;
pub const OUTLINE_PULSE_SCALE: f32 = 0.4;

// Ambient animation
pub const GROUND_DRIFT_PERIOD: u64 = 30; // frames between ground color updates
pub const GROUND_GRAY: f32 = 0.3;
pub const RAINBOW_AXES_RATE: f32 = 0.1;
pub const RAINBOW_HUE_SPEED: f64 = 2.0;

// Palette
pub const ORANGE: [f32; 3] = [1.0, 0.6, 0.0];
pub const CYAN: [f32; 3] = [0.0, 1.0, 1.0];
pub const AXIS_COLORS: [[f32; 3]; 3] = [
    [1.0, 0.0, 0.0], // x
    [0.0, 1.0, 0.0], // y
    [0.0, 0.0, 1.0], // z
];

#[inline]
pub fn orange() -> Vec3 {
    Vec3::from(ORANGE)
}

#[inline]
pub fn cyan() -> Vec3 {
    Vec3::from(CYAN)
}
