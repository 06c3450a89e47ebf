//! Sample types shared between the ingestion thread and the update loop.

/// One pitch/roll observation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationSample {
    pub pitch: f32,
    pub roll: f32,
}

impl OrientationSample {
    pub fn new(pitch: f32, roll: f32) -> Self {
        Self { pitch, roll }
    }

    /// Sum of absolute pitch and roll change since `prev`.
    pub fn movement_from(&self, prev: &OrientationSample) -> f32 {
        (self.pitch - prev.pitch).abs() + (self.roll - prev.roll).abs()
    }

    /// Largest absolute angle, used for the extreme-tilt warning.
    pub fn extreme_angle(&self) -> f32 {
        self.pitch.abs().max(self.roll.abs())
    }
}

/// What the update loop receives from one drain of the bus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drained {
    pub sample: OrientationSample,
    pub shake: bool,
}
