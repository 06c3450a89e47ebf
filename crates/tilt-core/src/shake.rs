//! Shake classification over the raw sample stream.
//!
//! Runs at the sensor's message rate on the ingestion thread. A run of large
//! sample-to-sample deltas raises a one-shot trigger; quiet samples bleed the
//! run count back down one step at a time instead of resetting it.

use crate::config::MotionConfig;
use crate::state::OrientationSample;

#[derive(Clone, Debug)]
pub struct ShakeDetector {
    threshold: f32,
    count_trigger: u32,
    prev: OrientationSample,
    rapid_change_count: u32,
    triggered: bool,
}

impl ShakeDetector {
    pub fn new(threshold: f32, count_trigger: u32) -> Self {
        Self {
            threshold,
            count_trigger,
            prev: OrientationSample::default(),
            rapid_change_count: 0,
            triggered: false,
        }
    }

    pub fn from_config(cfg: &MotionConfig) -> Self {
        Self::new(cfg.shake_threshold, cfg.shake_count_trigger)
    }

    /// Feed one sample. Returns true if this sample raised the trigger.
    pub fn observe(&mut self, sample: OrientationSample) -> bool {
        let d_pitch = (sample.pitch - self.prev.pitch).abs();
        let d_roll = (sample.roll - self.prev.roll).abs();
        let mut fired = false;
        if d_pitch > self.threshold || d_roll > self.threshold {
            self.rapid_change_count += 1;
            if self.rapid_change_count > self.count_trigger {
                self.triggered = true;
                self.rapid_change_count = 0;
                fired = true;
            }
        } else {
            self.rapid_change_count = self.rapid_change_count.saturating_sub(1);
        }
        self.prev = sample;
        fired
    }

    /// Read and clear the trigger. Returns true at most once per shake.
    pub fn take_triggered(&mut self) -> bool {
        std::mem::take(&mut self.triggered)
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn rapid_change_count(&self) -> u32 {
        self.rapid_change_count
    }
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::from_config(&MotionConfig::default())
    }
}
