//! Single-slot mailbox between the ingestion thread and the update loop.
//!
//! A publish overwrites whatever is unread; a drain takes the latest sample
//! and any pending shake flag in one critical section. Nothing queues and
//! nothing blocks beyond the copy of a few floats.

use crate::state::{Drained, OrientationSample};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Slot {
    latest: OrientationSample,
    has_unread: bool,
    pending_shake: bool,
}

#[derive(Default)]
pub struct SensorStateBus {
    slot: Mutex<Slot>,
}

impl SensorStateBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest sample and OR `shake` into the pending flag.
    pub fn publish(&self, sample: OrientationSample, shake: bool) {
        let mut slot = self.lock();
        slot.latest = sample;
        slot.pending_shake |= shake;
        slot.has_unread = true;
    }

    /// Take the unread sample, if any, clearing the unread mark and the
    /// pending shake flag together. Leaves everything untouched when there is
    /// nothing new.
    pub fn drain(&self) -> Option<Drained> {
        let mut slot = self.lock();
        if !slot.has_unread {
            return None;
        }
        slot.has_unread = false;
        Some(Drained {
            sample: slot.latest,
            shake: std::mem::take(&mut slot.pending_shake),
        })
    }

    // The slot is plain data, so a panic on the other side cannot leave it
    // half-written in a way that matters; keep serving it.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn drain_on_empty_bus_is_none() {
        let bus = SensorStateBus::new();
        assert_eq!(bus.drain(), None);
    }

    #[test]
    fn latest_publish_wins() {
        let bus = SensorStateBus::new();
        bus.publish(OrientationSample::new(1.0, 2.0), false);
        bus.publish(OrientationSample::new(3.0, 4.0), false);
        let d = bus.drain().unwrap();
        assert_eq!(d.sample, OrientationSample::new(3.0, 4.0));
        assert!(!d.shake);
        assert_eq!(bus.drain(), None);
    }

    #[test]
    fn shake_flag_survives_overwrite_and_clears_on_drain() {
        let bus = SensorStateBus::new();
        bus.publish(OrientationSample::new(10.0, 0.0), true);
        bus.publish(OrientationSample::new(20.0, 0.0), false);
        let d = bus.drain().unwrap();
        assert!(d.shake);
        bus.publish(OrientationSample::new(30.0, 0.0), false);
        assert!(!bus.drain().unwrap().shake);
    }

    #[test]
    fn empty_drain_keeps_latest_value() {
        let bus = SensorStateBus::new();
        bus.publish(OrientationSample::new(-5.0, 5.0), false);
        bus.drain();
        assert_eq!(bus.drain(), None);
        assert_eq!(bus.lock().latest, OrientationSample::new(-5.0, 5.0));
    }

    #[test]
    fn reader_never_sees_older_than_last_publish() {
        let bus = Arc::new(SensorStateBus::new());
        let writer = {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for i in 1..=10_000 {
                    bus.publish(OrientationSample::new(i as f32, 0.0), false);
                }
            })
        };
        let mut last_seen = 0.0;
        while !writer.is_finished() {
            if let Some(d) = bus.drain() {
                assert!(d.sample.pitch > last_seen);
                last_seen = d.sample.pitch;
            }
        }
        writer.join().unwrap();
        if let Some(d) = bus.drain() {
            last_seen = d.sample.pitch;
        }
        assert_eq!(last_seen, 10_000.0);
    }
}
