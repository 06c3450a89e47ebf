//! Ingestion side of the pipeline: lines in, samples onto the bus.

use crate::bus::SensorStateBus;
use crate::config::MotionConfig;
use crate::protocol::{parse_line, AngleEvent, ParseError};
use crate::shake::ShakeDetector;
use crate::state::OrientationSample;
use std::io::{self, BufRead, ErrorKind};
use std::sync::Arc;

pub struct Ingestor {
    current: OrientationSample,
    detector: ShakeDetector,
    bus: Arc<SensorStateBus>,
    lines_seen: u64,
}

impl Ingestor {
    pub fn new(motion: &MotionConfig, bus: Arc<SensorStateBus>) -> Self {
        Self {
            current: OrientationSample::default(),
            detector: ShakeDetector::from_config(motion),
            bus,
            lines_seen: 0,
        }
    }

    /// Process one line. Lines without a tilt keyword change nothing; other
    /// parse failures are logged and dropped.
    pub fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.lines_seen += 1;
        log::debug!("RX: {line}");

        match parse_line(line) {
            Ok(event) => self.apply(event),
            Err(ParseError::NoMatch) => log::trace!("ignoring line: {line}"),
            Err(e) => log::warn!("Parse error: {e} (line {}: {line:?})", self.lines_seen),
        }
    }

    fn apply(&mut self, event: AngleEvent) {
        match event {
            AngleEvent::Pitch(p) => self.current.pitch = p,
            AngleEvent::Roll(r) => self.current.roll = r,
        }
        self.detector.observe(self.current);
        let shake = self.detector.take_triggered();
        self.bus.publish(self.current, shake);
    }

    /// Read lines until end of stream. Read timeouts are part of normal
    /// operation on a quiet port; any other I/O error ends ingestion.
    pub fn run<R: BufRead>(&mut self, mut reader: R) -> io::Result<()> {
        let mut buf = Vec::with_capacity(128);
        loop {
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) if buf.is_empty() => {
                    log::info!("Sensor stream ended after {} lines", self.lines_seen);
                    return Ok(());
                }
                Ok(_) => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    // partial line stays in `buf` for the next read
                    continue;
                }
                Err(e) => return Err(e),
            }
            match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line),
                Err(e) => log::warn!("Parse error: {e}"),
            }
            buf.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ingestor() -> (Ingestor, Arc<SensorStateBus>) {
        let bus = Arc::new(SensorStateBus::new());
        (Ingestor::new(&MotionConfig::default(), Arc::clone(&bus)), bus)
    }

    #[test]
    fn each_line_updates_only_its_axis() {
        let (mut ing, bus) = ingestor();
        ing.handle_line("Tilting up 30\r\n");
        ing.handle_line("Tilting right 10");
        assert_eq!(ing.current, OrientationSample::new(-30.0, 10.0));
        assert_eq!(bus.drain().unwrap().sample, OrientationSample::new(-30.0, 10.0));
    }

    #[test]
    fn non_matching_and_malformed_lines_publish_nothing() {
        let (mut ing, bus) = ingestor();
        ing.handle_line("booting");
        ing.handle_line("Tilting down");
        ing.handle_line("   ");
        assert_eq!(bus.drain(), None);
        assert_eq!(ing.current, OrientationSample::default());
    }

    #[test]
    fn run_reads_until_eof_and_skips_bad_bytes() {
        let (mut ing, bus) = ingestor();
        let mut data = b"Tilting left 5\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"Tilting down 12");
        ing.run(Cursor::new(data)).unwrap();
        assert_eq!(bus.drain().unwrap().sample, OrientationSample::new(12.0, -5.0));
    }

    struct Flaky {
        chunks: Vec<io::Result<Vec<u8>>>,
    }

    impl io::Read for Flaky {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0)?;
            out[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn timeouts_are_retried_and_hard_errors_surface() {
        let (mut ing, bus) = ingestor();
        let reader = Flaky {
            chunks: vec![
                Ok(b"Tilting ri".to_vec()),
                Err(io::Error::new(ErrorKind::TimedOut, "quiet")),
                Ok(b"ght 20\n".to_vec()),
                Err(io::Error::new(ErrorKind::BrokenPipe, "unplugged")),
            ],
        };
        let err = ing.run(io::BufReader::new(reader)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
        assert_eq!(bus.drain().unwrap().sample, OrientationSample::new(0.0, 20.0));
    }

    #[test]
    fn shake_flag_rides_along_with_sample() {
        let (mut ing, bus) = ingestor();
        for line in ["Tilting up 40", "Tilting down 40", "Tilting up 40"] {
            ing.handle_line(line);
            assert!(!bus.drain().unwrap().shake);
        }
        ing.handle_line("Tilting down 40");
        assert!(bus.drain().unwrap().shake);
        assert!(!ing.detector.is_triggered());
    }
}
