// ---------------- Sensor ingestion thread ----------------

use std::io::{self, BufReader};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tilt_core::{Ingestor, MotionConfig, SensorStateBus, SerialConfig};

/// Port name that reads lines from stdin instead of a device, for replaying
/// captured logs.
pub const STDIN_PORT: &str = "-";

/// Start the reader thread. If the port cannot be opened the thread logs and
/// exits; the visualization keeps running on whatever it last received.
pub fn spawn_reader(
    serial: SerialConfig,
    motion: MotionConfig,
    bus: Arc<SensorStateBus>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("serial-reader".into())
        .spawn(move || {
            let mut ingestor = Ingestor::new(&motion, bus);
            let result = if serial.port == STDIN_PORT {
                log::info!("Reading sensor lines from stdin");
                ingestor.run(io::stdin().lock())
            } else {
                let port = match serialport::new(&serial.port, serial.baud)
                    .timeout(Duration::from_millis(serial.timeout_ms))
                    .open()
                {
                    Ok(port) => port,
                    Err(e) => {
                        log::error!("Serial connection failed: {e}");
                        return;
                    }
                };
                log::info!("Connected to {} at {} baud", serial.port, serial.baud);
                if let Err(e) = port.clear(serialport::ClearBuffer::Input) {
                    log::warn!("Could not flush serial input: {e}");
                }
                ingestor.run(BufReader::new(port))
            };
            if let Err(e) = result {
                log::error!("Sensor read failed, ingestion stopped: {e}");
            }
        })
}
