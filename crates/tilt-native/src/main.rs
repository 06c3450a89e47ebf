mod audio;
mod render;
mod serial;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::Key,
    window::WindowBuilder,
};

use tilt_core::{
    load_config, play_beep, EffectsManager, FramePacer, FrameScheduler, SensorStateBus,
    SystemClock, UserCommand,
};

const WINDOW_WIDTH: f64 = 1000.0;
const WINDOW_HEIGHT: f64 = 800.0;
const WINDOW_TITLE: &str = "IMU Tilt Visualizer";

fn command_for_key(key: &Key) -> Option<UserCommand> {
    match key {
        Key::Character(c) if c.eq_ignore_ascii_case("c") => Some(UserCommand::CycleColorMode),
        Key::Character(c) if c.eq_ignore_ascii_case("r") => Some(UserCommand::ResetEffects),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional first argument: path to a TOML config
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path.as_deref())?;

    // The bus is the only state shared with the reader thread
    let bus = Arc::new(SensorStateBus::new());
    let _reader = serial::spawn_reader(cfg.serial.clone(), cfg.motion.clone(), Arc::clone(&bus))?;

    let effects = EffectsManager::new(&cfg, Box::new(SystemClock::new()));
    let mut scheduler = FrameScheduler::new(&cfg, bus, effects);
    let mut pacer = FramePacer::new(cfg.refresh_rate);
    let beeper = audio::CpalBeeper::new();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)?;
    let mut gpu = pollster::block_on(render::GpuState::new(&window))?;

    log::info!("Visualization started at {} fps", cfg.refresh_rate);
    log::info!("Controls: 'c' cycles color modes, 'r' resets effects, shake the device for particles");

    let mut last_tick = Instant::now();
    let mut draws = Vec::new();
    let mut shown_title = String::new();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => gpu.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(cmd) = command_for_key(&logical_key) {
                let beep = scheduler.command(cmd);
                play_beep(&beeper, beep);
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            let due = pacer.advance(now - last_tick);
            last_tick = now;
            elwt.set_control_flow(ControlFlow::WaitUntil(now + pacer.interval()));
            if due == 0 {
                return;
            }
            for _ in 0..due {
                let report = scheduler.step();
                for beep in report.beeps {
                    play_beep(&beeper, beep);
                }
            }

            let scene = scheduler.scene();
            let title = format!("{} | {}", scene.info_text, scene.status_text);
            if title != shown_title {
                gpu.window.set_title(&title);
                shown_title = title;
            }

            scheduler.draw_list(&mut draws);
            match gpu.render(&draws) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    elwt.exit();
                }
                Err(e) => log::debug!("frame skipped: {e}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
