//! Synapse Runtime
//!
//! Boots logging, loads settings and drives the particle field against a
//! headless surface with a synthetic pointer sweep and page scroll.
//!
//! Usage: `synapse [--realtime] [settings.json] [frames]`
//!
//! Frames advance in fixed 60 Hz steps unless `--realtime` paces them
//! against the wall clock.

use anyhow::{Context, Result};
use std::f32::consts::TAU;
use synapse_core::time::{SteppedClock, TimeSource, WallClock};
use synapse_render::{FieldHost, HeadlessSurface};
use synapse_services::{Settings, Signal, SignalBus};

const DEFAULT_FRAMES: u64 = 600;
const REPORT_EVERY: u64 = 120;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Synapse v{}", synapse_core::VERSION);

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let realtime = match args.iter().position(|arg| arg == "--realtime") {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    };
    let mut args = args.into_iter();
    let settings = match args.next() {
        Some(path) => Settings::load(&path).with_context(|| format!("loading settings from {path}"))?,
        None => Settings::default(),
    };
    let frames = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid frame count {raw:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let bus = SignalBus::new();
    let mut host = FieldHost::start(&settings, &bus, HeadlessSurface::create)
        .context("particle field unavailable")?;

    if realtime {
        run(&mut host, &bus, &settings, frames, &mut WallClock::new(), true);
    } else {
        run(&mut host, &bus, &settings, frames, &mut SteppedClock::display_rate(), false);
    }

    synapse_metrics::metrics! {
        let driver = host.driver();
        for (stage, timing) in driver.profiler().iter() {
            tracing::info!(
                stage = stage.name(),
                calls = timing.calls,
                mean_us = timing.mean().as_secs_f64() * 1e6,
                "stage timing"
            );
        }
        tracing::info!(overruns = driver.frame_timer().overruns(), "frame budget");
    }

    if let Some(surface) = host.teardown() {
        tracing::info!(
            point_uploads = surface.point_uploads(),
            line_uploads = surface.line_uploads(),
            "surface released"
        );
    }

    Ok(())
}

/// Feed synthetic input and step the host `frames` times on `clock`.
fn run<C: TimeSource>(
    host: &mut FieldHost<HeadlessSurface>,
    bus: &SignalBus,
    settings: &Settings,
    frames: u64,
    clock: &mut C,
    pace: bool,
) {
    let (width, height) = (settings.display.width_px as f32, settings.display.height_px as f32);

    for n in 1..=frames {
        let phase = n as f32 / frames.max(1) as f32 * TAU;
        bus.dispatch(&Signal::PointerMove {
            client_x: width * (0.5 + 0.4 * phase.cos()),
            client_y: height * (0.5 + 0.4 * (2.0 * phase).sin()),
        });
        bus.dispatch(&Signal::Scroll { offset: n as f32 * 2.0 });

        let report = host.frame(clock.next_frame());
        if n % REPORT_EVERY == 0 {
            let driver = host.driver();
            tracing::info!(
                frame = report.frame,
                edges = driver.edges().count(),
                fps = driver.frame_timer().fps(),
                frame_ms = driver.frame_timer().frame_time_ms(),
                "field running"
            );
        }

        if pace {
            let deadline = synapse_metrics::FRAME_BUDGET.mul_f64(n as f64);
            if let Some(wait) = deadline.checked_sub(clock.elapsed()) {
                std::thread::sleep(wait);
            }
        }
    }
}
