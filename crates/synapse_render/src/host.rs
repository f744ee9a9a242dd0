//! Field host: owns the frame driver, its render surface and the input
//! subscriptions for the lifetime of the visual component.

use crate::batch::{LineBatch, PointBatch};
use crate::surface::{RenderSurface, SurfaceError};
use std::time::Duration;
use synapse_core::{ConfigError, FrameDriver, StopHandle, TickReport};
use synapse_services::{DisplaySettings, InputChannel, Settings, SignalBus, Subscription};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

pub struct FieldHost<S: RenderSurface> {
    driver: FrameDriver,
    surface: Option<S>,
    input: InputChannel,
    subscriptions: Vec<Subscription>,
    stop: StopHandle,
}

impl<S: RenderSurface> FieldHost<S> {
    /// Build the field, create its surface and subscribe to `bus`.
    ///
    /// A surface that fails to initialise aborts startup; nothing is left
    /// subscribed in that case.
    pub fn start<F>(settings: &Settings, bus: &SignalBus, create_surface: F) -> Result<Self, HostError>
    where
        F: FnOnce(&DisplaySettings) -> Result<S, SurfaceError>,
    {
        let driver = FrameDriver::new(&settings.field)?;
        let mut surface = create_surface(&settings.display).inspect_err(|err| {
            tracing::warn!(%err, "particle field disabled");
        })?;

        surface.upload_points(&PointBatch::from_driver(&driver));
        surface.upload_lines(&LineBatch::from_driver(&driver));

        let input = InputChannel::new(settings.display.viewport());
        let sink = input.clone();
        let subscriptions = vec![bus.subscribe(move |signal| sink.apply(signal))];

        tracing::info!(
            particles = driver.particles().len(),
            edge_capacity = driver.edges().capacity(),
            "particle field started"
        );

        Ok(Self {
            stop: driver.stop_handle(),
            driver,
            surface: Some(surface),
            input,
            subscriptions,
        })
    }

    /// Run one frame at `elapsed` and push whatever changed to the surface.
    pub fn frame(&mut self, elapsed: Duration) -> TickReport {
        let report = self.driver.tick(elapsed, &self.input.snapshot());
        let Some(surface) = self.surface.as_mut().filter(|_| !report.stopped) else {
            return report;
        };

        let dirty = self.driver.take_dirty();
        if dirty.points {
            surface.upload_points(&PointBatch::from_driver(&self.driver));
        }
        if dirty.edges {
            surface.upload_lines(&LineBatch::from_driver(&self.driver));
        }
        surface.present();
        report
    }

    /// Handle that ends the frame loop; ticks after it is set do nothing.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn input(&self) -> &InputChannel {
        &self.input
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Stop, unsubscribe and release the surface, handing it back.
    pub fn teardown(mut self) -> Option<S> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<S> {
        self.stop.stop();
        self.subscriptions.clear();
        let mut surface = self.surface.take()?;
        surface.release();
        tracing::info!(frames = self.driver.frame(), "particle field torn down");
        Some(surface)
    }
}

impl<S: RenderSurface> Drop for FieldHost<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
