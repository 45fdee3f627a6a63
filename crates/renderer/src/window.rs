use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use shading::Canvas;
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use crate::driver::PresentationSurface;
use crate::gpu::{GpuState, PresentStatus};

/// A fixed-size window showing the canvas through wgpu.
///
/// Events are pumped from [`poll_close_requested`](PresentationSurface::poll_close_requested)
/// so the frame loop stays in the caller's hands.
pub struct WindowSurface {
    // Declared before `window` so the surface is dropped first.
    gpu: GpuState,
    window: Arc<Window>,
    event_loop: EventLoop<()>,
    canvas_size: (u32, u32),
    pending_resize: Option<PhysicalSize<u32>>,
    close_requested: bool,
}

impl WindowSurface {
    /// Opens a non-resizable `width`x`height` window titled `title`.
    ///
    /// Must be called from the main thread.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let event_loop =
            EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
        let window_size = PhysicalSize::new(width, height);
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(window_size)
            .with_resizable(false)
            .build(&event_loop)
            .map_err(|err| anyhow!("failed to create window: {err}"))?;
        let window = Arc::new(window);

        // Compositors may hand back a different size than requested.
        let surface_size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), surface_size, (width, height))
            .map_err(|err| anyhow!("failed to initialise window renderer: {err:#}"))?;
        tracing::info!(
            width,
            height,
            surface_width = surface_size.width,
            surface_height = surface_size.height,
            "window opened"
        );

        Ok(Self {
            gpu,
            window,
            event_loop,
            canvas_size: (width, height),
            pending_resize: None,
            close_requested: false,
        })
    }
}

impl PresentationSurface for WindowSurface {
    fn display_frame(&mut self, canvas: &Canvas) -> Result<()> {
        if canvas.dimensions() != self.canvas_size {
            anyhow::bail!(
                "canvas is {:?} but the window surface was created for {:?}",
                canvas.dimensions(),
                self.canvas_size
            );
        }
        if let Some(size) = self.pending_resize.take() {
            if size != self.gpu.size() {
                self.gpu.resize(size);
            }
        }

        self.window.pre_present_notify();
        if self.gpu.render(canvas)? == PresentStatus::Skipped {
            tracing::debug!("frame skipped by surface");
        }
        Ok(())
    }

    fn poll_close_requested(&mut self) -> bool {
        if self.close_requested {
            return true;
        }

        let window_id = self.window.id();
        let mut close_requested = false;
        let mut resized = None;
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, elwt| {
                if let Event::WindowEvent { window_id: id, event } = event {
                    if id != window_id {
                        return;
                    }
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            close_requested = true;
                            elwt.exit();
                        }
                        WindowEvent::Resized(size) => resized = Some(size),
                        _ => {}
                    }
                }
            });

        if let PumpStatus::Exit(code) = status {
            tracing::debug!(code, "event loop exited");
            close_requested = true;
        }
        if resized.is_some() {
            self.pending_resize = resized;
        }
        self.close_requested = close_requested;
        close_requested
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}
