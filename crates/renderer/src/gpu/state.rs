use anyhow::{anyhow, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use shading::Canvas;
use winit::dpi::PhysicalSize;

use super::blit::CanvasBlitter;
use super::context::GpuContext;

/// Outcome of a single presentation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PresentStatus {
    Presented,
    /// The frame was dropped; the next one will try again.
    Skipped,
}

/// Swapchain plus the canvas blit pipeline.
pub(crate) struct GpuState {
    context: GpuContext,
    blitter: CanvasBlitter,
}

impl GpuState {
    /// `canvas_size` fixes the texture the canvas is streamed into; the
    /// swapchain starts at `surface_size` and may be resized later.
    pub(crate) fn new<T>(
        target: &T,
        surface_size: PhysicalSize<u32>,
        canvas_size: (u32, u32),
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, surface_size)?;
        let (width, height) = canvas_size;
        let blitter = CanvasBlitter::new(&context.device, context.surface_format, width, height);
        Ok(Self { context, blitter })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Uploads `canvas` and presents it stretched over the surface.
    ///
    /// Lost or outdated swapchains are reconfigured and timeouts are skipped;
    /// running out of memory is reported as an error.
    pub(crate) fn render(&mut self, canvas: &Canvas) -> Result<PresentStatus> {
        let frame = match self.context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                return Ok(PresentStatus::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout; retrying next frame");
                return Ok(PresentStatus::Skipped);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("surface out of memory"));
            }
            Err(other) => {
                tracing::warn!(error = ?other, "surface error; retrying next frame");
                return Ok(PresentStatus::Skipped);
            }
        };

        self.blitter.upload(&self.context.queue, canvas);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("canvas encoder"),
                });
        self.blitter.draw(&mut encoder, &view);
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(PresentStatus::Presented)
    }
}
