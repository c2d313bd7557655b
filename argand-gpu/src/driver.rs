//! Progressive compute driver: accumulates escape-time refinement across
//! frames, scrolls without recomputing, and resets on window changes.

use std::collections::HashMap;

use argand_core::{Complex, ComplexRect, ImageSize};
use log::{debug, info};

use crate::args::{RefineArgs, ScrollArgs};
use crate::device::GpuContext;
use crate::dispatch::{select_dispatch_geometry, DispatchGeometry};
use crate::error::GpuError;
use crate::pages::AccumulationPages;
use crate::schedule::IterationSchedule;

const REFINE_SHADER: &str = include_str!("shaders/refine.wgsl");
const TRANSLATE_SHADER: &str = include_str!("shaders/translate.wgsl");

/// Tuning for the progressive driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Iterations granted to the first tick after allocation or reset, so a
    /// coarse image appears immediately.
    pub initial_step: u32,
    /// Iterations granted to every later accumulating tick.
    pub steady_step: u32,
    /// Total iteration budget; accumulation stops advancing once reached.
    pub iteration_limit: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            initial_step: 64,
            steady_step: 8,
            iteration_limit: 4096,
        }
    }
}

/// External requests recorded on arrival and consumed at the start of the
/// next frame tick, so GPU state never changes mid-frame.
#[derive(Debug, Default, Clone, Copy)]
struct PendingEvents {
    resize: Option<ImageSize>,
    reset: bool,
    scroll_delta: (i32, i32),
}

/// Everything tied to the current surface dimensions. Replaced wholesale on
/// resize; absent until the first size notification and for zero-dimension
/// surfaces.
struct SurfaceState {
    pages: AccumulationPages,
    geometry: DispatchGeometry,
    refine: wgpu::ComputePipeline,
    translate: wgpu::ComputePipeline,
}

/// Drives the refinement and translate kernels across frames.
///
/// The embedder forwards surface resizes, pan gestures and reset requests as
/// they happen, and calls [`on_frame_tick`](Self::on_frame_tick) once per
/// display frame with the texture the frame should be written into (an
/// rgba8unorm storage texture matching the surface size). Kernel work for a
/// frame is submitted on a single queue before the page parity flips, so
/// frames never overlap.
pub struct ProgressiveDriver {
    context: GpuContext,
    refine_module: wgpu::ShaderModule,
    translate_module: wgpu::ShaderModule,
    refine_args: wgpu::Buffer,
    scroll_args: wgpu::Buffer,
    window: ComplexRect,
    schedule: IterationSchedule,
    surface: Option<SurfaceState>,
    scrolling: bool,
    scroll_offset: (i32, i32),
    pending: PendingEvents,
}

impl ProgressiveDriver {
    /// Compiles both kernels and prepares an uninitialized driver.
    ///
    /// Fails with [`GpuError::KernelCompilation`] if either kernel source is
    /// invalid; no surface exists until the first resize notification.
    pub async fn new(
        context: GpuContext,
        window: ComplexRect,
        config: DriverConfig,
    ) -> Result<Self, GpuError> {
        let refine_module = context.create_shader("refine-kernel", REFINE_SHADER).await?;
        let translate_module = context
            .create_shader("translate-kernel", TRANSLATE_SHADER)
            .await?;

        let refine_args = context
            .create_argument_buffer("refine-args", std::mem::size_of::<RefineArgs>() as u64);
        let scroll_args = context
            .create_argument_buffer("scroll-args", std::mem::size_of::<ScrollArgs>() as u64);

        Ok(Self {
            context,
            refine_module,
            translate_module,
            refine_args,
            scroll_args,
            window,
            schedule: IterationSchedule::new(
                config.initial_step,
                config.steady_step,
                config.iteration_limit,
            ),
            surface: None,
            scrolling: false,
            scroll_offset: (0, 0),
            pending: PendingEvents::default(),
        })
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn window(&self) -> ComplexRect {
        self.window
    }

    pub fn iteration_count(&self) -> u32 {
        self.schedule.count()
    }

    pub fn is_complete(&self) -> bool {
        self.schedule.is_complete()
    }

    /// Dimensions of the allocated accumulation surface, if any.
    pub fn surface_size(&self) -> Option<ImageSize> {
        self.surface.as_ref().map(|s| {
            let (w, h) = s.pages.dimensions();
            ImageSize::new(w, h)
        })
    }

    /// Records a display-surface size change; applied at the next tick.
    /// Reallocation happens only when the pixel dimensions actually change.
    pub fn on_resize(&mut self, size: ImageSize) {
        self.pending.resize = Some(size);
    }

    /// Records a pan movement of `(dx, dy)` pixels: the displayed content
    /// shifts by that amount on screen. Iteration advancement freezes until
    /// [`on_pan_end`](Self::on_pan_end).
    pub fn on_pan_delta(&mut self, dx: i32, dy: i32) {
        self.scrolling = true;
        self.pending.scroll_delta.0 += dx;
        self.pending.scroll_delta.1 += dy;
    }

    /// Ends the pan gesture; the next tick resumes accumulation.
    pub fn on_pan_end(&mut self) {
        self.scrolling = false;
    }

    /// Discards accumulated refinement. The iteration count drops to zero
    /// immediately; both pages are zeroed in place at the next tick, with no
    /// reallocation.
    pub fn reset(&mut self) {
        self.pending.reset = true;
        self.schedule.reset();
    }

    /// Replaces the complex-plane window. Any actual change discards the
    /// accumulated state via the reset path.
    pub fn set_window(&mut self, window: ComplexRect) {
        if window != self.window {
            self.window = window;
            self.reset();
        }
    }

    /// Runs one frame: consumes pending events, then either a refinement
    /// pass (reading the current page, writing the other, flipping parity)
    /// or, mid-pan, a translate pass straight to the display target.
    ///
    /// A missing or zero-dimension surface makes the frame a silent no-op.
    pub async fn on_frame_tick(&mut self, target: &wgpu::TextureView) -> Result<(), GpuError> {
        self.apply_pending().await?;

        let Some(surface) = &mut self.surface else {
            return Ok(());
        };
        if surface.geometry.is_empty() {
            return Ok(());
        }
        let (groups_x, groups_y) = surface.geometry.groups_per_grid;

        if self.scrolling {
            let args = ScrollArgs::encode(self.scroll_offset);
            self.context
                .queue
                .write_buffer(&self.scroll_args, 0, bytemuck::bytes_of(&args));

            let bind_group = self
                .context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("translate-bind-group"),
                    layout: &surface.translate.get_bind_group_layout(0),
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(target),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(
                                surface.pages.current_view(),
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: self.scroll_args.as_entire_binding(),
                        },
                    ],
                });

            let mut encoder =
                self.context
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("translate-encoder"),
                    });
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("translate-pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&surface.translate);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(groups_x, groups_y, 1);
            }
            self.context.queue.submit(std::iter::once(encoder.finish()));
            // No schedule advance and no parity flip while scrolling.
        } else {
            let step = self.schedule.advance();
            let args = RefineArgs::encode(self.schedule.count(), step, &self.window);
            self.context
                .queue
                .write_buffer(&self.refine_args, 0, bytemuck::bytes_of(&args));

            let bind_group = self
                .context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("refine-bind-group"),
                    layout: &surface.refine.get_bind_group_layout(0),
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(target),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(
                                surface.pages.current_view(),
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::TextureView(surface.pages.next_view()),
                        },
                        wgpu::BindGroupEntry {
                            binding: 3,
                            resource: self.refine_args.as_entire_binding(),
                        },
                    ],
                });

            let mut encoder =
                self.context
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("refine-encoder"),
                    });
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("refine-pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&surface.refine);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(groups_x, groups_y, 1);
            }
            self.context.queue.submit(std::iter::once(encoder.finish()));
            surface.pages.flip();
        }

        Ok(())
    }

    /// Reads the current accumulation page back to host memory. Diagnostic
    /// aid; returns an empty vector when no surface is allocated.
    pub async fn read_accumulation(&self) -> Result<Vec<f32>, GpuError> {
        match &self.surface {
            Some(surface) => surface.pages.read_current(&self.context).await,
            None => Ok(Vec::new()),
        }
    }

    async fn apply_pending(&mut self) -> Result<(), GpuError> {
        let pending = std::mem::take(&mut self.pending);

        if let Some(size) = pending.resize {
            let current = self
                .surface
                .as_ref()
                .map(|s| s.pages.dimensions())
                .unwrap_or((0, 0));
            if current != (size.width, size.height) {
                self.allocate_surface(size).await?;
            }
        }

        if pending.reset {
            if let Some(surface) = &self.surface {
                surface.pages.zero(&self.context);
            }
            self.schedule.reset();
        }

        if pending.scroll_delta != (0, 0) {
            self.scroll_offset.0 += pending.scroll_delta.0;
            self.scroll_offset.1 += pending.scroll_delta.1;
            if let Some(surface) = &self.surface {
                // Content moving right/down on screen means the window moves
                // left/up in the plane (imaginary axis points up).
                let (w, h) = surface.pages.dimensions();
                let delta = Complex::new(
                    -(pending.scroll_delta.0 as f64 / w as f64) * self.window.width(),
                    (pending.scroll_delta.1 as f64 / h as f64) * self.window.height(),
                );
                self.window.translate(delta);
            }
        }
        if !self.scrolling {
            self.scroll_offset = (0, 0);
        }

        Ok(())
    }

    async fn allocate_surface(&mut self, size: ImageSize) -> Result<(), GpuError> {
        self.surface = None;
        self.schedule.reset();

        if size.is_empty() {
            debug!("surface resized to zero dimension; dispatch disabled");
            return Ok(());
        }

        let pages = AccumulationPages::allocate(&self.context, size.width, size.height).await?;
        let geometry = select_dispatch_geometry(self.context.limits(), size.width, size.height);
        info!(
            "surface {}x{}: threads per group {:?}, groups per grid {:?}",
            size.width, size.height, geometry.threads_per_group, geometry.groups_per_grid
        );

        let constants = HashMap::from([
            ("group_width".to_string(), geometry.threads_per_group.0 as f64),
            (
                "group_height".to_string(),
                geometry.threads_per_group.1 as f64,
            ),
        ]);
        let refine = self
            .context
            .create_pipeline("refine-pipeline", &self.refine_module, "refine", &constants)
            .await?;
        let translate = self
            .context
            .create_pipeline(
                "translate-pipeline",
                &self.translate_module,
                "translate",
                &constants,
            )
            .await?;

        self.surface = Some(SurfaceState {
            pages,
            geometry,
            refine,
            translate,
        });
        Ok(())
    }
}
