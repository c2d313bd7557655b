//! GPU device initialization and resource creation.

use std::collections::HashMap;

use crate::dispatch::DeviceLimits;
use crate::error::GpuError;

/// Holds the wgpu device and queue.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

/// Result of GPU initialization attempt.
pub enum GpuAvailability {
    Available(GpuContext),
    Unavailable(String),
}

impl GpuContext {
    /// Attempt to initialize GPU. Returns Unavailable on any failure.
    pub async fn try_init() -> GpuAvailability {
        match Self::init_internal().await {
            Ok(ctx) => GpuAvailability::Available(ctx),
            Err(e) => {
                log::warn!("GPU initialization failed: {e}");
                GpuAvailability::Unavailable(e.to_string())
            }
        }
    }

    async fn init_internal() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::DeviceUnavailable)?;

        log::info!("GPU adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("argand"),
                    required_features: wgpu::Features::empty(),
                    // Adapter limits directly - compute kernels need storage
                    // textures beyond the downlevel defaults
                    required_limits: adapter.limits(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self { device, queue })
    }

    /// Limits relevant to dispatch geometry selection.
    pub fn limits(&self) -> DeviceLimits {
        DeviceLimits::from_wgpu(&self.device.limits())
    }

    /// Compiles a WGSL kernel source into a shader module.
    ///
    /// Invalid source is reported as [`GpuError::KernelCompilation`] through a
    /// validation error scope rather than the uncaptured-error handler.
    pub async fn create_shader(
        &self,
        label: &str,
        source: &str,
    ) -> Result<wgpu::ShaderModule, GpuError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        if let Some(error) = self.device.pop_error_scope().await {
            return Err(GpuError::KernelCompilation(error.to_string()));
        }
        Ok(module)
    }

    /// Builds a compute pipeline from a compiled module, specializing
    /// pipeline-overridable constants (the kernels use them for their
    /// workgroup dimensions).
    pub async fn create_pipeline(
        &self,
        label: &str,
        module: &wgpu::ShaderModule,
        entry_point: &str,
        constants: &HashMap<String, f64>,
    ) -> Result<wgpu::ComputePipeline, GpuError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: None,
                module,
                entry_point: Some(entry_point),
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants,
                    ..Default::default()
                },
                cache: None,
            });
        if let Some(error) = self.device.pop_error_scope().await {
            return Err(GpuError::KernelCompilation(error.to_string()));
        }
        Ok(pipeline)
    }

    /// Allocates one rgba32float accumulation texture. Out-of-memory failures
    /// surface as [`GpuError::ResourceAllocation`].
    pub async fn create_accumulation_texture(
        &self,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<wgpu::Texture, GpuError> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        if let Some(error) = self.device.pop_error_scope().await {
            return Err(GpuError::ResourceAllocation(error.to_string()));
        }
        Ok(texture)
    }

    /// Allocates a small uniform buffer for kernel arguments.
    pub fn create_argument_buffer(&self, label: &str, size: u64) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}
