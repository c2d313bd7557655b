//! GPU error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no usable GPU adapter found")]
    DeviceUnavailable,

    #[error("failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("kernel compilation failed: {0}")]
    KernelCompilation(String),

    #[error("buffer or texture allocation failed: {0}")]
    ResourceAllocation(String),

    #[error("buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),
}
