//! GPU-accelerated progressive fractal rendering using wgpu.

mod args;
mod device;
mod dispatch;
mod driver;
mod error;
mod pages;
mod schedule;

pub use args::{RefineArgs, ScrollArgs, KERNEL_ARGS_LAYOUT_VERSION};
pub use device::{GpuAvailability, GpuContext};
pub use dispatch::{
    select_dispatch_geometry, DeviceLimits, DispatchGeometry, DEFAULT_WAVE_WIDTH,
};
pub use driver::{DriverConfig, ProgressiveDriver};
pub use error::GpuError;
pub use pages::AccumulationPages;
pub use schedule::IterationSchedule;
