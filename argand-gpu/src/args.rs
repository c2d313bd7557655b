//! Kernel argument buffers with an explicit, versioned layout.
//!
//! Every field is written by name into a `#[repr(C)]` Pod struct whose byte
//! layout matches the WGSL uniform declaration, with a leading version tag so
//! a layout change cannot silently desynchronize host and kernel.

use argand_core::ComplexRect;
use bytemuck::{Pod, Zeroable};

/// Version tag stamped into every argument buffer.
pub const KERNEL_ARGS_LAYOUT_VERSION: u32 = 1;

/// Arguments for the refinement kernel (version 1 layout, 32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RefineArgs {
    pub layout_version: u32,
    /// Total iterations accumulated once this pass completes.
    pub iteration_count: u32,
    /// Iterations each still-bounded pixel advances during this pass.
    pub iterations_per_frame: u32,
    pub _pad0: u32,
    /// Complex window top-left corner as (re, im).
    pub window_top_left: [f32; 2],
    /// Complex window bottom-right corner as (re, im).
    pub window_bottom_right: [f32; 2],
}

impl RefineArgs {
    pub fn encode(iteration_count: u32, iterations_per_frame: u32, window: &ComplexRect) -> Self {
        let tl = window.top_left();
        let br = window.bottom_right();
        Self {
            layout_version: KERNEL_ARGS_LAYOUT_VERSION,
            iteration_count,
            iterations_per_frame,
            _pad0: 0,
            window_top_left: [tl.re as f32, tl.im as f32],
            window_bottom_right: [br.re as f32, br.im as f32],
        }
    }
}

/// Arguments for the translate kernel (version 1 layout, 16 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ScrollArgs {
    pub layout_version: u32,
    pub _pad0: u32,
    /// Pixel shift applied to the displayed content, (dx, dy).
    pub offset: [i32; 2],
}

impl ScrollArgs {
    pub fn encode(offset: (i32, i32)) -> Self {
        Self {
            layout_version: KERNEL_ARGS_LAYOUT_VERSION,
            _pad0: 0,
            offset: [offset.0, offset.1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argand_core::Complex;

    #[test]
    fn refine_args_layout_is_stable() {
        assert_eq!(std::mem::size_of::<RefineArgs>(), 32);

        let window = ComplexRect::new(Complex::new(-2.0, 2.0), Complex::new(2.0, -2.0));
        let args = RefineArgs::encode(64, 64, &window);
        let bytes = bytemuck::bytes_of(&args);

        assert_eq!(&bytes[0..4], &KERNEL_ARGS_LAYOUT_VERSION.to_le_bytes());
        assert_eq!(&bytes[4..8], &64u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &(-2.0f32).to_le_bytes());
        assert_eq!(&bytes[20..24], &2.0f32.to_le_bytes());
    }

    #[test]
    fn scroll_args_layout_is_stable() {
        assert_eq!(std::mem::size_of::<ScrollArgs>(), 16);

        let args = ScrollArgs::encode((5, -3));
        let bytes = bytemuck::bytes_of(&args);
        assert_eq!(&bytes[0..4], &KERNEL_ARGS_LAYOUT_VERSION.to_le_bytes());
        assert_eq!(&bytes[8..12], &5i32.to_le_bytes());
        assert_eq!(&bytes[12..16], &(-3i32).to_le_bytes());
    }
}
