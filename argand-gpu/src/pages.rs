//! Ping-pong accumulation surface.

use crate::device::GpuContext;
use crate::error::GpuError;

/// Bytes per rgba32float texel.
const TEXEL_BYTES: u32 = 16;

/// The two equal-size accumulation textures, indexed by a toggled parity bit.
///
/// The page at `parity` ("current") holds the latest completed refinement
/// state; the other page is the write target of the next refinement pass.
/// [`flip`](Self::flip) exchanges the roles after a frame's kernel work has
/// been submitted. Pages are only ever addressed through the parity index,
/// never held by reference across a frame.
pub struct AccumulationPages {
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    width: u32,
    height: u32,
    parity: usize,
}

impl AccumulationPages {
    /// Allocates and zeroes both pages.
    pub async fn allocate(
        context: &GpuContext,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let page_a = context
            .create_accumulation_texture("accumulation-page-a", width, height)
            .await?;
        let page_b = context
            .create_accumulation_texture("accumulation-page-b", width, height)
            .await?;
        let views = [
            page_a.create_view(&wgpu::TextureViewDescriptor::default()),
            page_b.create_view(&wgpu::TextureViewDescriptor::default()),
        ];

        let pages = Self {
            textures: [page_a, page_b],
            views,
            width,
            height,
            parity: 0,
        };
        pages.zero(context);
        Ok(pages)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// View of the page holding the latest completed state.
    pub fn current_view(&self) -> &wgpu::TextureView {
        &self.views[self.parity]
    }

    /// View of the page the next refinement pass writes into.
    pub fn next_view(&self) -> &wgpu::TextureView {
        &self.views[self.parity ^ 1]
    }

    /// Exchanges page roles after a completed refinement frame.
    pub fn flip(&mut self) {
        self.parity ^= 1;
    }

    /// Zeroes both pages in place without reallocating.
    pub fn zero(&self, context: &GpuContext) {
        let row_bytes = self.width * TEXEL_BYTES;
        let zeros = vec![0u8; (row_bytes * self.height) as usize];
        for texture in &self.textures {
            context.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &zeros,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(row_bytes),
                    rows_per_image: Some(self.height),
                },
                wgpu::Extent3d {
                    width: self.width,
                    height: self.height,
                    depth_or_array_layers: 1,
                },
            );
        }
    }

    /// Reads the current page back to host memory as interleaved RGBA f32,
    /// row-major. Diagnostic aid; the render path never reads pages back.
    pub async fn read_current(&self, context: &GpuContext) -> Result<Vec<f32>, GpuError> {
        let row_bytes = self.width * TEXEL_BYTES;
        // copy_texture_to_buffer requires 256-byte row alignment.
        let padded_row_bytes = row_bytes.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

        let staging = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("accumulation-staging"),
            size: (padded_row_bytes * self.height) as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("accumulation-readback-encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.textures[self.parity],
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        context.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = futures_channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        context.device.poll(wgpu::Maintain::Wait);

        rx.await
            .map_err(|_| GpuError::ResourceAllocation("readback channel closed".into()))?
            .map_err(GpuError::BufferMap)?;

        let mut texels = Vec::with_capacity((self.width * self.height * 4) as usize);
        {
            let view = slice.get_mapped_range();
            for row in 0..self.height {
                let start = (row * padded_row_bytes) as usize;
                let end = start + row_bytes as usize;
                texels.extend_from_slice(bytemuck::cast_slice(&view[start..end]));
            }
        }
        staging.unmap();

        Ok(texels)
    }
}
