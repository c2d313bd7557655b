//! Pixel output sinks: an in-memory surface and a file-backed image.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use argand_core::{Color, ColorBuffer, ImageSize, PixelPoint};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("write at ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Consumer of (pixel, color) pairs produced by a render pass.
///
/// `write` takes `&self` because the pipeline fans out over rows: a sink must
/// either tolerate concurrent writes to disjoint pixel indices without
/// external locking, or serialize internally.
pub trait PixelSink {
    type Channel;

    fn write(&self, point: PixelPoint, color: Color<Self::Channel>) -> Result<(), SinkError>;

    /// Makes all written pixels durable (for file-backed sinks, encodes the
    /// container). In-memory sinks need no flushing.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// In-memory RGBA8 surface.
///
/// Each pixel packs its four channels into one `AtomicU32`, so disjoint
/// concurrent writes need no locking.
pub struct MemorySink {
    size: ImageSize,
    pixels: Vec<AtomicU32>,
}

impl MemorySink {
    pub fn new(size: ImageSize) -> Self {
        Self {
            size,
            pixels: (0..size.pixel_count()).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    fn pack(color: Color<u8>) -> u32 {
        u32::from_le_bytes([color.red, color.green, color.blue, color.alpha])
    }

    fn unpack(packed: u32) -> Color<u8> {
        Color::from_array(packed.to_le_bytes())
    }

    /// Color last written at `point`, or transparent black if never written.
    ///
    /// # Panics
    /// Panics if `point` lies outside the surface.
    pub fn color_at(&self, point: PixelPoint) -> Color<u8> {
        Self::unpack(self.pixels[self.size.index_of(point)].load(Ordering::Relaxed))
    }

    /// Consumes the sink into an interleaved RGBA channel buffer.
    pub fn into_buffer(self) -> ColorBuffer<u8> {
        let mut data = Vec::with_capacity(self.size.pixel_count() * 4);
        for pixel in &self.pixels {
            data.extend_from_slice(&pixel.load(Ordering::Relaxed).to_le_bytes());
        }
        ColorBuffer::new(data)
    }
}

impl PixelSink for MemorySink {
    type Channel = u8;

    fn write(&self, point: PixelPoint, color: Color<u8>) -> Result<(), SinkError> {
        if point.x >= self.size.width || point.y >= self.size.height {
            return Err(SinkError::OutOfBounds {
                x: point.x,
                y: point.y,
                width: self.size.width,
                height: self.size.height,
            });
        }
        self.pixels[self.size.index_of(point)].store(Self::pack(color), Ordering::Relaxed);
        Ok(())
    }
}

/// File-backed image sink.
///
/// Pixels accumulate in an internally-serialized buffer; `flush` encodes the
/// container at the given path (the format is chosen by extension, delegated
/// to the `image` crate). With `has_alpha` false the alpha channel is dropped
/// at encode time.
pub struct ImageFileSink {
    path: PathBuf,
    size: ImageSize,
    has_alpha: bool,
    pixels: Mutex<image::RgbaImage>,
}

impl ImageFileSink {
    pub fn create(path: impl Into<PathBuf>, size: ImageSize, has_alpha: bool) -> Self {
        Self {
            path: path.into(),
            size,
            has_alpha,
            pixels: Mutex::new(image::RgbaImage::new(size.width, size.height)),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }
}

impl PixelSink for ImageFileSink {
    type Channel = u8;

    fn write(&self, point: PixelPoint, color: Color<u8>) -> Result<(), SinkError> {
        if point.x >= self.size.width || point.y >= self.size.height {
            return Err(SinkError::OutOfBounds {
                x: point.x,
                y: point.y,
                width: self.size.width,
                height: self.size.height,
            });
        }
        let mut pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        pixels.put_pixel(
            point.x,
            point.y,
            image::Rgba([color.red, color.green, color.blue, color.alpha]),
        );
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        let pixels = self.pixels.lock().unwrap_or_else(PoisonError::into_inner);
        if self.has_alpha {
            pixels.save(&self.path)?;
        } else {
            image::DynamicImage::ImageRgba8(pixels.clone())
                .to_rgb8()
                .save(&self.path)?;
        }
        Ok(())
    }
}
