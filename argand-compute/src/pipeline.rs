//! Full-frame render pipeline: map → compute → colorize → write.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use argand_core::{ComplexRect, ImageSize, PixelPoint};
use log::{debug, info};
use rayon::prelude::*;
use thiserror::Error;

use crate::colorizers::Colorizer;
use crate::computers::EscapeTimeComputer;
use crate::mapper::pixel_to_complex;
use crate::sink::{PixelSink, SinkError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Renders one full frame: every pixel of `image_size` is mapped into
/// `window`, evaluated, colorized and written to `sink` exactly once.
///
/// Rows are fanned out across the rayon pool with no cross-row ordering
/// guarantee; the call joins all workers before returning, so every write is
/// visible once it does. Failure policy: the first sink write failure aborts
/// the whole in-flight pass and propagates — no further rows are started and
/// partial output is left undefined.
///
/// Progress (percentage, elapsed and per-segment time) is reported through
/// `log` and is purely advisory.
pub fn render<C, K, S>(
    image_size: ImageSize,
    window: &ComplexRect,
    computer: &C,
    colorizer: &K,
    sink: &S,
) -> Result<(), RenderError>
where
    C: EscapeTimeComputer + Sync,
    K: Colorizer<Value = C::Value> + Sync,
    S: PixelSink<Channel = K::Channel> + Sync,
{
    if image_size.is_empty() {
        return Ok(());
    }

    let start = Instant::now();
    let rows_done = AtomicU32::new(0);
    let last_report = Mutex::new(start);

    (0..image_size.height)
        .into_par_iter()
        .try_for_each(|y| -> Result<(), RenderError> {
            for x in 0..image_size.width {
                let point = PixelPoint::new(x, y);
                let c = pixel_to_complex(point, image_size, window);
                let value = computer.compute_point(c);
                let color = colorizer.color_at(value);
                sink.write(point, color)?;
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            let percent = done * 100 / image_size.height;
            let previous = (done - 1) * 100 / image_size.height;
            if percent / 10 != previous / 10 {
                let mut last = last_report.lock().unwrap_or_else(PoisonError::into_inner);
                let segment = last.elapsed();
                *last = Instant::now();
                debug!(
                    "render {percent}% complete, elapsed {:.2?}, segment {:.2?}",
                    start.elapsed(),
                    segment
                );
            }
            Ok(())
        })?;

    info!(
        "rendered {} pixels in {:.2?}",
        image_size.pixel_count(),
        start.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizers::ModulusColorizer;
    use crate::computers::MandelbrotComputer;
    use crate::sink::MemorySink;
    use argand_core::{Color, Complex};

    /// Sink that counts writes per pixel index.
    struct CountingSink {
        size: ImageSize,
        writes: Vec<AtomicU32>,
    }

    impl CountingSink {
        fn new(size: ImageSize) -> Self {
            Self {
                size,
                writes: (0..size.pixel_count()).map(|_| AtomicU32::new(0)).collect(),
            }
        }
    }

    impl PixelSink for CountingSink {
        type Channel = u8;

        fn write(&self, point: PixelPoint, _color: Color<u8>) -> Result<(), SinkError> {
            self.writes[self.size.index_of(point)].fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    /// Sink that fails on a single pixel.
    struct FailingSink {
        size: ImageSize,
        poison: PixelPoint,
    }

    impl PixelSink for FailingSink {
        type Channel = u8;

        fn write(&self, point: PixelPoint, _color: Color<u8>) -> Result<(), SinkError> {
            if point == self.poison {
                return Err(SinkError::OutOfBounds {
                    x: point.x,
                    y: point.y,
                    width: self.size.width,
                    height: self.size.height,
                });
            }
            Ok(())
        }
    }

    fn window() -> ComplexRect {
        ComplexRect::new(Complex::new(-2.0, 2.0), Complex::new(2.0, -2.0))
    }

    #[test]
    fn ten_by_ten_render_writes_each_pixel_exactly_once() {
        let size = ImageSize::new(10, 10);
        let sink = CountingSink::new(size);
        render(
            size,
            &window(),
            &MandelbrotComputer::new(50),
            &ModulusColorizer::default(),
            &sink,
        )
        .unwrap();

        let counts: Vec<u32> = sink
            .writes
            .iter()
            .map(|w| w.load(Ordering::Relaxed))
            .collect();
        assert_eq!(counts.len(), 100);
        assert!(counts.iter().all(|&c| c == 1), "counts were {counts:?}");
    }

    #[test]
    fn render_matches_direct_evaluation() {
        let size = ImageSize::new(16, 16);
        let computer = MandelbrotComputer::new(100);
        let colorizer = ModulusColorizer::default();
        let sink = MemorySink::new(size);

        render(size, &window(), &computer, &colorizer, &sink).unwrap();

        for y in 0..size.height {
            for x in 0..size.width {
                let point = PixelPoint::new(x, y);
                let c = pixel_to_complex(point, size, &window());
                let expected = colorizer.color_at(computer.compute_point(c));
                assert_eq!(sink.color_at(point), expected, "mismatch at {point:?}");
            }
        }
    }

    #[test]
    fn sink_failure_aborts_the_pass() {
        let size = ImageSize::new(8, 8);
        let sink = FailingSink {
            size,
            poison: PixelPoint::new(3, 4),
        };
        let result = render(
            size,
            &window(),
            &MandelbrotComputer::new(50),
            &ModulusColorizer::default(),
            &sink,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_surface_is_a_no_op() {
        let sink = CountingSink::new(ImageSize::new(0, 10));
        render(
            ImageSize::new(0, 10),
            &window(),
            &MandelbrotComputer::new(50),
            &ModulusColorizer::default(),
            &sink,
        )
        .unwrap();
        assert!(sink.writes.is_empty());
    }
}
