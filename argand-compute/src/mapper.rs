use argand_core::{Complex, ComplexRect, ImageSize, PixelPoint};

/// Maps a pixel coordinate onto the complex-plane window.
///
/// Pixel (0,0) maps exactly to the window's top-left corner; pixel
/// (w−1, h−1) lands strictly inside the window (the bottom-right corner is
/// an exclusive bound reached only at the off-grid coordinate (w, h)).
/// Pure and total for any non-empty `image_size`.
pub fn pixel_to_complex(point: PixelPoint, image_size: ImageSize, window: &ComplexRect) -> Complex {
    let tl = window.top_left();
    let br = window.bottom_right();
    let width = image_size.width as f64;
    let height = image_size.height as f64;

    Complex::new(
        tl.re + (point.x as f64 / width) * (br.re - tl.re),
        tl.im + (point.y as f64 / height) * (br.im - tl.im),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ComplexRect {
        ComplexRect::new(Complex::new(-2.0, 2.0), Complex::new(2.0, -2.0))
    }

    #[test]
    fn origin_pixel_maps_exactly_to_top_left() {
        for (w, h) in [(1, 1), (7, 3), (1024, 768)] {
            let size = ImageSize::new(w, h);
            let c = pixel_to_complex(PixelPoint::new(0, 0), size, &window());
            // Exact, not epsilon, equality.
            assert_eq!(c.re, window().top_left().re);
            assert_eq!(c.im, window().top_left().im);
        }
    }

    #[test]
    fn last_pixel_stays_strictly_inside_the_window() {
        let size = ImageSize::new(10, 10);
        let c = pixel_to_complex(PixelPoint::new(9, 9), size, &window());
        assert!(c.re < window().bottom_right().re);
        assert!(c.im > window().bottom_right().im);
    }

    #[test]
    fn mapping_is_monotonic_in_each_axis() {
        let size = ImageSize::new(64, 64);
        let w = window();
        for i in 1..64 {
            let prev_x = pixel_to_complex(PixelPoint::new(i - 1, 0), size, &w);
            let next_x = pixel_to_complex(PixelPoint::new(i, 0), size, &w);
            assert!(next_x.re > prev_x.re);

            let prev_y = pixel_to_complex(PixelPoint::new(0, i - 1), size, &w);
            let next_y = pixel_to_complex(PixelPoint::new(0, i), size, &w);
            // Imaginary axis decreases downward in pixel space.
            assert!(next_y.im < prev_y.im);
        }
    }

    #[test]
    fn midpoint_maps_to_window_center() {
        let size = ImageSize::new(4, 4);
        let c = pixel_to_complex(PixelPoint::new(2, 2), size, &window());
        assert_eq!(c, Complex::ZERO);
    }
}
