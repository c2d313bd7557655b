pub mod color;
pub mod complex;
pub mod complex_rect;
pub mod pixel;

pub use color::{Color, ColorBuffer};
pub use complex::Complex;
pub use complex_rect::ComplexRect;
pub use pixel::{ImageSize, PixelPoint};
