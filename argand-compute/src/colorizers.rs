use std::marker::PhantomData;

use argand_core::Color;

/// Maps an escape count to a color.
///
/// Implementations must be pure, total and deterministic for every input,
/// including 0 ("never escaped") and values at or beyond the iteration cap.
pub trait Colorizer {
    type Value;
    type Channel;

    fn color_at(&self, value: Self::Value) -> Color<Self::Channel>;
}

/// Colors by wrapping the escape count with per-channel modulo divisors.
///
/// Each channel computes `value % max`, then scales by `256 / max` to spread
/// the result over the full byte range. Wrapping rather than saturating is
/// the contract: `color_at(0)` and `color_at(red_max)` yield the same red
/// channel.
#[derive(Debug, Clone, Copy)]
pub struct ModulusColorizer {
    red_max: u8,
    green_max: u8,
    blue_max: u8,
}

impl ModulusColorizer {
    /// # Panics
    /// Panics if any divisor is zero.
    pub fn new(red_max: u8, green_max: u8, blue_max: u8) -> Self {
        assert!(
            red_max > 0 && green_max > 0 && blue_max > 0,
            "modulo divisors must be non-zero"
        );
        Self {
            red_max,
            green_max,
            blue_max,
        }
    }

    fn channel(value: u32, max: u8) -> u8 {
        let wrapped = value % max as u32;
        let scale = 256 / max as u32;
        (wrapped * scale) as u8
    }
}

impl Default for ModulusColorizer {
    fn default() -> Self {
        Self::new(128, 64, 32)
    }
}

impl Colorizer for ModulusColorizer {
    type Value = u32;
    type Channel = u8;

    fn color_at(&self, value: u32) -> Color<u8> {
        Color::new(
            Self::channel(value, self.red_max),
            Self::channel(value, self.green_max),
            Self::channel(value, self.blue_max),
            255,
        )
    }
}

/// Adapts an arbitrary closure into a [`Colorizer`].
pub struct FnColorizer<F, V, T> {
    function: F,
    _marker: PhantomData<fn(V) -> T>,
}

impl<F, V, T> FnColorizer<F, V, T>
where
    F: Fn(V) -> Color<T>,
{
    pub fn new(function: F) -> Self {
        Self {
            function,
            _marker: PhantomData,
        }
    }
}

impl<F, V, T> Colorizer for FnColorizer<F, V, T>
where
    F: Fn(V) -> Color<T>,
{
    type Value = V;
    type Channel = T;

    fn color_at(&self, value: V) -> Color<T> {
        (self.function)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_red_max_share_the_red_channel() {
        let colorizer = ModulusColorizer::new(128, 64, 32);
        assert_eq!(colorizer.color_at(0).red, colorizer.color_at(128).red);
    }

    #[test]
    fn channels_scale_to_the_byte_range() {
        let colorizer = ModulusColorizer::default();
        let color = colorizer.color_at(1);
        assert_eq!(color, Color::new(2, 4, 8, 255));

        let bright = colorizer.color_at(127);
        assert_eq!(bright.red, 254);
    }

    #[test]
    fn deterministic_beyond_any_cap() {
        let colorizer = ModulusColorizer::default();
        assert_eq!(colorizer.color_at(u32::MAX), colorizer.color_at(u32::MAX));
        // 2000 % 128 == 80, 2000 % 64 == 16, 2000 % 32 == 16
        assert_eq!(colorizer.color_at(2000), Color::new(160, 64, 128, 255));
    }

    #[test]
    fn alpha_is_opaque() {
        assert_eq!(ModulusColorizer::default().color_at(42).alpha, 255);
    }

    #[test]
    fn closure_colorizer_delegates() {
        let grayscale = FnColorizer::new(|value: u32| {
            let v = (value % 256) as u8;
            Color::new(v, v, v, 255)
        });
        assert_eq!(grayscale.color_at(300), Color::new(44, 44, 44, 255));
    }
}
