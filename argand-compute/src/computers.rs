use argand_core::Complex;

/// Per-point escape-time evaluation.
///
/// Implementations iterate an update function starting from the mapped point
/// and report how quickly the orbit diverges. A returned count of 0 means the
/// orbit never left the escape radius within the iteration cap.
pub trait EscapeTimeComputer {
    type Value;

    fn iteration_cap(&self) -> u32;

    fn compute_point(&self, c: Complex) -> Self::Value;
}

/// Escape radius shared by the Mandelbrot and Julia iterations.
const ESCAPE_RADIUS: f64 = 2.0;

/// The Mandelbrot set: z ← z² + C starting from z₀ = C.
///
/// Returns the 1-based iteration index at which `|z| > 2`, or 0 if the point
/// stays bounded for the whole cap.
#[derive(Debug, Clone, Copy)]
pub struct MandelbrotComputer {
    iteration_cap: u32,
}

impl MandelbrotComputer {
    pub fn new(iteration_cap: u32) -> Self {
        Self { iteration_cap }
    }
}

impl EscapeTimeComputer for MandelbrotComputer {
    type Value = u32;

    fn iteration_cap(&self) -> u32 {
        self.iteration_cap
    }

    fn compute_point(&self, c: Complex) -> u32 {
        let mut z = c;
        for it in 1..=self.iteration_cap {
            z = z * z + c;
            if z.modulus() > ESCAPE_RADIUS {
                return it;
            }
        }
        0
    }
}

/// A Julia set: z ← z² + c for a fixed parameter c, starting from z₀ = C.
#[derive(Debug, Clone, Copy)]
pub struct JuliaComputer {
    iteration_cap: u32,
    c: Complex,
}

impl JuliaComputer {
    pub fn new(iteration_cap: u32, c: Complex) -> Self {
        Self { iteration_cap, c }
    }
}

impl EscapeTimeComputer for JuliaComputer {
    type Value = u32;

    fn iteration_cap(&self) -> u32 {
        self.iteration_cap
    }

    fn compute_point(&self, point: Complex) -> u32 {
        let mut z = point;
        for it in 1..=self.iteration_cap {
            z = z * z + self.c;
            if z.modulus() > ESCAPE_RADIUS {
                return it;
            }
        }
        0
    }
}

/// Runs two computers on the same point and merges their outputs through a
/// caller-supplied pure combinator.
pub struct CompositeComputer<A, B, F> {
    first: A,
    second: B,
    combine: F,
}

impl<A, B, F> CompositeComputer<A, B, F> {
    pub fn new(first: A, second: B, combine: F) -> Self {
        Self {
            first,
            second,
            combine,
        }
    }
}

impl<A, B, F, V> EscapeTimeComputer for CompositeComputer<A, B, F>
where
    A: EscapeTimeComputer,
    B: EscapeTimeComputer,
    F: Fn(A::Value, B::Value) -> V,
{
    type Value = V;

    fn iteration_cap(&self) -> u32 {
        self.first.iteration_cap().max(self.second.iteration_cap())
    }

    fn compute_point(&self, c: Complex) -> V {
        (self.combine)(self.first.compute_point(c), self.second.compute_point(c))
    }
}
