//! CPU rendering pipeline: plane mapping, escape-time computation,
//! colorization and pixel output.

pub mod colorizers;
pub mod computers;
pub mod mapper;
pub mod pipeline;
pub mod sink;

pub use colorizers::{Colorizer, FnColorizer, ModulusColorizer};
pub use computers::{CompositeComputer, EscapeTimeComputer, JuliaComputer, MandelbrotComputer};
pub use mapper::pixel_to_complex;
pub use pipeline::{render, RenderError};
pub use sink::{ImageFileSink, MemorySink, PixelSink, SinkError};

// Re-export core types for convenience
pub use argand_core::*;
