//! Renders a Mandelbrot set to `mandelbrot.png` through the file pipeline.
//!
//! Run with `RUST_LOG=debug` to watch render progress.

use argand_compute::{
    render, Complex, ComplexRect, ImageFileSink, ImageSize, MandelbrotComputer, ModulusColorizer,
    PixelSink,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let size = ImageSize::new(1024, 1024);
    let window = ComplexRect::new(Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
    let computer = MandelbrotComputer::new(2000);
    let colorizer = ModulusColorizer::default();
    let sink = ImageFileSink::create("mandelbrot.png", size, true);

    render(size, &window, &computer, &colorizer, &sink)?;
    sink.flush()?;

    println!("wrote {}", sink.path().display());
    Ok(())
}
