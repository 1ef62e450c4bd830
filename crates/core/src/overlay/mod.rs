pub mod glyphs;
pub mod renderer;
pub mod surface;
