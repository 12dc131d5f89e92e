pub mod project;
pub mod rasterize;
pub mod read;
pub mod render;
pub mod shade;
pub mod stl;
pub mod surface;
pub mod tui;
