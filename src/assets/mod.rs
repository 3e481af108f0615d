pub mod color;
pub mod decode;
pub mod frames;
pub mod loader;
pub mod svg_raster;
