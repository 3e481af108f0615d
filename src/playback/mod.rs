pub mod fit;
pub mod gate;
pub mod mapper;
pub mod renderer;
