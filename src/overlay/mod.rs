pub mod cursor;
pub mod layer;
pub mod loader;
pub mod markup;
pub mod navbar;
pub mod panels;
