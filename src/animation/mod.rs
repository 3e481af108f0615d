pub mod ease;
pub mod spring;
pub mod track;
pub mod tween;
