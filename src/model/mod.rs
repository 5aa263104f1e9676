pub mod animation;
pub mod style;
