pub mod affine;
pub mod stack;
