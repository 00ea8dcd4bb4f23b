pub mod blob;
pub mod hsv;
pub mod mask;
