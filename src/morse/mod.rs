// src/morse/mod.rs  -  Encoder, Timing
pub mod encoder;
pub mod timing;

pub use encoder::encode;
pub use timing::Timing;
