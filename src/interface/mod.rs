pub mod fixture;
pub mod misc;
pub mod types;
