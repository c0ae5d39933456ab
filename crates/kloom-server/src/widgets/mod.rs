pub mod frame_box;
pub mod meter;
pub mod noise;
pub mod text;
