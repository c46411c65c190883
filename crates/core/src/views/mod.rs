pub mod legend;
pub mod time_axis;
pub mod timeline;
