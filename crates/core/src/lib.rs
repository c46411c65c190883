pub mod data;
pub mod layout;
pub mod svg;
pub mod views;
