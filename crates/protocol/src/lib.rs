pub mod commands;
pub mod dataset;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{Emphasis, Paint, PathSegment, RenderCommand, TextAlign};
pub use dataset::{Connection, ConnectionType, Era, InstrumentConfig, InstrumentData, Person, Role};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect};
