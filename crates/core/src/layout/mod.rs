pub mod connect;
pub mod lanes;
pub mod position;
pub mod scale;

pub use connect::{Connector, ConnectorPath, Focus, Highlight, related_ids, route_connectors};
pub use lanes::{LaneAssignment, TimedEntity, lane_count, pack_lanes};
pub use position::{Bar, LayoutConfig, TimelineLayout, year_domain};
pub use scale::{ScaleError, TimelineScale, ZoomPolicy};
