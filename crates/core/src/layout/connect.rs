use std::collections::HashSet;

use lineage_protocol::{Connection, ConnectionType, Emphasis, PathSegment, Point, SharedStr};
use serde::{Deserialize, Serialize};

use super::position::TimelineLayout;

/// Which person the user is pointing at, if any.
///
/// A click selection outranks hover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Focus {
    pub selected: Option<SharedStr>,
    pub hovered: Option<SharedStr>,
}

impl Focus {
    pub fn active(&self) -> Option<&SharedStr> {
        self.selected.as_ref().or(self.hovered.as_ref())
    }
}

/// The active person plus everyone one connection away from them.
/// Empty when nothing is active.
pub fn related_ids(connections: &[Connection], active: Option<&str>) -> HashSet<SharedStr> {
    let Some(active) = active else {
        return HashSet::new();
    };
    let mut ids = HashSet::from([SharedStr::from(active)]);
    for conn in connections.iter().filter(|c| c.touches(active)) {
        ids.insert(conn.from.clone());
        ids.insert(conn.to.clone());
    }
    ids
}

/// Emphasis of bars and connectors for one focus state.
#[derive(Debug, Clone, Default)]
pub struct Highlight {
    related: HashSet<SharedStr>,
}

impl Highlight {
    pub fn new(connections: &[Connection], focus: &Focus) -> Self {
        Self {
            related: related_ids(connections, focus.active().map(SharedStr::as_str)),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.related.is_empty()
    }

    pub fn person(&self, id: &str) -> Emphasis {
        self.resolve(self.related.contains(id))
    }

    pub fn connection(&self, conn: &Connection) -> Emphasis {
        self.resolve(
            self.related.contains(conn.from.as_str()) && self.related.contains(conn.to.as_str()),
        )
    }

    fn resolve(&self, related: bool) -> Emphasis {
        match (self.is_active(), related) {
            (false, _) => Emphasis::Normal,
            (true, true) => Emphasis::Highlighted,
            (true, false) => Emphasis::Dimmed,
        }
    }
}

/// S-shaped curve between two bar centers: a quadratic from the start to
/// the vertical midpoint, bending at the horizontal midpoint, then another
/// quadratic down to the end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorPath {
    pub start: Point,
    pub end: Point,
}

impl ConnectorPath {
    pub fn between(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn segments(&self) -> [PathSegment; 2] {
        let mid_x = (self.start.x + self.end.x) / 2.0;
        let mid_y = (self.start.y + self.end.y) / 2.0;
        [
            PathSegment::QuadTo {
                ctrl: Point::new(mid_x, self.start.y),
                to: Point::new(mid_x, mid_y),
            },
            PathSegment::QuadTo {
                ctrl: Point::new(mid_x, self.end.y),
                to: self.end,
            },
        ]
    }
}

/// A connection with both ends laid out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub from: SharedStr,
    pub to: SharedStr,
    pub kind: ConnectionType,
    pub path: ConnectorPath,
    pub emphasis: Emphasis,
}

/// Route every connection whose two people both have bars. Others are
/// skipped silently; [`crate::data::check_quality`] reports them.
pub fn route_connectors(
    connections: &[Connection],
    layout: &TimelineLayout,
    highlight: &Highlight,
) -> Vec<Connector> {
    connections
        .iter()
        .filter_map(|conn| {
            let from = layout.bar(&conn.from)?;
            let to = layout.bar(&conn.to)?;
            Some(Connector {
                from: conn.from.clone(),
                to: conn.to.clone(),
                kind: conn.kind,
                path: ConnectorPath::between(from.anchor(), to.anchor()),
                emphasis: highlight.connection(conn),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(from: &str, to: &str) -> Connection {
        Connection {
            from: from.into(),
            to: to.into(),
            kind: ConnectionType::StudentTeacher,
            label: None,
        }
    }

    #[test]
    fn related_ids_cover_direct_neighbors() {
        let conns = [conn("viotti", "baillot"), conn("baillot", "habeneck"), conn("x", "y")];
        let ids = related_ids(&conns, Some("baillot"));
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("viotti"));
        assert!(ids.contains("habeneck"));
        assert!(!ids.contains("x"));

        assert!(related_ids(&conns, None).is_empty());
        // A person with no connections still highlights themself.
        assert_eq!(related_ids(&conns, Some("alone")).len(), 1);
    }

    #[test]
    fn selection_outranks_hover() {
        let focus = Focus {
            selected: Some("a".into()),
            hovered: Some("b".into()),
        };
        assert_eq!(focus.active().map(SharedStr::as_str), Some("a"));
        let hover_only = Focus {
            selected: None,
            hovered: Some("b".into()),
        };
        assert_eq!(hover_only.active().map(SharedStr::as_str), Some("b"));
        assert!(Focus::default().active().is_none());
    }

    #[test]
    fn emphasis_follows_focus() {
        let conns = [conn("a", "b"), conn("c", "d")];
        let none = Highlight::new(&conns, &Focus::default());
        assert_eq!(none.person("a"), Emphasis::Normal);
        assert_eq!(none.connection(&conns[1]), Emphasis::Normal);

        let focus = Focus {
            selected: None,
            hovered: Some("a".into()),
        };
        let hl = Highlight::new(&conns, &focus);
        assert_eq!(hl.person("b"), Emphasis::Highlighted);
        assert_eq!(hl.person("c"), Emphasis::Dimmed);
        assert_eq!(hl.connection(&conns[0]), Emphasis::Highlighted);
        assert_eq!(hl.connection(&conns[1]), Emphasis::Dimmed);
    }

    #[test]
    fn path_bends_at_midpoint() {
        let path = ConnectorPath::between(Point::new(0.0, 10.0), Point::new(100.0, 70.0));
        let [first, second] = path.segments();
        assert_eq!(
            first,
            PathSegment::QuadTo {
                ctrl: Point::new(50.0, 10.0),
                to: Point::new(50.0, 40.0),
            }
        );
        assert_eq!(second.end(), Point::new(100.0, 70.0));
    }
}
