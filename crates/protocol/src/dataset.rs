use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// One instrument's timeline: the eras behind it, the people on it, and the
/// relationships drawn between them.
///
/// This is the shape of the per-instrument JSON resource the front end
/// loads. Layout never mutates it; lanes and pixel positions are derived
/// fresh from it on every change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentData {
    pub instrument: String,
    pub eras: Vec<Era>,
    pub people: Vec<Person>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl InstrumentData {
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }
}

/// Selects a subset of a shared people pool for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentConfig {
    pub instrument: String,
    pub eras: Vec<Era>,
    pub people_ids: Vec<String>,
}

/// A colored background band (Baroque, Classical, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Era {
    pub name: String,
    pub start_year: i32,
    pub end_year: i32,
    /// CSS hex color, e.g. `#F5E6CC`.
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Composer,
    Player,
    Both,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Composer => write!(f, "Composer"),
            Self::Player => write!(f, "Player"),
            Self::Both => write!(f, "Composer & Player"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: SharedStr,
    pub name: SharedStr,
    pub born: i32,
    /// The birth year is an estimate ("1653 (est.)").
    #[serde(default)]
    pub born_estimated: bool,
    /// `None` while the person is still living.
    pub died: Option<i32>,
    pub role: Role,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub wiki_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
}

impl Person {
    pub fn is_living(&self) -> bool {
        self.died.is_none()
    }

    /// The year the bar ends at: the death year, or `reference_year` for the
    /// living. Only layout uses this; `died` itself stays open.
    pub fn lifespan_end(&self, reference_year: i32) -> i32 {
        self.died.unwrap_or(reference_year)
    }

    /// Human-readable lifespan, e.g. `1653 (est.)–1713` or `1962–present`.
    pub fn lifespan_label(&self) -> String {
        let born = if self.born_estimated {
            format!("{} (est.)", self.born)
        } else {
            self.born.to_string()
        };
        match self.died {
            Some(died) => format!("{born}–{died}"),
            None => format!("{born}–present"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    Relative,
    StudentTeacher,
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relative => write!(f, "Relative"),
            Self::StudentTeacher => write!(f, "Student / Teacher"),
        }
    }
}

/// A directed relationship between two people, by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: SharedStr,
    pub to: SharedStr,
    #[serde(rename = "type")]
    pub kind: ConnectionType,
    #[serde(default)]
    pub label: Option<String>,
}

impl Connection {
    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }
}
