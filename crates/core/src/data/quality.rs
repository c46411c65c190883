use std::collections::HashSet;

use lineage_protocol::{Color, InstrumentData, SharedStr};
use serde::Serialize;

/// Something in a dataset the curators should look at.
///
/// Layout tolerates all of these; it never corrects the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataIssue {
    /// Death year before birth year. The bar will have negative width.
    DiedBeforeBorn { id: SharedStr, born: i32, died: i32 },
    /// Two people share an id; only the later one is reachable by id.
    DuplicatePerson { id: SharedStr },
    /// A connection names someone who is not in the dataset.
    DanglingConnection { from: SharedStr, to: SharedStr, missing: SharedStr },
    /// An era ends before it starts.
    InvertedEra { name: String },
    /// An era color that is not `#rgb` / `#rrggbb`.
    BadEraColor { name: String, color: String },
}

impl std::fmt::Display for DataIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DiedBeforeBorn { id, born, died } => {
                write!(f, "{id}: died {died} before being born {born}")
            }
            Self::DuplicatePerson { id } => write!(f, "duplicate person id {id}"),
            Self::DanglingConnection { from, to, missing } => {
                write!(f, "connection {from} -> {to} references unknown person {missing}")
            }
            Self::InvertedEra { name } => write!(f, "era {name} ends before it starts"),
            Self::BadEraColor { name, color } => write!(f, "era {name} has invalid color {color:?}"),
        }
    }
}

/// List every data-quality problem in `data`, in dataset order.
pub fn check_quality(data: &InstrumentData) -> Vec<DataIssue> {
    let mut issues = Vec::new();

    for era in &data.eras {
        if era.end_year < era.start_year {
            issues.push(DataIssue::InvertedEra {
                name: era.name.clone(),
            });
        }
        if Color::from_hex(&era.color).is_none() {
            issues.push(DataIssue::BadEraColor {
                name: era.name.clone(),
                color: era.color.clone(),
            });
        }
    }

    let mut ids = HashSet::new();
    for person in &data.people {
        if !ids.insert(person.id.as_str()) {
            issues.push(DataIssue::DuplicatePerson {
                id: person.id.clone(),
            });
        }
        if let Some(died) = person.died
            && died < person.born
        {
            issues.push(DataIssue::DiedBeforeBorn {
                id: person.id.clone(),
                born: person.born,
                died,
            });
        }
    }

    for conn in &data.connections {
        for end in [&conn.from, &conn.to] {
            if !ids.contains(end.as_str()) {
                issues.push(DataIssue::DanglingConnection {
                    from: conn.from.clone(),
                    to: conn.to.clone(),
                    missing: end.clone(),
                });
            }
        }
    }

    for issue in &issues {
        log::warn!("{}: {issue}", data.instrument);
    }
    issues
}
