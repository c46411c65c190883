//! Decoding and combining the JSON resources a timeline is built from.
//!
//! Fetching is the caller's job; everything here works on byte buffers.

pub mod merge;
pub mod quality;

pub use merge::merge_instrument;
pub use quality::{DataIssue, check_quality};

use lineage_protocol::{Connection, InstrumentConfig, InstrumentData, Person};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid {what} JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn parse<T: DeserializeOwned>(data: &[u8], what: &'static str) -> Result<T, DataError> {
    serde_json::from_slice(data).map_err(|source| DataError::Json { what, source })
}

/// A complete, already merged instrument dataset.
pub fn parse_instrument_data(data: &[u8]) -> Result<InstrumentData, DataError> {
    parse(data, "instrument data")
}

/// A per-instrument selection over the shared people pool.
pub fn parse_instrument_config(data: &[u8]) -> Result<InstrumentConfig, DataError> {
    parse(data, "instrument config")
}

/// The shared people pool.
pub fn parse_people(data: &[u8]) -> Result<Vec<Person>, DataError> {
    parse(data, "people")
}

/// The shared connection list.
pub fn parse_connections(data: &[u8]) -> Result<Vec<Connection>, DataError> {
    parse(data, "connections")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_which_resource_failed() {
        let err = parse_people(b"{not json").err().map(|e| e.to_string());
        assert!(
            err.as_deref().is_some_and(|e| e.starts_with("invalid people JSON")),
            "err={err:?}"
        );
    }

    #[test]
    fn parses_connection_list() {
        let conns = parse_connections(
            br#"[{"from": "leopold-mozart", "to": "mozart", "type": "relative", "label": "father"}]"#,
        )
        .unwrap_or_default();
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].label.as_deref(), Some("father"));
    }

    #[test]
    fn missing_connections_default_to_empty() {
        let data = parse_instrument_data(br#"{"instrument": "harp", "eras": [], "people": []}"#);
        assert!(data.is_ok_and(|d| d.connections.is_empty()));
    }
}
