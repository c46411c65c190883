use std::collections::{HashMap, HashSet};

use lineage_protocol::{Connection, InstrumentConfig, InstrumentData, Person};

/// Build one instrument's dataset from its config and the shared pools.
///
/// People appear in `people_ids` order. Ids missing from the pool are
/// dropped, and so are connections that do not have both ends in the
/// selection. Repeated ids in the config are kept once.
pub fn merge_instrument(
    config: &InstrumentConfig,
    people: &[Person],
    connections: &[Connection],
) -> InstrumentData {
    let pool: HashMap<&str, &Person> = people.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut selected_ids = HashSet::new();
    let mut selected = Vec::with_capacity(config.people_ids.len());
    for id in &config.people_ids {
        let Some(person) = pool.get(id.as_str()) else {
            log::warn!("{}: unknown person id {id:?}", config.instrument);
            continue;
        };
        if selected_ids.insert(id.as_str()) {
            selected.push((*person).clone());
        }
    }

    let kept: Vec<Connection> = connections
        .iter()
        .filter(|c| selected_ids.contains(c.from.as_str()) && selected_ids.contains(c.to.as_str()))
        .cloned()
        .collect();

    log::debug!(
        "{}: merged {} people, {} of {} connections",
        config.instrument,
        selected.len(),
        kept.len(),
        connections.len()
    );

    InstrumentData {
        instrument: config.instrument.clone(),
        eras: config.eras.clone(),
        people: selected,
        connections: kept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_protocol::{ConnectionType, Role};

    fn person(id: &str, born: i32) -> Person {
        Person {
            id: id.into(),
            name: id.into(),
            born,
            born_estimated: false,
            died: Some(born + 60),
            role: Role::Composer,
            bio: String::new(),
            photo_url: None,
            wiki_url: None,
            website_url: None,
        }
    }

    fn conn(from: &str, to: &str) -> Connection {
        Connection {
            from: from.into(),
            to: to.into(),
            kind: ConnectionType::Relative,
            label: None,
        }
    }

    #[test]
    fn selects_people_in_config_order() {
        let pool = [person("haydn", 1732), person("mozart", 1756), person("beethoven", 1770)];
        let config = InstrumentConfig {
            instrument: "piano".into(),
            eras: vec![],
            people_ids: vec!["beethoven".into(), "haydn".into(), "ghost".into(), "haydn".into()],
        };
        let data = merge_instrument(&config, &pool, &[]);
        let ids: Vec<&str> = data.people.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["beethoven", "haydn"]);
        assert_eq!(data.instrument, "piano");
    }

    #[test]
    fn keeps_only_connections_inside_selection() {
        let pool = [person("haydn", 1732), person("mozart", 1756), person("beethoven", 1770)];
        let conns = [conn("haydn", "beethoven"), conn("mozart", "beethoven"), conn("haydn", "ghost")];
        let config = InstrumentConfig {
            instrument: "piano".into(),
            eras: vec![],
            people_ids: vec!["haydn".into(), "beethoven".into(), "ghost".into()],
        };
        let data = merge_instrument(&config, &pool, &conns);
        assert_eq!(data.connections, vec![conn("haydn", "beethoven")]);
    }
}
