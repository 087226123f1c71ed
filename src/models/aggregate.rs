use crate::models::{Record, StationAccumulator};
use std::collections::hash_map::{Entry, Iter};
use std::collections::HashMap;

/// Station name to accumulator mapping, one per chunk while workers run and
/// one for the merged result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateMap {
    stations: HashMap<String, StationAccumulator>,
}

impl AggregateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stations: HashMap::with_capacity(capacity),
        }
    }

    /// Add one temperature reading for `station`
    pub fn observe(&mut self, station: &str, temperature: f64) {
        // Look up by &str first so the name is only allocated on first sight
        if let Some(acc) = self.stations.get_mut(station) {
            acc.observe(temperature);
        } else {
            self.stations
                .insert(station.to_owned(), StationAccumulator::new(temperature));
        }
    }

    pub fn observe_record(&mut self, record: &Record<'_>) {
        self.observe(record.station, record.temperature);
    }

    /// Fold every entry of `other` into this map
    pub fn merge(&mut self, other: AggregateMap) {
        if self.stations.is_empty() {
            *self = other;
            return;
        }

        for (station, acc) in other.stations {
            match self.stations.entry(station) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(&acc),
                Entry::Vacant(entry) => {
                    entry.insert(acc);
                }
            }
        }
    }

    pub fn get(&self, station: &str) -> Option<&StationAccumulator> {
        self.stations.get(station)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, StationAccumulator> {
        self.stations.iter()
    }

    /// Entries ordered by station name, compared byte-wise
    pub fn sorted(&self) -> Vec<(&str, &StationAccumulator)> {
        let mut entries: Vec<(&str, &StationAccumulator)> = self
            .stations
            .iter()
            .map(|(station, acc)| (station.as_str(), acc))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<'a> IntoIterator for &'a AggregateMap {
    type Item = (&'a String, &'a StationAccumulator);
    type IntoIter = Iter<'a, String, StationAccumulator>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_inserts_then_updates() {
        let mut map = AggregateMap::new();
        map.observe("Paris", 10.0);
        map.observe("Paris", 20.0);
        map.observe("Paris", 30.0);
        map.observe("Oslo", -4.0);

        assert_eq!(map.len(), 2);

        let paris = map.get("Paris").unwrap();
        assert_eq!(paris.min(), 10.0);
        assert_eq!(paris.mean(), 20.0);
        assert_eq!(paris.max(), 30.0);
        assert_eq!(paris.count(), 3);
    }

    #[test]
    fn test_merge_disjoint_and_shared_stations() {
        let mut left = AggregateMap::new();
        left.observe("Paris", 10.0);
        left.observe("Oslo", 1.0);

        let mut right = AggregateMap::new();
        right.observe("Paris", 30.0);
        right.observe("Zurich", 8.0);

        left.merge(right);

        assert_eq!(left.len(), 3);
        let paris = left.get("Paris").unwrap();
        assert_eq!(paris.count(), 2);
        assert_eq!(paris.min(), 10.0);
        assert_eq!(paris.max(), 30.0);
        assert_eq!(left.get("Zurich").unwrap().count(), 1);
    }

    #[test]
    fn test_merge_into_empty_takes_other() {
        let mut right = AggregateMap::new();
        right.observe("Paris", 12.5);

        let mut left = AggregateMap::new();
        left.merge(right.clone());

        assert_eq!(left, right);
    }

    #[test]
    fn test_sorted_is_byte_order() {
        let mut map = AggregateMap::new();
        for station in ["Oslo", "Berlin", "Zurich", "berlin", "Ålesund"] {
            map.observe(station, 1.0);
        }

        let names: Vec<&str> = map.sorted().into_iter().map(|(s, _)| s).collect();
        assert_eq!(names, vec!["Berlin", "Oslo", "Zurich", "berlin", "Ålesund"]);
    }
}
