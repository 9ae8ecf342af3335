//! Merges per-city record sequences into one table keyed by (city, year).

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::debug;

use crate::error::{ErrorKind, ParseError};
use crate::records::{City, NormalizedRecord};

/// All normalized records, unique per (city, year) and ordered by city then
/// year. Read-only once built.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CombinedTable {
    records: BTreeMap<(City, i32), NormalizedRecord>,
}

impl CombinedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, city: City, year: i32) -> Option<&NormalizedRecord> {
        self.records.get(&(city, year))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRecord> {
        self.records.values()
    }

    pub fn cities(&self) -> Vec<City> {
        let mut cities: Vec<City> = self.records.keys().map(|(c, _)| *c).collect();
        cities.dedup();
        cities
    }
}

/// Unions the given sequences. No unit conversion happens here.
///
/// # Errors
///
/// [`ErrorKind::DuplicateKey`] if two records share a (city, year); the
/// first record is never overwritten.
pub fn merge<I>(sources: I) -> Result<CombinedTable, ParseError>
where
    I: IntoIterator<Item = Vec<NormalizedRecord>>,
{
    let mut table = CombinedTable::default();

    for records in sources {
        for record in records {
            match table.records.entry((record.city, record.year)) {
                Entry::Occupied(_) => {
                    return Err(ParseError::new(
                        record.city,
                        ErrorKind::DuplicateKey { year: record.year },
                    ));
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
    }

    debug!(records = table.len(), "Sources merged");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(city: City, year: i32, population: u64) -> NormalizedRecord {
        NormalizedRecord {
            population: Some(population),
            ..NormalizedRecord::empty(city, year)
        }
    }

    #[test]
    fn test_merge_orders_by_city_then_year() {
        let table = merge(vec![
            vec![rec(City::Chiba, 2020, 1), rec(City::Chiba, 2019, 2)],
            vec![rec(City::Kanazawa, 2020, 3)],
        ])
        .unwrap();

        let keys: Vec<(City, i32)> = table.iter().map(|r| (r.city, r.year)).collect();
        assert_eq!(
            keys,
            vec![(City::Kanazawa, 2020), (City::Chiba, 2019), (City::Chiba, 2020)]
        );
        assert_eq!(table.cities(), vec![City::Kanazawa, City::Chiba]);
        assert_eq!(table.get(City::Chiba, 2019).unwrap().population, Some(2));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let err = merge(vec![
            vec![rec(City::Kanazawa, 2019, 1)],
            vec![rec(City::Kanazawa, 2019, 2)],
        ])
        .unwrap_err();

        assert_eq!(err.city, City::Kanazawa);
        assert!(matches!(err.kind, ErrorKind::DuplicateKey { year: 2019 }));
    }

    #[test]
    fn test_same_year_different_cities_is_fine() {
        let table = merge(vec![
            vec![rec(City::Kanazawa, 2019, 1)],
            vec![rec(City::Sakai, 2019, 1)],
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_merge_empty() {
        let table = merge(Vec::<Vec<NormalizedRecord>>::new()).unwrap();
        assert!(table.is_empty());
    }
}
