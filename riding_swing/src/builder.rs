use log::{debug, warn};

use std::collections::HashMap;

pub use crate::config::*;

/// Historical vote shares of all the ridings.
///
/// Each record holds `num_parties * num_years` fractions, year-major: the
/// first `num_parties` values are the most recent year, in party order.
#[derive(PartialEq, Debug, Clone)]
pub struct ResultStore {
    pub(crate) records: HashMap<RidingName, Vec<f64>>,
    pub(crate) num_parties: usize,
    pub(crate) num_years: usize,
}

impl ResultStore {
    pub fn get(&self, riding: &RidingName) -> Option<&[f64]> {
        self.records.get(riding).map(|v| v.as_slice())
    }

    /// The shares of one year for a riding, in party order.
    pub fn year_slice(&self, riding: &RidingName, year_index: usize) -> Option<&[f64]> {
        if year_index >= self.num_years {
            return None;
        }
        let record = self.records.get(riding)?;
        let start = year_index * self.num_parties;
        record.get(start..start + self.num_parties)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn num_years(&self) -> usize {
        self.num_years
    }

    /// The riding names, sorted.
    pub fn ridings(&self) -> Vec<&RidingName> {
        let mut res: Vec<&RidingName> = self.records.keys().collect();
        res.sort();
        res
    }
}

/// A builder for the result store.
///
/// Lines are added one at a time. Malformed lines are skipped and counted.
/// When two lines carry the same riding name, the last one wins.
///
/// ```
/// use riding_swing::builder::ResultStoreBuilder;
/// use riding_swing::ProjectionConfig;
///
/// let mut builder = ResultStoreBuilder::new(&ProjectionConfig::default());
/// let line = format!("Toronto Centre,45%,20%,25%,5%,0%,5%,0%{}", ",0".repeat(14));
/// builder.add_line(&line).unwrap();
/// builder.add_line("Not,enough").unwrap_err();
///
/// let store = builder.build();
/// assert_eq!(store.len(), 1);
/// ```
pub struct ResultStoreBuilder {
    _num_parties: usize,
    _num_years: usize,
    _records: HashMap<RidingName, Vec<f64>>,
    _skipped: usize,
}

impl ResultStoreBuilder {
    pub fn new(config: &ProjectionConfig) -> ResultStoreBuilder {
        ResultStoreBuilder {
            _num_parties: config.num_parties(),
            _num_years: config.num_years,
            _records: HashMap::new(),
            _skipped: 0,
        }
    }

    /// Parses a line of the results table and stores it.
    ///
    /// A previous record with the same normalized name is overwritten.
    pub fn add_line(&mut self, line: &str) -> Result<RidingName, RowSkip> {
        let parts: Vec<&str> = line.trim().split(',').collect();
        self.add_fields(&parts)
    }

    /// Stores a row that is already split in fields (name first).
    pub fn add_fields(&mut self, parts: &[&str]) -> Result<RidingName, RowSkip> {
        match crate::parse_result_fields(parts, self._num_parties, self._num_years) {
            Ok((riding, shares)) => {
                debug!("Parsed vote percentages for {}: {:?}", riding, shares);
                if self._records.insert(riding.clone(), shares).is_some() {
                    warn!("add_line: duplicate riding {}, keeping the last row", riding);
                }
                Ok(riding)
            }
            Err(skip) => {
                debug!("Skipping line: {}: {}", skip, parts.join(","));
                self._skipped += 1;
                Err(skip)
            }
        }
    }

    /// Adds all the lines, logging and skipping the malformed ones.
    pub fn add_lines<'a, I: IntoIterator<Item = &'a str>>(&mut self, lines: I) -> usize {
        let mut added = 0;
        for line in lines {
            if self.add_line(line).is_ok() {
                added += 1;
            }
        }
        added
    }

    pub fn skipped(&self) -> usize {
        self._skipped
    }

    pub fn build(self) -> ResultStore {
        ResultStore {
            records: self._records,
            num_parties: self._num_parties,
            num_years: self._num_years,
        }
    }
}
