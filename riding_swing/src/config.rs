// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

use crate::color::Rgb;

/// The canonical name of a riding.
///
/// Names come from two independently authored sources (the results table and
/// the map annotations). All the dash variants are unified at construction so
/// that both sources can be matched by plain equality.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct RidingName(String);

impl RidingName {
    pub fn new(raw: &str) -> RidingName {
        RidingName(crate::normalize_riding_name(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RidingName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked party and the colour used when it wins a riding.
#[derive(PartialEq, Debug, Clone)]
pub struct Party {
    pub code: String,
    pub color: Rgb,
}

impl Party {
    pub fn new(code: &str, color: Rgb) -> Party {
        Party {
            code: code.to_string(),
            color,
        }
    }
}

/// Target national vote shares, as fractions in [0, 1].
///
/// Parties that are not explicitly targeted have a target of zero.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TargetRatios {
    ratios: HashMap<String, f64>,
}

impl TargetRatios {
    pub fn new() -> TargetRatios {
        TargetRatios::default()
    }

    /// Sets the target of a party from a percentage in [0, 100].
    pub fn set_percentage(&mut self, code: &str, percent: f64) -> Result<(), ProjectionErrors> {
        check_percentage(code, percent)?;
        self.ratios.insert(code.to_string(), percent / 100.0);
        Ok(())
    }

    /// Builds the targets from (party code, percentage) pairs.
    ///
    /// Every code must belong to the given parties.
    pub fn from_percentages(
        parties: &[Party],
        percentages: &[(String, f64)],
    ) -> Result<TargetRatios, ProjectionErrors> {
        let mut res = TargetRatios::new();
        for (code, percent) in percentages {
            if !parties.iter().any(|p| p.code == *code) {
                return Err(ProjectionErrors::UnknownParty(code.clone()));
            }
            res.set_percentage(code, *percent)?;
        }
        Ok(res)
    }

    pub fn get(&self, code: &str) -> f64 {
        self.ratios.get(code).cloned().unwrap_or(0.0)
    }
}

/// Checks that a user-supplied percentage is usable as a target.
pub fn check_percentage(code: &str, percent: f64) -> Result<(), ProjectionErrors> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(ProjectionErrors::InvalidTarget {
            code: code.to_string(),
            percent,
        });
    }
    Ok(())
}

// ******** Output data structures *********

/// National baseline of each party for one year slice.
///
/// Entries follow the order of the party list.
#[derive(PartialEq, Debug, Clone)]
pub struct PartyAverages {
    pub year_index: usize,
    pub averages: Vec<(String, f64)>,
}

impl PartyAverages {
    pub fn get(&self, code: &str) -> f64 {
        self.averages
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, avg)| *avg)
            .unwrap_or(0.0)
    }
}

/// Adjusted vote shares of a single riding, in party list order.
///
/// The shares are not renormalized and may not sum to one.
#[derive(PartialEq, Debug, Clone)]
pub struct ProjectedShares {
    pub shares: Vec<(String, f64)>,
}

impl ProjectedShares {
    pub fn get(&self, code: &str) -> f64 {
        self.shares
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, s)| *s)
            .unwrap_or(0.0)
    }
}

/// The outcome of rendering one riding.
#[derive(PartialEq, Debug, Clone)]
pub struct RidingDecision {
    pub riding: RidingName,
    pub winner: String,
    pub margin: f64,
    pub fill: Rgb,
    pub shares: ProjectedShares,
}

/// Why a line of the results table was dropped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RowSkip {
    /// Not even enough columns for a single year.
    TooFewColumns(usize),
    /// The number of columns does not match parties × years.
    WrongColumnCount { found: usize, expected: usize },
    /// One of the vote fields is not a number.
    InvalidPercentage(String),
}

impl Display for RowSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowSkip::TooFewColumns(n) => write!(f, "incomplete line ({} columns)", n),
            RowSkip::WrongColumnCount { found, expected } => write!(
                f,
                "incorrect number of columns: {} (expected {})",
                found, expected
            ),
            RowSkip::InvalidPercentage(s) => write!(f, "value error on {:?}", s),
        }
    }
}

/// Errors in the setup of a projection. The projection itself cannot fail.
#[derive(PartialEq, Debug, Clone)]
pub enum ProjectionErrors {
    InvalidTarget { code: String, percent: f64 },
    UnknownParty(String),
    YearOutOfRange { year_index: usize, num_years: usize },
    WeightsMismatch { weights: usize, years: usize },
    InvalidColor(String),
}

impl Error for ProjectionErrors {}

impl Display for ProjectionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionErrors::InvalidTarget { code, percent } => write!(
                f,
                "invalid target for {}: {} (percentage must be between 0 and 100)",
                code, percent
            ),
            ProjectionErrors::UnknownParty(code) => write!(f, "unknown party code {:?}", code),
            ProjectionErrors::YearOutOfRange {
                year_index,
                num_years,
            } => write!(
                f,
                "year index {} is out of range ({} years tracked)",
                year_index, num_years
            ),
            ProjectionErrors::WeightsMismatch { weights, years } => write!(
                f,
                "{} year weights given for {} selected years",
                weights, years
            ),
            ProjectionErrors::InvalidColor(s) => write!(f, "invalid colour {:?}", s),
        }
    }
}

// ********* Configuration **********

/// Lightening applied when the win margin falls below a threshold.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct MarginBand {
    /// Margins strictly below this value use this band.
    pub below: f64,
    /// Blend factor toward white, in [0, 1].
    pub lighten: f64,
}

/// When the map document is written back to its output.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum WritePolicy {
    /// After every element carrying a riding name, matched or not.
    EveryElement,
    /// Once, after all the elements have been processed.
    Once,
}

/// The year slices used to decide a map.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum YearSelection {
    /// A single year. The blend over this one year is only logged.
    Single(usize),
    /// Several years, most recent first, blended with the year weights.
    Blended(Vec<usize>),
}

impl YearSelection {
    pub fn year_indexes(&self) -> Vec<usize> {
        match self {
            YearSelection::Single(y) => vec![*y],
            YearSelection::Blended(ys) => ys.clone(),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ProjectionConfig {
    pub parties: Vec<Party>,
    /// Colour of a winner that is not in the colour table.
    pub others_color: Rgb,
    pub num_years: usize,
    /// Weights of the years, most recent first.
    pub year_weights: Vec<f64>,
    /// Sorted by increasing threshold. The first matching band applies.
    pub margin_bands: Vec<MarginBand>,
    pub write_policy: WritePolicy,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            parties: vec![
                Party::new("LPC", Rgb::new(0xff, 0x00, 0x00)),
                Party::new("CPC", Rgb::new(0x00, 0x00, 0xff)),
                Party::new("NDP", Rgb::new(0xff, 0xa5, 0x00)),
                Party::new("GRN", Rgb::new(0x00, 0xff, 0x00)),
                Party::new("BLOC", Rgb::new(0x80, 0x00, 0x80)),
                Party::new("PPC", Rgb::new(0xff, 0x14, 0x93)),
                Party::new("IND", Rgb::new(0x80, 0x80, 0x80)),
            ],
            others_color: Rgb::new(0xd3, 0xd3, 0xd3),
            num_years: 3,
            year_weights: vec![0.50, 0.333, 0.167],
            margin_bands: vec![
                MarginBand {
                    below: 0.05,
                    lighten: 0.5,
                },
                MarginBand {
                    below: 0.10,
                    lighten: 0.3,
                },
            ],
            write_policy: WritePolicy::EveryElement,
        }
    }
}

impl ProjectionConfig {
    pub fn num_parties(&self) -> usize {
        self.parties.len()
    }

    pub fn party_codes(&self) -> Vec<String> {
        self.parties.iter().map(|p| p.code.clone()).collect()
    }

    /// Number of fields in a well-formed line of the results table.
    pub fn expected_columns(&self) -> usize {
        1 + self.num_parties() * self.num_years
    }

    /// Checks that a year selection can be served by this configuration.
    pub fn check_selection(&self, selection: &YearSelection) -> Result<(), ProjectionErrors> {
        let years = selection.year_indexes();
        for &year_index in years.iter() {
            if year_index >= self.num_years {
                return Err(ProjectionErrors::YearOutOfRange {
                    year_index,
                    num_years: self.num_years,
                });
            }
        }
        if years.len() > self.year_weights.len() {
            return Err(ProjectionErrors::WeightsMismatch {
                weights: self.year_weights.len(),
                years: years.len(),
            });
        }
        Ok(())
    }
}
