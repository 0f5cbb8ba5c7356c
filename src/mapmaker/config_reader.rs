use crate::mapmaker::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPattern")]
    pub output_pattern: Option<String>,
    #[serde(rename = "writeEachElement")]
    pub write_each_element: Option<bool>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sources {
    #[serde(rename = "resultsFile")]
    pub results_file: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "mapFile")]
    pub map_file: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PartyEntry {
    pub code: String,
    pub color: String,
    /// Ask for the target of this party when none is given.
    pub prompt: Option<bool>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MarginBandEntry {
    pub below: f64,
    pub lighten: f64,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionRules {
    #[serde(rename = "numYears")]
    pub num_years: Option<usize>,
    #[serde(rename = "yearWeights")]
    pub year_weights: Option<Vec<f64>>,
    #[serde(rename = "yearIndexes")]
    pub year_indexes: Option<Vec<usize>>,
    #[serde(rename = "blendYears")]
    pub blend_years: Option<bool>,
    #[serde(rename = "marginBands")]
    pub margin_bands: Option<Vec<MarginBandEntry>>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub sources: Sources,
    pub parties: Option<Vec<PartyEntry>>,
    #[serde(rename = "othersColor")]
    pub others_color: Option<String>,
    #[serde(default)]
    pub rules: ProjectionRules,
    /// Percentages by party code.
    pub targets: Option<BTreeMap<String, f64>>,
}

/// The parties that are asked for when no targets are given.
const DEFAULT_PROMPTED: [&str; 2] = ["LPC", "CPC"];

impl MapConfig {
    /// Builds the projection configuration. Missing values take the defaults.
    pub fn projection_config(&self) -> MapResult<ProjectionConfig> {
        let default = ProjectionConfig::default();
        let parties: Vec<Party> = match &self.parties {
            Some(entries) => {
                let mut res: Vec<Party> = Vec::new();
                for e in entries.iter() {
                    let color = Rgb::parse_hex(&e.color).context(ProjectionSnafu {})?;
                    res.push(Party::new(&e.code, color));
                }
                res
            }
            None => default.parties.clone(),
        };
        if parties.is_empty() {
            whatever!("the configuration must list at least one party")
        }
        let others_color = match &self.others_color {
            Some(c) => Rgb::parse_hex(c).context(ProjectionSnafu {})?,
            None => default.others_color,
        };
        let margin_bands: Vec<MarginBand> = match &self.rules.margin_bands {
            Some(bands) => {
                let mut res: Vec<MarginBand> = bands
                    .iter()
                    .map(|b| MarginBand {
                        below: b.below,
                        lighten: b.lighten,
                    })
                    .collect();
                res.sort_by(|a, b| a.below.total_cmp(&b.below));
                res
            }
            None => default.margin_bands.clone(),
        };
        let write_policy = match self.output_settings.write_each_element {
            Some(false) => WritePolicy::Once,
            _ => WritePolicy::EveryElement,
        };
        Ok(ProjectionConfig {
            parties,
            others_color,
            num_years: self.rules.num_years.unwrap_or(default.num_years),
            year_weights: self
                .rules
                .year_weights
                .clone()
                .unwrap_or_else(|| default.year_weights.clone()),
            margin_bands,
            write_policy,
        })
    }

    pub fn prompted_parties(&self) -> Vec<String> {
        match &self.parties {
            Some(entries) => entries
                .iter()
                .filter(|e| e.prompt.unwrap_or(false))
                .map(|e| e.code.clone())
                .collect(),
            None => DEFAULT_PROMPTED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn read_config(path: &str) -> MapResult<MapConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read config: {:?}", contents);
    let config: MapConfig = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> MapResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
