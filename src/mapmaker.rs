use log::{debug, info, warn};

use riding_swing::builder::ResultStoreBuilder;
use riding_swing::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::mapmaker::config_reader::*;
use crate::mapmaker::io_common::{output_path, resolve_path};
use crate::mapmaker::io_svg::SvgMap;
use crate::mapmaker::targets::{FixedTargets, PromptTargets, TargetSource};

mod config_reader;
mod io_common;
mod io_results;
mod io_svg;
mod io_xlsx;
mod targets;

#[derive(Debug, Snafu)]
pub enum MapError {
    #[snafu(display("Error opening results file {path}"))]
    OpeningResults {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Missing worksheet {name} in the Excel file"))]
    EmptyExcel { name: String },
    #[snafu(display("Error opening map {path}"))]
    OpeningSvg {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing map {path}"))]
    ParsingSvg {
        source: quick_xml::Error,
        path: String,
    },
    #[snafu(display("Error creating output file {path}"))]
    CreatingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid projection settings"))]
    Projection { source: ProjectionErrors },
    #[snafu(display("Error reading the targets"))]
    ReadingTargets { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type MapResult<T> = Result<T, MapError>;
pub type BMapResult<T> = Result<T, Box<MapError>>;

/// Everything a run needs, once the command line and the config file are merged.
#[derive(Debug, Clone)]
struct RunSettings {
    results_path: String,
    provider: String,
    worksheet: Option<String>,
    map_path: String,
    output_pattern: String,
    selections: Vec<YearSelection>,
    projection: ProjectionConfig,
    prompted: Vec<String>,
    targets: Option<Vec<(String, f64)>>,
    summary_path: Option<String>,
    reference_path: Option<String>,
}

const DEFAULT_RESULTS: &str = "results.txt";
const DEFAULT_MAP: &str = "CMHoCToronto.svg";
const DEFAULT_OUTPUT_PATTERN: &str = "CMHoCToronto_Map{year}.svg";

fn resolve_settings(args: &Args) -> BMapResult<RunSettings> {
    let (config, root): (MapConfig, Option<PathBuf>) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path).parent().map(|p| p.to_path_buf());
            (config, root)
        }
        None => (MapConfig::default(), None),
    };
    info!("config: {:?}", config);
    let root_p = root.as_deref();

    let mut projection = config.projection_config()?;
    if args.single_write {
        projection.write_policy = WritePolicy::Once;
    }

    let year_indexes: Vec<usize> = match &args.year {
        Some(ys) if !ys.is_empty() => ys.clone(),
        _ => config.rules.year_indexes.clone().unwrap_or_else(|| vec![0]),
    };
    let blend = args.blend || config.rules.blend_years.unwrap_or(false);
    let selections: Vec<YearSelection> = if blend {
        vec![YearSelection::Blended(year_indexes)]
    } else {
        year_indexes.into_iter().map(YearSelection::Single).collect()
    };
    for selection in selections.iter() {
        projection
            .check_selection(selection)
            .context(ProjectionSnafu {})?;
    }

    let targets: Option<Vec<(String, f64)>> = match &args.target {
        Some(ts) if !ts.is_empty() => Some(FixedTargets::parse_args(ts)?.into_percentages()),
        _ => config
            .targets
            .as_ref()
            .map(|m| m.iter().map(|(c, p)| (c.clone(), *p)).collect()),
    };

    Ok(RunSettings {
        results_path: match &args.input {
            Some(p) => p.clone(),
            None => resolve_path(
                root_p,
                config.sources.results_file.as_deref().unwrap_or(DEFAULT_RESULTS),
            ),
        },
        provider: args
            .input_type
            .clone()
            .or_else(|| config.sources.provider.clone())
            .unwrap_or_else(|| "text".to_string()),
        worksheet: args
            .excel_worksheet_name
            .clone()
            .or_else(|| config.sources.excel_worksheet_name.clone()),
        map_path: match &args.map {
            Some(p) => p.clone(),
            None => resolve_path(
                root_p,
                config.sources.map_file.as_deref().unwrap_or(DEFAULT_MAP),
            ),
        },
        output_pattern: match &args.out {
            Some(p) => p.clone(),
            None => resolve_path(
                root_p,
                config
                    .output_settings
                    .output_pattern
                    .as_deref()
                    .unwrap_or(DEFAULT_OUTPUT_PATTERN),
            ),
        },
        selections,
        prompted: config.prompted_parties(),
        projection,
        targets,
        summary_path: args
            .out_summary
            .clone()
            .or_else(|| config.output_settings.summary_path.clone()),
        reference_path: args.reference.clone(),
    })
}

fn read_store(settings: &RunSettings) -> BMapResult<ResultStore> {
    info!("Parsing results from file: {}", settings.results_path);
    let mut builder = ResultStoreBuilder::new(&settings.projection);
    let added = match settings.provider.as_str() {
        "text" | "txt" | "csv" => io_results::read_results_text(&settings.results_path, &mut builder)?,
        "xlsx" => io_xlsx::read_results_xlsx(
            &settings.results_path,
            settings.worksheet.as_deref(),
            &mut builder,
        )?,
        x => {
            return Err(Box::new(MapError::Whatever {
                message: format!("Input type not implemented {:?}", x),
                source: None,
            }))
        }
    };
    if builder.skipped() > 0 {
        warn!(
            "{}: skipped {} malformed rows",
            settings.results_path,
            builder.skipped()
        );
    }
    let store = builder.build();
    info!(
        "Parsed {} rows into {} ridings ({} years each)",
        added,
        store.len(),
        store.num_years()
    );
    Ok(store)
}

fn selection_label(selection: &YearSelection) -> String {
    match selection {
        YearSelection::Single(y) => y.to_string(),
        YearSelection::Blended(_) => "blended".to_string(),
    }
}

fn decisions_to_json(decisions: &[RidingDecision]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for d in decisions.iter() {
        let mut shares: JSMap<String, JSValue> = JSMap::new();
        for (code, share) in d.shares.shares.iter() {
            shares.insert(code.clone(), json!(format!("{:.4}", share)));
        }
        l.push(json!({
            "riding": d.riding.as_str(),
            "winner": d.winner,
            "margin": format!("{:.4}", d.margin),
            "fill": d.fill.to_string(),
            "shares": shares
        }));
    }
    l
}

fn build_summary_js(results: &[(String, Vec<RidingDecision>)]) -> JSValue {
    let years: Vec<JSValue> = results
        .iter()
        .map(|(label, decisions)| json!({"year": label, "ridings": decisions_to_json(decisions)}))
        .collect();
    json!({ "results": years })
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> MapResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Runs a whole projection: reads the results, collects the targets, and
/// writes one coloured map per year selection.
pub fn run_projection(args: &Args) -> BMapResult<()> {
    let settings = resolve_settings(args)?;
    debug!("settings: {:?}", settings);

    let store = read_store(&settings)?;

    let targets: TargetRatios = match &settings.targets {
        Some(percentages) => FixedTargets::new(percentages.clone())
            .read_targets(&settings.projection.parties, &settings.prompted)?,
        None => PromptTargets::stdin()
            .read_targets(&settings.projection.parties, &settings.prompted)?,
    };
    info!("targets: {:?}", targets);

    let mut results: Vec<(String, Vec<RidingDecision>)> = Vec::new();
    for selection in settings.selections.iter() {
        let label = selection_label(selection);
        let output = output_path(&settings.output_pattern, &label);
        info!("Processing year index: {}", label);
        let mut map = SvgMap::read(&settings.map_path, Path::new(&output))?;
        let decisions = render_map(
            &mut map,
            &store,
            selection,
            &targets,
            &settings.projection,
        )?;
        info!(
            "SVG file written to: {} ({} writes)",
            output,
            map.writes()
        );
        results.push((label, decisions));
    }

    let result_js = build_summary_js(&results);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match settings.summary_path.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(p) => {
            fs::write(p, pretty_js_stats.as_bytes()).context(CreatingOutputSnafu { path: p })?;
            info!("Summary written to: {}", p);
        }
        None => {}
    }

    if let Some(reference_path) = &settings.reference_path {
        check_reference(reference_path, &pretty_js_stats)?;
    }

    Ok(())
}
