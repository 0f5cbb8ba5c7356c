pub mod builder;
pub mod color;
mod config;
pub mod manual;

use log::{debug, info, warn};

use std::cmp::Ordering;

pub use crate::builder::ResultStore;
pub use crate::color::Rgb;
pub use crate::config::*;

/// The dash variants found in riding names, including the UTF-8 em dash
/// decoded as Windows-1252.
const DASH_VARIANTS: [&str; 4] = ["\u{2014}", "\u{2013}", "\u{2212}", "\u{e2}\u{20ac}\u{201d}"];

/// Replaces all the dash variants in a riding name by a plain hyphen.
pub fn normalize_riding_name(name: &str) -> String {
    let mut res = name.to_string();
    for dash in DASH_VARIANTS.iter() {
        if res.contains(dash) {
            res = res.replace(dash, "-");
        }
    }
    if res != name {
        debug!("Normalized riding name: {} -> {}", name, res);
    }
    res
}

/// Parses one line of the results table.
///
/// The line is `name,pct1,...,pctN` with `N = num_parties * num_years`. The
/// percentages may carry a trailing `%` and are returned as fractions.
/// The line is dropped as a whole if any field is not a number.
pub fn parse_result_line(
    line: &str,
    num_parties: usize,
    num_years: usize,
) -> Result<(RidingName, Vec<f64>), RowSkip> {
    let parts: Vec<&str> = line.trim().split(',').collect();
    parse_result_fields(&parts, num_parties, num_years)
}

/// Same as `parse_result_line`, for a row that is already split in fields.
pub fn parse_result_fields(
    parts: &[&str],
    num_parties: usize,
    num_years: usize,
) -> Result<(RidingName, Vec<f64>), RowSkip> {
    // Not even one year of shares.
    if parts.len() < 1 + num_parties {
        return Err(RowSkip::TooFewColumns(parts.len()));
    }
    let riding = RidingName::new(parts[0]);
    let expected = 1 + num_parties * num_years;
    if parts.len() != expected {
        return Err(RowSkip::WrongColumnCount {
            found: parts.len(),
            expected,
        });
    }
    let mut shares: Vec<f64> = Vec::with_capacity(expected - 1);
    for field in parts[1..].iter() {
        let number = field.strip_suffix('%').unwrap_or(field).trim();
        match number.parse::<f64>() {
            Ok(x) => shares.push(x / 100.0),
            Err(_) => return Err(RowSkip::InvalidPercentage(field.to_string())),
        }
    }
    Ok((riding, shares))
}

/// Computes the national baseline of every party for one year.
///
/// A riding where a party has a share of exactly zero is treated as a riding
/// where the party did not run: it does not count in the denominator.
pub fn party_averages(store: &ResultStore, parties: &[Party], year_index: usize) -> PartyAverages {
    let mut totals: Vec<f64> = vec![0.0; parties.len()];
    let mut counts: Vec<u32> = vec![0; parties.len()];
    // Sorted iteration keeps the floating point sums reproducible.
    for riding in store.ridings() {
        let year_shares = match store.year_slice(riding, year_index) {
            Some(s) => s,
            None => continue,
        };
        debug!("Riding: {}, Year Percentages: {:?}", riding, year_shares);
        for (idx, share) in year_shares.iter().enumerate().take(parties.len()) {
            if *share != 0.0 {
                totals[idx] += *share;
                counts[idx] += 1;
            }
        }
    }
    let averages: Vec<(String, f64)> = parties
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let avg = if counts[idx] > 0 {
                totals[idx] / counts[idx] as f64
            } else {
                0.0
            };
            (p.code.clone(), avg)
        })
        .collect();
    info!(
        "Party averages for year index {}: {:?}",
        year_index, averages
    );
    PartyAverages {
        year_index,
        averages,
    }
}

/// Projects the shares of one riding for one year under the targets.
///
/// Each party's historical share is scaled by `target / national average`.
/// A party with no national baseline gets a share of zero.
pub fn project_riding(
    record: &[f64],
    year_index: usize,
    averages: &PartyAverages,
    targets: &TargetRatios,
    parties: &[Party],
) -> ProjectedShares {
    let start = year_index * parties.len();
    let mut shares: Vec<(String, f64)> = Vec::with_capacity(parties.len());
    for (idx, party) in parties.iter().enumerate() {
        let historical = record.get(start + idx).cloned().unwrap_or(0.0);
        let target = targets.get(&party.code);
        let average = averages.get(&party.code);
        let projected = if average > 0.0 {
            let ratio_change = target / average;
            let nvp = historical * ratio_change;
            debug!(
                "Party: {}, riding share: {}, target: {}, ratio change: {}, projected: {}",
                party.code, historical, target, ratio_change, nvp
            );
            nvp
        } else {
            debug!(
                "Party: {}: no national baseline for year index {}, projected share is 0",
                party.code, year_index
            );
            0.0
        };
        shares.push((party.code.clone(), projected));
    }
    ProjectedShares { shares }
}

/// Dot product of the values with their weights.
///
/// The two slices are expected to have the same length. Otherwise only the
/// common prefix is used.
pub fn weighted_average(values: &[f64], weights: &[f64]) -> f64 {
    if values.len() != weights.len() {
        warn!(
            "weighted_average: {} values for {} weights",
            values.len(),
            weights.len()
        );
    }
    values.iter().zip(weights.iter()).map(|(v, w)| v * w).sum()
}

/// Combines the projections of several years into one, party by party.
///
/// `per_year` and `weights` are both ordered from the most recent year.
pub fn blend_projections(per_year: &[ProjectedShares], weights: &[f64]) -> ProjectedShares {
    let codes: Vec<String> = match per_year.first() {
        Some(p) => p.shares.iter().map(|(c, _)| c.clone()).collect(),
        None => return ProjectedShares { shares: vec![] },
    };
    let shares = codes
        .into_iter()
        .map(|code| {
            let values: Vec<f64> = per_year.iter().map(|p| p.get(&code)).collect();
            let blended = weighted_average(&values, weights);
            debug!("Blended share for {}: {:?} -> {}", code, values, blended);
            (code, blended)
        })
        .collect();
    ProjectedShares { shares }
}

/// Picks the winner of a riding and the colour that shows it.
///
/// Ties are broken by the order of the party list. The margin is the gap
/// between the two leading parties, or zero when fewer than two parties
/// have a share.
pub fn decide_fill(
    riding: &RidingName,
    projected: ProjectedShares,
    config: &ProjectionConfig,
) -> RidingDecision {
    let shares = &projected.shares;
    let mut order: Vec<usize> = (0..shares.len()).collect();
    // Stable sort: equal shares keep the party order.
    order.sort_by(|&a, &b| shares[b].1.partial_cmp(&shares[a].1).unwrap_or(Ordering::Equal));

    let num_nonzero = shares.iter().filter(|(_, s)| *s != 0.0).count();
    let margin = if num_nonzero >= 2 {
        shares[order[0]].1 - shares[order[1]].1
    } else {
        0.0
    };
    debug!("Margin between first and second: {}", margin);

    let winner = order
        .first()
        .map(|&i| shares[i].0.clone())
        .unwrap_or_default();
    let base = config
        .parties
        .iter()
        .find(|p| p.code == winner)
        .map(|p| p.color)
        .unwrap_or(config.others_color);
    let fill = color::margin_color(base, margin, &config.margin_bands);
    info!("{}: winner party: {}, fill color: {}", riding, winner, fill);

    RidingDecision {
        riding: riding.clone(),
        winner,
        margin,
        fill,
        shares: projected,
    }
}

/// A map document whose riding elements can be coloured.
pub trait RidingMap {
    type Error;

    /// The raw riding name of every candidate element, in document order.
    fn riding_names(&self) -> Vec<String>;

    /// Overwrites the fill of the element at this position in
    /// `riding_names`.
    fn set_fill(&mut self, position: usize, fill: Rgb);

    /// Writes the current state of the document to its output.
    fn commit(&mut self) -> Result<(), Self::Error>;
}

/// Projects every riding of the map and colours it.
///
/// Elements whose riding has no record are left untouched. The decisions are
/// returned in document order.
pub fn render_map<M: RidingMap>(
    map: &mut M,
    store: &ResultStore,
    selection: &YearSelection,
    targets: &TargetRatios,
    config: &ProjectionConfig,
) -> Result<Vec<RidingDecision>, M::Error> {
    let year_indexes = selection.year_indexes();
    let all_averages: Vec<PartyAverages> = year_indexes
        .iter()
        .map(|y| party_averages(store, &config.parties, *y))
        .collect();
    let weights: &[f64] = config
        .year_weights
        .get(..year_indexes.len())
        .unwrap_or(&config.year_weights);

    let names = map.riding_names();
    info!(
        "render_map: {} map elements, {} ridings with results, years {:?}",
        names.len(),
        store.len(),
        year_indexes
    );
    let mut decisions: Vec<RidingDecision> = Vec::new();
    for (position, raw_name) in names.iter().enumerate() {
        let riding = RidingName::new(raw_name);
        if let Some(record) = store.get(&riding) {
            debug!("Processing element for riding: {}", riding);
            let projected = match selection {
                YearSelection::Single(year_index) => {
                    let p = project_riding(
                        record,
                        *year_index,
                        &all_averages[0],
                        targets,
                        &config.parties,
                    );
                    // Only one year: the blend is a diagnostic and does not
                    // change the decision.
                    for (code, share) in p.shares.iter() {
                        let wa = weighted_average(&[*share], weights);
                        debug!("Weighted average for {}: {}", code, wa);
                    }
                    p
                }
                YearSelection::Blended(ys) => {
                    let per_year: Vec<ProjectedShares> = ys
                        .iter()
                        .zip(all_averages.iter())
                        .map(|(y, avgs)| project_riding(record, *y, avgs, targets, &config.parties))
                        .collect();
                    blend_projections(&per_year, weights)
                }
            };
            let decision = decide_fill(&riding, projected, config);
            map.set_fill(position, decision.fill);
            decisions.push(decision);
        } else {
            debug!("render_map: no results for riding {}, skipping", riding);
        }
        if config.write_policy == WritePolicy::EveryElement {
            map.commit()?;
        }
    }
    if config.write_policy == WritePolicy::Once || names.is_empty() {
        map.commit()?;
    }
    info!(
        "render_map: coloured {} of {} map elements",
        decisions.len(),
        names.len()
    );
    Ok(decisions)
}

#[cfg(test)]
mod tests {
    use super::builder::ResultStoreBuilder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// A results line with the given shares for the most recent year and
    /// zeros for the two other years.
    fn line(name: &str, first_year: &[&str]) -> String {
        let mut fields: Vec<String> = vec![name.to_string()];
        fields.extend(first_year.iter().map(|s| s.to_string()));
        fields.extend(std::iter::repeat("0%".to_string()).take(14));
        fields.join(",")
    }

    fn two_parties() -> ProjectionConfig {
        ProjectionConfig {
            parties: vec![
                Party::new("LPC", Rgb::new(0xff, 0, 0)),
                Party::new("CPC", Rgb::new(0, 0, 0xff)),
            ],
            ..ProjectionConfig::default()
        }
    }

    fn shares(values: &[(&str, f64)]) -> ProjectedShares {
        ProjectedShares {
            shares: values.iter().map(|(c, s)| (c.to_string(), *s)).collect(),
        }
    }

    /// Records every fill and commit.
    struct MemoryMap {
        names: Vec<String>,
        fills: Vec<Option<Rgb>>,
        commits: Vec<Vec<Option<Rgb>>>,
    }

    impl MemoryMap {
        fn new(names: &[&str]) -> MemoryMap {
            MemoryMap {
                names: names.iter().map(|s| s.to_string()).collect(),
                fills: vec![None; names.len()],
                commits: vec![],
            }
        }
    }

    impl RidingMap for MemoryMap {
        type Error = ();

        fn riding_names(&self) -> Vec<String> {
            self.names.clone()
        }

        fn set_fill(&mut self, position: usize, fill: Rgb) {
            self.fills[position] = Some(fill);
        }

        fn commit(&mut self) -> Result<(), ()> {
            self.commits.push(self.fills.clone());
            Ok(())
        }
    }

    #[test]
    fn normalize_dashes() {
        for name in ["A\u{2014}B", "A\u{2013}B", "A\u{2212}B", "A\u{e2}\u{20ac}\u{201d}B"] {
            assert_eq!(normalize_riding_name(name), "A-B");
        }
        assert_eq!(normalize_riding_name("Don Valley West"), "Don Valley West");
    }

    #[test]
    fn normalize_is_idempotent() {
        let name = "Scarborough\u{2014}Rouge Park \u{2013} East";
        let once = normalize_riding_name(name);
        assert_eq!(normalize_riding_name(&once), once);
        assert_eq!(RidingName::new(name), RidingName::new(&once));
    }

    #[test]
    fn parse_full_line() {
        let values: Vec<String> = (1..=21).map(|i| format!("{}%", i)).collect();
        let l = format!("Riding\u{2014}A,{}", values.join(","));
        let (riding, fractions) = parse_result_line(&l, 7, 3).unwrap();
        assert_eq!(riding.as_str(), "Riding-A");
        assert_eq!(fractions.len(), 21);
        for (i, f) in fractions.iter().enumerate() {
            assert_eq!(*f, (i + 1) as f64 / 100.0);
        }
    }

    #[test]
    fn parse_without_percent_sign() {
        let l = format!("R,12.5,30{}", ",0".repeat(19));
        let (_, fractions) = parse_result_line(&l, 7, 3).unwrap();
        assert_eq!(fractions[0], 0.125);
        assert_eq!(fractions[1], 0.3);
    }

    #[test]
    fn parse_skips_short_lines() {
        let l = format!("R{}", ",1%".repeat(20));
        assert_eq!(
            parse_result_line(&l, 7, 3),
            Err(RowSkip::WrongColumnCount {
                found: 21,
                expected: 22
            })
        );
        assert_eq!(
            parse_result_line("R,1,2,3", 7, 3),
            Err(RowSkip::TooFewColumns(4))
        );
        assert_eq!(parse_result_line("", 7, 3), Err(RowSkip::TooFewColumns(1)));
    }

    #[test]
    fn parse_skips_bad_percentages() {
        init();
        let l = line("R", &["20%", "abc%", "10%", "5%", "5%", "5%", "5%"]);
        assert_eq!(
            parse_result_line(&l, 7, 3),
            Err(RowSkip::InvalidPercentage("abc%".to_string()))
        );

        let mut builder = ResultStoreBuilder::new(&ProjectionConfig::default());
        assert!(builder.add_line(&l).is_err());
        assert_eq!(builder.skipped(), 1);
        let store = builder.build();
        assert!(store.get(&RidingName::new("R")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn last_row_wins() {
        init();
        let mut builder = ResultStoreBuilder::new(&ProjectionConfig::default());
        builder
            .add_line(&line("A\u{2013}B", &["10%", "0", "0", "0", "0", "0", "0"]))
            .unwrap();
        builder
            .add_line(&line("A-B", &["40%", "0", "0", "0", "0", "0", "0"]))
            .unwrap();
        let store = builder.build();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&RidingName::new("A-B")).unwrap()[0], 0.4);
    }

    #[test]
    fn averages_ignore_zero_shares() {
        init();
        let config = ProjectionConfig::default();
        let mut builder = ResultStoreBuilder::new(&config);
        builder.add_lines(
            [
                line("A", &["10%", "0", "0", "0", "0", "0", "0"]),
                line("B", &["0%", "0", "0", "0", "0", "0", "0"]),
                line("C", &["30%", "0", "0", "0", "0", "0", "0"]),
            ]
            .iter()
            .map(|s| s.as_str()),
        );
        let store = builder.build();
        let avgs = party_averages(&store, &config.parties, 0);
        assert!((avgs.get("LPC") - 0.20).abs() < 1e-12);
        assert_eq!(avgs.get("CPC"), 0.0);
        assert_eq!(avgs.averages.len(), 7);
        // The second year is all zeros.
        let avgs2 = party_averages(&store, &config.parties, 1);
        assert!(avgs2.averages.iter().all(|(_, a)| *a == 0.0));
    }

    #[test]
    fn projection_scales_by_ratio() {
        let config = two_parties();
        let averages = PartyAverages {
            year_index: 0,
            averages: vec![("LPC".to_string(), 0.20), ("CPC".to_string(), 0.0)],
        };
        let targets =
            TargetRatios::from_percentages(&config.parties, &[("LPC".to_string(), 40.0), ("CPC".to_string(), 50.0)])
                .unwrap();
        let p = project_riding(&[0.20, 0.35], 0, &averages, &targets, &config.parties);
        assert!((p.get("LPC") - 0.40).abs() < 1e-12);
        // No baseline for CPC.
        assert_eq!(p.get("CPC"), 0.0);
    }

    #[test]
    fn projection_uses_the_year_slice() {
        let config = two_parties();
        let averages = PartyAverages {
            year_index: 1,
            averages: vec![("LPC".to_string(), 0.25), ("CPC".to_string(), 0.5)],
        };
        let mut targets = TargetRatios::new();
        targets.set_percentage("LPC", 50.0).unwrap();
        targets.set_percentage("CPC", 25.0).unwrap();
        let record = [0.9, 0.9, 0.25, 0.5];
        let p = project_riding(&record, 1, &averages, &targets, &config.parties);
        assert!((p.get("LPC") - 0.5).abs() < 1e-12);
        assert!((p.get("CPC") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn targets_are_validated() {
        let config = ProjectionConfig::default();
        let mut targets = TargetRatios::new();
        assert!(targets.set_percentage("LPC", 101.0).is_err());
        assert!(targets.set_percentage("LPC", -0.5).is_err());
        assert!(targets.set_percentage("LPC", f64::NAN).is_err());
        assert!(targets.set_percentage("LPC", 100.0).is_ok());
        assert_eq!(targets.get("LPC"), 1.0);
        assert_eq!(targets.get("NDP"), 0.0);
        assert_eq!(
            TargetRatios::from_percentages(&config.parties, &[("XYZ".to_string(), 10.0)]),
            Err(ProjectionErrors::UnknownParty("XYZ".to_string()))
        );
    }

    #[test]
    fn weighted_average_is_a_dot_product() {
        let wa = weighted_average(&[0.4, 0.3, 0.2], &[0.5, 0.333, 0.167]);
        assert!((wa - (0.4 * 0.5 + 0.3 * 0.333 + 0.2 * 0.167)).abs() < 1e-9);
        assert_eq!(weighted_average(&[0.4], &[0.5]), 0.2);
    }

    #[test]
    fn blend_weights_each_party() {
        let blended = blend_projections(
            &[
                shares(&[("LPC", 0.4), ("CPC", 0.2)]),
                shares(&[("LPC", 0.2), ("CPC", 0.6)]),
            ],
            &[0.5, 0.5],
        );
        assert_eq!(blended.shares[0].0, "LPC");
        assert!((blended.get("LPC") - 0.3).abs() < 1e-12);
        assert!((blended.get("CPC") - 0.4).abs() < 1e-12);
        assert!(blend_projections(&[], &[0.5]).shares.is_empty());
    }

    #[test]
    fn margin_bands() {
        let config = two_parties();
        let r = RidingName::new("R");
        // Margin 0.04
        let d = decide_fill(&r, shares(&[("LPC", 0.50), ("CPC", 0.46)]), &config);
        assert_eq!(d.winner, "LPC");
        assert_eq!(d.fill.to_string(), "#ff7f7f");
        // Margin 0.07
        let d = decide_fill(&r, shares(&[("LPC", 0.50), ("CPC", 0.43)]), &config);
        assert_eq!(d.fill.to_string(), "#ff4c4c");
        // Margin 0.40
        let d = decide_fill(&r, shares(&[("LPC", 0.20), ("CPC", 0.60)]), &config);
        assert_eq!(d.winner, "CPC");
        assert_eq!(d.fill.to_string(), "#0000ff");
        assert!((d.margin - 0.4).abs() < 1e-12);
    }

    #[test]
    fn ties_follow_party_order() {
        let config = ProjectionConfig::default();
        let r = RidingName::new("R");
        let d = decide_fill(
            &r,
            shares(&[("LPC", 0.3), ("CPC", 0.4), ("NDP", 0.4), ("GRN", 0.0)]),
            &config,
        );
        assert_eq!(d.winner, "CPC");
        assert_eq!(d.margin, 0.0);
    }

    #[test]
    fn single_party_has_no_margin() {
        let config = ProjectionConfig::default();
        let d = decide_fill(
            &RidingName::new("R"),
            shares(&[("LPC", 0.0), ("CPC", 0.0), ("NDP", 0.7)]),
            &config,
        );
        assert_eq!(d.winner, "NDP");
        assert_eq!(d.margin, 0.0);
        assert_eq!(d.fill, Rgb::new(0xff, 0xa5, 0x00).lighten(0.5));
    }

    #[test]
    fn unknown_winner_uses_others_color() {
        let config = two_parties();
        let d = decide_fill(&RidingName::new("R"), shares(&[("IND", 0.9)]), &config);
        assert_eq!(d.fill, Rgb::new(0xd3, 0xd3, 0xd3).lighten(0.5));
    }

    #[test]
    fn single_riding_end_to_end() {
        init();
        let config = ProjectionConfig::default();
        let mut builder = ResultStoreBuilder::new(&config);
        builder
            .add_line(&line(
                "Riding\u{2014}A",
                &["20%", "30%", "10%", "5%", "5%", "5%", "5%"],
            ))
            .unwrap();
        let store = builder.build();
        let targets = TargetRatios::from_percentages(
            &config.parties,
            &[("LPC".to_string(), 30.0), ("CPC".to_string(), 45.0)],
        )
        .unwrap();

        let mut map = MemoryMap::new(&["Riding-A", "Elsewhere"]);
        let decisions =
            render_map(&mut map, &store, &YearSelection::Single(0), &targets, &config).unwrap();
        assert_eq!(decisions.len(), 1);
        let d = &decisions[0];
        // Only one riding: the ratio change is target / historical share.
        assert!((d.shares.get("LPC") - 0.30).abs() < 1e-12);
        assert!((d.shares.get("CPC") - 0.45).abs() < 1e-12);
        assert_eq!(d.shares.get("NDP"), 0.0);
        assert_eq!(d.winner, "CPC");
        assert_eq!(d.fill.to_string(), "#0000ff");
        assert_eq!(map.fills, vec![Some(Rgb::new(0, 0, 0xff)), None]);
    }

    #[test]
    fn commits_after_every_element() {
        let config = ProjectionConfig::default();
        let mut builder = ResultStoreBuilder::new(&config);
        builder
            .add_line(&line("A", &["40%", "20%", "0", "0", "0", "0", "0"]))
            .unwrap();
        let store = builder.build();
        let targets = TargetRatios::new();

        let mut map = MemoryMap::new(&["Missing", "A", "Also missing"]);
        render_map(&mut map, &store, &YearSelection::Single(0), &targets, &config).unwrap();
        assert_eq!(map.commits.len(), 3);
        assert_eq!(map.commits[0], vec![None, None, None]);
        assert_eq!(map.commits.last(), Some(&map.fills));

        let once = ProjectionConfig {
            write_policy: WritePolicy::Once,
            ..ProjectionConfig::default()
        };
        let mut map2 = MemoryMap::new(&["Missing", "A", "Also missing"]);
        render_map(&mut map2, &store, &YearSelection::Single(0), &targets, &once).unwrap();
        assert_eq!(map2.commits.len(), 1);
        assert_eq!(map2.fills, map.fills);
    }

    #[test]
    fn blended_selection_combines_years() {
        init();
        let store = {
            let mut b = ResultStoreBuilder::new(&ProjectionConfig {
                num_years: 4,
                ..two_parties()
            });
            b.add_line("A,40,20,20,40,30,30,10,10").unwrap();
            b.add_line("B,20,40,40,20,30,30,10,10").unwrap();
            b.build()
        };
        let config = ProjectionConfig {
            num_years: 4,
            year_weights: vec![0.5, 0.5],
            ..two_parties()
        };
        let targets = TargetRatios::from_percentages(
            &config.parties,
            &[("LPC".to_string(), 30.0), ("CPC".to_string(), 30.0)],
        )
        .unwrap();
        let selection = YearSelection::Blended(vec![0, 1]);
        assert!(config.check_selection(&selection).is_ok());
        let mut map = MemoryMap::new(&["A"]);
        let decisions = render_map(&mut map, &store, &selection, &targets, &config).unwrap();
        // Both years have averages of 0.3, so the ratio is 1 and A is a tie.
        let d = &decisions[0];
        assert!((d.shares.get("LPC") - 0.3).abs() < 1e-12);
        assert!((d.shares.get("CPC") - 0.3).abs() < 1e-12);
        assert_eq!(d.winner, "LPC");
    }

    #[test]
    fn short_party_lists_accept_full_rows() {
        let config = ProjectionConfig {
            parties: vec![
                Party::new("LPC", Rgb::new(0xff, 0, 0)),
                Party::new("CPC", Rgb::new(0, 0, 0xff)),
                Party::new("NDP", Rgb::new(0xff, 0xa5, 0x00)),
            ],
            num_years: 2,
            year_weights: vec![0.6, 0.4],
            ..ProjectionConfig::default()
        };
        assert_eq!(config.expected_columns(), 7);
        let mut builder = ResultStoreBuilder::new(&config);
        let riding = builder.add_line("Riding,40%,30%,20%,35%,35%,20%").unwrap();
        assert_eq!(riding.as_str(), "Riding");
        // Less than one year of shares.
        assert_eq!(
            builder.add_line("Short,40%,30%"),
            Err(RowSkip::TooFewColumns(3))
        );
        // One year only: enough columns to look at, but not a full row.
        assert_eq!(
            builder.add_line("Partial,40%,30%,20%"),
            Err(RowSkip::WrongColumnCount {
                found: 4,
                expected: 7
            })
        );
        let store = builder.build();
        assert_eq!(store.num_years(), 2);
        let slice = store.year_slice(&RidingName::new("Riding"), 1).unwrap();
        assert!((slice[2] - 0.20).abs() < 1e-12);
        assert!(store.year_slice(&RidingName::new("Riding"), 2).is_none());
    }

    #[test]
    fn decision_keeps_party_order() {
        let config = ProjectionConfig::default();
        let d = decide_fill(
            &RidingName::new("R"),
            shares(&[("LPC", 0.1), ("CPC", 0.5), ("NDP", 0.3)]),
            &config,
        );
        assert_eq!(d.winner, "CPC");
        assert!((d.margin - 0.2).abs() < 1e-12);
        let codes: Vec<&str> = d.shares.shares.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["LPC", "CPC", "NDP"]);
    }

    #[test]
    fn selection_checks() {
        let config = ProjectionConfig::default();
        assert!(config.check_selection(&YearSelection::Single(2)).is_ok());
        assert_eq!(
            config.check_selection(&YearSelection::Single(3)),
            Err(ProjectionErrors::YearOutOfRange {
                year_index: 3,
                num_years: 3
            })
        );
        let short = ProjectionConfig {
            year_weights: vec![0.5],
            ..ProjectionConfig::default()
        };
        assert_eq!(
            short.check_selection(&YearSelection::Blended(vec![0, 1])),
            Err(ProjectionErrors::WeightsMismatch {
                weights: 1,
                years: 2
            })
        );
    }

    #[test]
    fn colors() {
        assert_eq!(Rgb::parse_hex("#ffa500").unwrap(), Rgb::new(0xff, 0xa5, 0x00));
        assert_eq!(Rgb::parse_hex("800080").unwrap().to_string(), "#800080");
        assert!(Rgb::parse_hex("#fff").is_err());
        assert!(Rgb::parse_hex("#gggggg").is_err());
        assert_eq!(Rgb::new(0, 0, 0xff).lighten(0.5).to_string(), "#7f7fff");
        assert_eq!(Rgb::new(0, 0, 0xff).lighten(0.3).to_string(), "#4c4cff");
        assert_eq!(Rgb::new(1, 2, 3).lighten(1.0), Rgb::WHITE);
    }
}
