// src/select/mod.rs
use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::process::utils::cell_to_f64;
use crate::process::{CellValue, CoordinateRepair, RawRow};
use crate::schema::{columns, FilterConfig, FlowRecord, Purpose};

/// Integer year from a number cell or numeric text; fractional or
/// out-of-range values are rejected.
pub fn cell_to_year(cell: &CellValue) -> Option<i32> {
    let v = cell_to_f64(cell)?;
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

fn cell_to_name(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(v) => v.to_string(),
        CellValue::Missing => String::new(),
    }
}

/// Absent, unparseable or negative magnitudes read as zero.
fn cell_to_volume(cell: &CellValue) -> f64 {
    cell_to_f64(cell).filter(|v| *v > 0.0).unwrap_or(0.0)
}

fn contains_ci(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.to_lowercase().contains(&query.to_lowercase())
}

/// Build the record for one row under `purpose`. `None` only when the row
/// has no usable year.
pub fn derive_record(
    row: &RawRow,
    purpose: Purpose,
    repair: &dyn CoordinateRepair,
) -> Option<FlowRecord> {
    let year = match cell_to_year(row.get(columns::YEAR)) {
        Some(y) => y,
        None => {
            debug!(year = ?row.get(columns::YEAR), "row without integer year skipped");
            return None;
        }
    };

    let coords = repair.repair(
        row.get(columns::LAT_O),
        row.get(columns::LON_O),
        row.get(columns::LAT_D),
        row.get(columns::LON_D),
    );

    let leisure_volume = cell_to_volume(row.get(columns::LEISURE));
    let business_volume = cell_to_volume(row.get(columns::BUSINESS));
    let total_volume = cell_to_volume(row.get(columns::TOTAL));
    let display_value = match purpose {
        Purpose::Leisure => leisure_volume,
        Purpose::Business => business_volume,
        Purpose::Total => total_volume,
    };

    Some(FlowRecord {
        year,
        origin_name: cell_to_name(row.get(columns::ORIGIN_NAME)),
        destination_name: cell_to_name(row.get(columns::DESTINATION_NAME)),
        leisure_volume,
        business_volume,
        total_volume,
        display_value,
        display_type: purpose,
        origin_coords: coords.map(|c| c.origin),
        destination_coords: coords.map(|c| c.destination),
        display_weight: None,
    })
}

/// Filter by year and name queries, keep positive magnitudes, and rank
/// descending by `display_value`. Ties keep input order.
#[instrument(level = "debug", skip(rows, filter, repair), fields(rows = rows.len(), year = %filter.year, purpose = %filter.purpose))]
pub fn select_flows(
    rows: &[RawRow],
    filter: &FilterConfig,
    repair: &dyn CoordinateRepair,
) -> Vec<FlowRecord> {
    let mut out: Vec<FlowRecord> = rows
        .iter()
        .filter_map(|row| derive_record(row, filter.purpose, repair))
        .filter(|r| filter.year.matches(r.year))
        .filter(|r| contains_ci(&r.origin_name, &filter.origin_query))
        .filter(|r| contains_ci(&r.destination_name, &filter.destination_query))
        .filter(|r| r.display_value > 0.0)
        .collect();

    // stable, so equal values keep their relative order
    out.sort_by(|a, b| b.display_value.total_cmp(&a.display_value));

    debug!(matched = out.len(), "selected flows");
    out
}

/// Ascending distinct years present in `rows`.
pub fn distinct_years(rows: &[RawRow]) -> Vec<i32> {
    rows.iter()
        .filter_map(|r| cell_to_year(r.get(columns::YEAR)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{parse_rows, LongitudeRepair};
    use crate::schema::YearFilter;

    const HEADER: &str = "year,origin_name,destination_name,lat_o,lon_o,lat_d,lon_d,total_wt_l_all,total_wt_b_all,total_wt_t_all";

    fn table(lines: &[&str]) -> Vec<RawRow> {
        let mut text = HEADER.to_string();
        for l in lines {
            text.push('\n');
            text.push_str(l);
        }
        parse_rows(&text)
    }

    fn select(rows: &[RawRow], filter: &FilterConfig) -> Vec<FlowRecord> {
        select_flows(rows, filter, &LongitudeRepair::Western)
    }

    #[test]
    fn test_year_and_purpose() {
        let rows = table(&[
            "2020,A,B,1,1,2,2,10,20,30",
            "2021,A,C,1,1,2,2,5,60,65",
            "2021,D,B,1,1,2,2,7,0,7",
        ]);
        let filter = FilterConfig {
            year: YearFilter::Year(2021),
            purpose: Purpose::Business,
            ..Default::default()
        };
        let out = select(&rows, &filter);
        // business = 0 on the last row is excluded
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].destination_name, "C");
        assert_eq!(out[0].display_value, 60.0);
        assert_eq!(out[0].display_type, Purpose::Business);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let rows = table(&[
            "2021,\"Boston, MA\",\"Austin, TX\",1,1,2,2,1,1,1",
            "2021,Portland,\"Boston, MA\",1,1,2,2,1,1,2",
        ]);
        let filter = FilterConfig {
            origin_query: "bos".into(),
            ..Default::default()
        };
        let out = select(&rows, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].origin_name, "Boston, MA");

        let filter = FilterConfig {
            destination_query: "BOSTON".into(),
            ..Default::default()
        };
        let out = select(&rows, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].origin_name, "Portland");
    }

    #[test]
    fn test_missing_magnitude_excluded() {
        let rows = table(&["2021,A,B,1,1,2,2,1,1,", "2021,A,B,1,1,2,2,1,1,abc", "2021,A,B"]);
        assert!(select(&rows, &FilterConfig::default()).is_empty());
    }

    #[test]
    fn test_negative_magnitude_excluded() {
        let rows = table(&["2021,A,B,1,1,2,2,1,1,-5"]);
        assert!(select(&rows, &FilterConfig::default()).is_empty());
    }

    #[test]
    fn test_rank_descending_and_stable() {
        let rows = table(&[
            "2021,first,X,1,1,2,2,0,0,5",
            "2021,big,X,1,1,2,2,0,0,50",
            "2021,second,X,1,1,2,2,0,0,5",
            "2021,third,X,1,1,2,2,0,0,5",
        ]);
        let out = select(&rows, &FilterConfig::default());
        let names: Vec<&str> = out.iter().map(|r| r.origin_name.as_str()).collect();
        assert_eq!(names, vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn test_invalid_coords_still_ranked() {
        let rows = table(&["2021,A,B,1,,2,2,1,1,3"]);
        let out = select(&rows, &FilterConfig::default());
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_drawable());
        assert!(out[0].origin_coords.is_none());
    }

    #[test]
    fn test_row_without_year_dropped() {
        let rows = table(&["n/a,A,B,1,1,2,2,1,1,3", "2021.5,A,B,1,1,2,2,1,1,3"]);
        assert!(select(&rows, &FilterConfig::default()).is_empty());
    }

    #[test]
    fn test_numeric_names_render_plainly() {
        let rows = table(&["2021,5,6.5,1,1,2,2,1,1,3"]);
        let out = select(&rows, &FilterConfig::default());
        assert_eq!(out[0].origin_name, "5");
        assert_eq!(out[0].destination_name, "6.5");
    }

    #[test]
    fn test_distinct_years() {
        let rows = table(&["2021,A", "2019,A", "2021,B", "x,C", "\"2020\",D"]);
        assert_eq!(distinct_years(&rows), vec![2019, 2020, 2021]);
    }
}
