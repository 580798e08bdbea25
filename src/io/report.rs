//! Scanner report loader.
//!
//! A report is a sequence of blocks, each introduced by a header line and
//! followed by one comma-separated point per line:
//!
//! ```text
//! --- scanner 0 ---
//! 404,-588,-901
//! 528,-643,409
//!
//! --- scanner 1 ---
//! 686,422,578
//! ```
//!
//! Blank lines are ignored. Errors carry the 1-based line number.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::atlas::{ScannerId, ScannerRecord};
use crate::geometry::{Point, point};

/// Malformed report input.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: point appears before any scanner header")]
    PointBeforeHeader { line: u64 },

    #[error("line {line}: malformed scanner header {text:?}")]
    MalformedHeader { line: u64, text: String },

    #[error("line {line}: expected 3 coordinates, found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("line {line}: invalid coordinate {text:?}")]
    InvalidCoordinate { line: u64, text: String },

    #[error("failed to read report: {0}")]
    Csv(#[from] csv::Error),
}

/// Load and parse a report file.
pub fn load_report<P: AsRef<Path>>(path: P) -> Result<Vec<ScannerRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records =
        read_report(file).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(records)
}

/// Parse report text.
pub fn parse_report(text: &str) -> Result<Vec<ScannerRecord>, ParseError> {
    read_report(text.as_bytes())
}

fn read_report<R: std::io::Read>(reader: R) -> Result<Vec<ScannerRecord>, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut scanners: Vec<ScannerRecord> = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map_or(0, |p| p.line());

        if rec.iter().all(str::is_empty) {
            continue;
        }

        if rec.len() == 1 && rec[0].starts_with("---") {
            let id = parse_header(&rec[0]).ok_or_else(|| ParseError::MalformedHeader {
                line,
                text: rec[0].to_string(),
            })?;
            scanners.push(ScannerRecord::new(id, Vec::new()));
            continue;
        }

        let p = parse_point(&rec, line)?;
        match scanners.last_mut() {
            Some(scanner) => scanner.points.push(p),
            None => return Err(ParseError::PointBeforeHeader { line }),
        }
    }

    Ok(scanners)
}

/// `--- scanner N ---` -> N
fn parse_header(text: &str) -> Option<ScannerId> {
    let inner = text.strip_prefix("---")?.strip_suffix("---")?;
    let mut words = inner.split_whitespace();
    if words.next()? != "scanner" {
        return None;
    }
    let id = words.next()?.parse().ok()?;
    words.next().is_none().then_some(ScannerId(id))
}

fn parse_point(rec: &StringRecord, line: u64) -> Result<Point, ParseError> {
    if rec.len() != 3 {
        return Err(ParseError::FieldCount {
            line,
            found: rec.len(),
        });
    }

    let coord = |i: usize| -> Result<i64, ParseError> {
        rec[i].parse().map_err(|_| ParseError::InvalidCoordinate {
            line,
            text: rec[i].to_string(),
        })
    };

    Ok(point(coord(0)?, coord(1)?, coord(2)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../data/sample_report.txt");

    #[test]
    fn test_parse_sample() {
        let scanners = parse_report(SAMPLE).unwrap();

        assert_eq!(scanners.len(), 5);
        let ids: Vec<u32> = scanners.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(scanners[0].points.len(), 25);
        assert_eq!(scanners[2].points.len(), 26);
        assert_eq!(scanners[0].points[0], point(404, -588, -901));
        assert_eq!(scanners[4].points.last(), Some(&point(30, -46, -14)));
    }

    #[test]
    fn test_blank_lines_and_whitespace() {
        let text = "\n--- scanner 7 ---\n 1, 2 ,3\n\n   \n-4,-5,-6\n";
        let scanners = parse_report(text).unwrap();

        assert_eq!(scanners.len(), 1);
        assert_eq!(scanners[0].id, ScannerId(7));
        assert_eq!(scanners[0].points, vec![point(1, 2, 3), point(-4, -5, -6)]);
    }

    #[test]
    fn test_header_without_points() {
        let scanners = parse_report("--- scanner 0 ---\n--- scanner 1 ---\n1,1,1\n").unwrap();

        assert!(scanners[0].points.is_empty());
        assert_eq!(scanners[1].points, vec![point(1, 1, 1)]);
    }

    #[test]
    fn test_point_before_header() {
        let err = parse_report("1,2,3\n--- scanner 0 ---\n").unwrap_err();

        assert!(matches!(err, ParseError::PointBeforeHeader { line: 1 }));
    }

    #[test]
    fn test_malformed_header() {
        let err = parse_report("--- sensor 0 ---\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { line: 1, .. }));

        let err = parse_report("--- scanner x ---\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader { .. }));
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_report("--- scanner 0 ---\n1,2\n").unwrap_err();

        assert!(matches!(err, ParseError::FieldCount { line: 2, found: 2 }));
        assert_eq!(err.to_string(), "line 2: expected 3 coordinates, found 2");
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let err = parse_report("--- scanner 0 ---\n1,two,3\n").unwrap_err();

        match err {
            ParseError::InvalidCoordinate { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
