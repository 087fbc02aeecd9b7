//! Region catalog: persisted per-region metadata for the archive.
//!
//! The catalog is a CSV table with one row per archive region
//! (`filename,region,year,xmin,xmax,ymin,ymax,points`), produced by the
//! cloud crawler and loaded once per process run. Bounds are in the archive
//! frame. After loading, the catalog is read-only.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::BBox;

/// A single archive region with its spatial extent and point count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Raw folder name as listed by the archive index.
    pub filename: String,
    /// Display name; catalog identity.
    pub region: String,
    /// Acquisition year, empty when the folder name carries none.
    #[serde(default)]
    pub year: String,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub points: u64,
}

impl RegionRecord {
    /// Spatial extent in the archive frame.
    pub fn bbox(&self) -> BBox {
        BBox::new(self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// In-memory table of archive regions, keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    records: Vec<RegionRecord>,
    index: HashMap<String, usize>,
}

impl RegionCatalog {
    /// Build a catalog from records. Later duplicates of a name shadow
    /// earlier ones in lookups; iteration order stays as given.
    pub fn from_records(records: Vec<RegionRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.region.clone(), i))
            .collect();
        Self { records, index }
    }

    /// Load the persisted catalog from a CSV file.
    ///
    /// A missing file, missing columns, or non-numeric bounds all make the
    /// catalog unusable for resolution and fail with
    /// [`Error::CatalogUnavailable`].
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::catalog_unavailable(format!("cannot open {}: {e}", path.display()))
        })?;
        Self::load_csv_reader(file)
    }

    /// Load the catalog from any CSV reader (tests use in-memory strings).
    pub fn load_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (line, row) in rdr.deserialize::<RegionRecord>().enumerate() {
            let record = row.map_err(|e| {
                Error::catalog_unavailable(format!("malformed catalog row {}: {e}", line + 1))
            })?;
            records.push(record);
        }

        Ok(Self::from_records(records))
    }

    /// Persist records as the catalog CSV.
    pub fn write_csv<W: Write>(writer: W, records: &[RegionRecord]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in records {
            wtr.serialize(record)
                .map_err(|e| Error::catalog_unavailable(format!("cannot write catalog: {e}")))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Persist records as the catalog CSV at `path`.
    pub fn write_csv_path(path: impl AsRef<Path>, records: &[RegionRecord]) -> Result<()> {
        let file = File::create(path.as_ref())?;
        Self::write_csv(file, records)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegionRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Every record whose bbox fully contains `bounds` (strict containment,
    /// not nearest or overlap). An empty result is not an error here; the
    /// resolver decides whether it is fatal.
    pub fn find_covering(&self, bounds: &BBox) -> Vec<&RegionRecord> {
        self.records
            .iter()
            .filter(|r| r.bbox().contains(bounds))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionRecord> {
        self.records.iter()
    }
}

/// Read the newline-delimited candidate region-name list.
///
/// Blank lines are skipped; surrounding whitespace is trimmed.
pub fn read_region_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::catalog_unavailable(format!("cannot open {}: {e}", path.display()))
    })?;

    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            names.push(trimmed.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_FIXTURE: &str = "\
filename,region,year,xmin,xmax,ymin,ymax,points
IA_FullState/,IA_FullState,,-10673905.0,-10463243.0,5163870.0,5419963.0,1365255903
CO_Denver_2017/,CO_Denver_,2017,-11703497.0,-11665393.0,4775640.0,4814060.0,240139901
MN_RedRiver_1_2008/,MN_RedRiver_1_,2008,-10816265.0,-10721796.0,5923766.0,6179619.0,128469775
";

    fn fixture() -> RegionCatalog {
        RegionCatalog::load_csv_reader(CSV_FIXTURE.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_csv() {
        let catalog = fixture();
        assert_eq!(catalog.len(), 3);

        let ia = catalog.get("IA_FullState").unwrap();
        assert_eq!(ia.filename, "IA_FullState/");
        assert_eq!(ia.year, "");
        assert_eq!(ia.points, 1_365_255_903);
        assert!((ia.bbox().min_x - -10_673_905.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contains_and_get() {
        let catalog = fixture();
        assert!(catalog.contains("CO_Denver_"));
        assert!(!catalog.contains("CO_Denver_2017"));
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn test_load_rejects_non_numeric_bounds() {
        let bad = "\
filename,region,year,xmin,xmax,ymin,ymax,points
X/,X,,abc,1.0,0.0,1.0,10
";
        let err = RegionCatalog::load_csv_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable { .. }));
    }

    #[test]
    fn test_load_rejects_missing_columns() {
        let bad = "filename,region\nX/,X\n";
        let err = RegionCatalog::load_csv_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RegionCatalog::load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable { .. }));
    }

    #[test]
    fn test_find_covering_strict() {
        let catalog = fixture();

        // Fully inside IA_FullState only
        let inside = BBox::new(-10_600_000.0, 5_200_000.0, -10_590_000.0, 5_210_000.0);
        let hits = catalog.find_covering(&inside);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].region, "IA_FullState");

        // Straddles IA's western edge: excluded despite overlap
        let straddling = BBox::new(-10_700_000.0, 5_200_000.0, -10_590_000.0, 5_210_000.0);
        assert!(catalog.find_covering(&straddling).is_empty());

        // Far away from everything
        let nowhere = BBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(catalog.find_covering(&nowhere).is_empty());
    }

    #[test]
    fn test_csv_round_trip() {
        let catalog = fixture();
        let records: Vec<RegionRecord> = catalog.iter().cloned().collect();

        let mut buf = Vec::new();
        RegionCatalog::write_csv(&mut buf, &records).unwrap();
        let reloaded = RegionCatalog::load_csv_reader(buf.as_slice()).unwrap();

        assert_eq!(reloaded.len(), catalog.len());
        assert_eq!(
            reloaded.get("CO_Denver_").unwrap(),
            catalog.get("CO_Denver_").unwrap()
        );
    }
}
