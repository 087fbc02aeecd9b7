//! Archive locator conventions.
//!
//! Each region of the public archive is a folder holding an Entwine Point
//! Tile dataset; the folder's `ept.json` descriptor is the read stage's
//! entry point. Output files default to `<region>.las` / `<region>.tif`.

/// Public USGS 3DEP point-cloud archive on AWS.
pub const DEFAULT_ARCHIVE_BASE: &str = "https://s3-us-west-2.amazonaws.com/usgs-lidar-public/";

/// Base location of a point-cloud archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBase {
    base: String,
}

impl ArchiveBase {
    /// Create an archive base, normalizing to exactly one trailing slash.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        base.push('/');
        Self { base }
    }

    /// The public USGS 3DEP archive.
    pub fn usgs_3dep() -> Self {
        Self::new(DEFAULT_ARCHIVE_BASE)
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Locator of a region's EPT descriptor: `<base>/<region>/ept.json`.
    pub fn ept_url(&self, region: &str) -> String {
        format!("{}{}/ept.json", self.base, region.trim_matches('/'))
    }

    /// Default point-output filename for a region.
    pub fn points_filename(region: &str) -> String {
        format!("{}.las", region.trim_matches('/'))
    }

    /// Default raster-output filename for a region.
    pub fn raster_filename(region: &str) -> String {
        format!("{}.tif", region.trim_matches('/'))
    }
}

impl Default for ArchiveBase {
    fn default() -> Self {
        Self::usgs_3dep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ept_url() {
        let archive = ArchiveBase::usgs_3dep();
        assert_eq!(
            archive.ept_url("IA_FullState"),
            "https://s3-us-west-2.amazonaws.com/usgs-lidar-public/IA_FullState/ept.json"
        );
    }

    #[test]
    fn test_trailing_slashes_normalized() {
        let a = ArchiveBase::new("https://example.com/archive");
        let b = ArchiveBase::new("https://example.com/archive///");
        assert_eq!(a, b);
        assert_eq!(a.ept_url("X/"), "https://example.com/archive/X/ept.json");
    }

    #[test]
    fn test_output_filenames() {
        assert_eq!(ArchiveBase::points_filename("IA_FullState"), "IA_FullState.las");
        assert_eq!(ArchiveBase::raster_filename("IA_FullState"), "IA_FullState.tif");
    }
}
