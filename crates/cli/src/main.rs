//! eptfetch CLI - LIDAR elevation acquisition for an area of interest

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use eptfetch_cloud::blocking::CatalogBuilderBlocking;
use eptfetch_cloud::CatalogBuilderOptions;
use eptfetch_core::catalog::read_region_names;
use eptfetch_core::{ArchiveBase, Crs, Polygon, RegionCatalog};
use eptfetch_pipeline::{
    fetch_elevation, plan_fetch, FetchRequest, OutputPaths, PdalCliExecutor, RasterOptions,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "eptfetch")]
#[command(version, about = "Fetch LIDAR ground elevations for an area of interest", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch elevation points for a polygon
    Fetch {
        /// Polygon vertices as "x,y x,y x,y ..." in the given CRS
        #[arg(long)]
        polygon: String,
        /// CRS of the polygon (EPSG code), also the output CRS
        #[arg(long, default_value = "4326")]
        crs: String,
        /// Explicit archive region; skips the bounds search
        #[arg(long)]
        region: Option<String>,
        /// Catalog CSV produced by `eptfetch catalog`
        #[arg(long, default_value = "usgs_3dep_metadata.csv")]
        catalog: PathBuf,
        /// Archive base URL
        #[arg(long)]
        archive: Option<String>,
        /// Output LAS file for the filtered ground points
        #[arg(long, default_value = "ground.las")]
        points_file: PathBuf,
        /// Output GeoTIFF for the interpolated elevation surface
        #[arg(long, default_value = "elevation.tif")]
        raster_file: PathBuf,
        /// Raster cell size in target-CRS units
        #[arg(long, default_value = "1.0")]
        resolution: f64,
        /// Pipeline runner binary
        #[arg(long, default_value = "pdal")]
        pdal: PathBuf,
        /// Print the pipeline description instead of executing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Crawl the archive and build the region catalog
    Catalog {
        /// Newline-delimited list of candidate region folder names
        #[arg(long)]
        names: PathBuf,
        /// Archive base URL
        #[arg(long)]
        archive: Option<String>,
        /// Output catalog CSV
        #[arg(long, default_value = "usgs_3dep_metadata.csv")]
        out: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Parse "x,y x,y x,y" into a polygon.
fn parse_polygon(s: &str) -> Result<Polygon> {
    let mut vertices = Vec::new();
    for pair in s.split_whitespace() {
        let parts: Vec<&str> = pair.split(',').collect();
        if parts.len() != 2 {
            anyhow::bail!("Vertex must be 'x,y', got: {}", pair);
        }
        let x: f64 = parts[0].trim().parse().context("Invalid x coordinate")?;
        let y: f64 = parts[1].trim().parse().context("Invalid y coordinate")?;
        vertices.push((x, y));
    }
    Polygon::from_xy(&vertices).context("Invalid polygon")
}

fn archive_base(arg: Option<String>) -> ArchiveBase {
    match arg {
        Some(base) => ArchiveBase::new(base),
        None => ArchiveBase::usgs_3dep(),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Fetch ────────────────────────────────────────────────────
        Commands::Fetch {
            polygon,
            crs,
            region,
            catalog,
            archive,
            points_file,
            raster_file,
            resolution,
            pdal,
            dry_run,
        } => {
            let polygon = parse_polygon(&polygon)?;
            let crs = Crs::parse(&crs).context("Invalid CRS")?;
            let archive = archive_base(archive);

            let catalog = RegionCatalog::load_csv(&catalog)
                .context("Failed to load region catalog")?;
            info!("Catalog: {} regions", catalog.len());

            let mut request = FetchRequest::new(
                polygon,
                crs,
                OutputPaths::new(points_file.clone(), raster_file.clone()),
            )
            .with_raster_options(RasterOptions {
                resolution,
                ..Default::default()
            });
            if let Some(name) = region {
                request = request.with_region(name);
            }

            if dry_run {
                let (resolved, pipeline) = plan_fetch(&catalog, &archive, &request)
                    .context("Failed to plan fetch")?;
                println!("Region: {}", resolved.region);
                if resolved.candidates.len() > 1 {
                    let names: Vec<&str> = resolved
                        .candidates
                        .iter()
                        .map(|r| r.region.as_str())
                        .collect();
                    println!("Candidates: {}", names.join(", "));
                }
                println!("{}", pipeline.to_json_string()?);
                return Ok(());
            }

            let executor = PdalCliExecutor::new(pdal);
            let pb = spinner("Fetching point data...");
            let start = Instant::now();
            let outcome = fetch_elevation(&catalog, &archive, &request, &executor)
                .context("Fetch failed")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            println!("Region: {}", outcome.region);
            println!("Ground points: {}", outcome.elevations.len());
            if let Some((lo, hi)) = outcome.elevations.elevation_range() {
                println!("Elevation range: {:.2} - {:.2}", lo, hi);
            }
            println!("Points saved to: {}", points_file.display());
            println!("Raster saved to: {}", raster_file.display());
            println!("  Processing time: {:.2?}", elapsed);
        }

        // ── Catalog ──────────────────────────────────────────────────
        Commands::Catalog { names, archive, out } => {
            let names = read_region_names(&names).context("Failed to read region names")?;
            info!("Crawling {} candidate regions", names.len());

            let builder =
                CatalogBuilderBlocking::new(archive_base(archive), CatalogBuilderOptions::default())
                    .context("Failed to build crawler")?;

            let pb = spinner("Crawling archive...");
            let start = Instant::now();
            let report = builder.crawl(&names);
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            RegionCatalog::write_csv_path(&out, &report.records)
                .context("Failed to write catalog")?;

            println!(
                "Catalog: {} regions ({} skipped of {} attempted)",
                report.records.len(),
                report.skipped,
                report.attempted
            );
            println!("Saved to: {}", out.display());
            println!("  Crawl time: {:.2?}", elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_polygon_pairs() {
        let poly = parse_polygon("-93.756155,41.918015 -93.747334,41.918015 -93.747334,41.921429")
            .unwrap();
        assert_eq!(poly.len(), 4); // closing vertex added
    }

    #[test]
    fn parse_polygon_rejects_bad_input() {
        assert!(parse_polygon("1,2 3").is_err());
        assert!(parse_polygon("a,b c,d e,f").is_err());
        assert!(parse_polygon("1,2 3,4").is_err()); // too few vertices
    }
}
