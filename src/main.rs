use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use scanner_fusion::config::FusionConfig;
use scanner_fusion::io::load_report;
use scanner_fusion::system::FusionSystem;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scanner_fusion=info")),
        )
        .init();

    let report_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/sample_report.txt".to_string());

    let config = match std::env::args().nth(2) {
        Some(path) => FusionConfig::load(&path)?,
        None => FusionConfig::default(),
    };

    println!("Loading scanner report from: {}", report_path);
    let records = load_report(&report_path)?;
    let total_points: usize = records.iter().map(|r| r.points.len()).sum();
    println!(
        "Loaded {} scanners, {} beacon observations",
        records.len(),
        total_points
    );

    let system = FusionSystem::new(config)?;
    let map = system
        .run(records)
        .with_context(|| format!("Failed to fuse {}", report_path))?;

    for scanner in map.scanners() {
        println!(
            "{}: orientation {}, location [{}, {}, {}]",
            scanner.id,
            scanner.orientation,
            scanner.location.x,
            scanner.location.y,
            scanner.location.z
        );
    }

    println!("Beacons: {}", map.beacon_count());
    println!("Max scanner distance: {}", map.max_scanner_distance());

    Ok(())
}
