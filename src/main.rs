//! plane-ransac - extract the dominant planes of XYZ point clouds.
//!
//! For every input cloud `<name>.xyz` the driver writes the support of pass
//! `k` to `<name>_<k>.xyz` and the remaining points to `<name>_p0.xyz`.
//!
//! ```bash
//! plane-ransac PointCloud1.xyz PointCloud2.xyz
//! plane-ransac --epsilon 0.05 --passes 4 --seed 7 scan.xyz
//! RUST_LOG=debug plane-ransac --config ransac.toml scan.xyz
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use plane_ransac::{
    read_xyz, write_xyz, PointCloud, RansacError, RansacPlaneExtractor, RansacSettings, XyzError,
};

/// Extract the dominant planes of one or more XYZ point clouds.
#[derive(Parser, Debug)]
#[command(name = "plane-ransac", version, about)]
struct Args {
    /// Input `.xyz` files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// TOML settings file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inlier distance threshold
    #[arg(short, long)]
    epsilon: Option<f64>,

    /// Number of dominant planes to extract. If the cloud runs out of points
    /// before the last pass, the planes found so far and the residual are
    /// still written and the input is reported as failed.
    #[arg(short, long)]
    passes: Option<usize>,

    /// Desired confidence of finding each plane, in (0, 1)
    #[arg(long)]
    confidence: Option<f64>,

    /// Assumed fraction of points on the next plane, in (0, 1]
    #[arg(long)]
    inlier_ratio: Option<f64>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// End a run early once a plane has fewer supporting points than this
    #[arg(long)]
    min_support: Option<usize>,

    /// Directory for output files (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error(transparent)]
    Io(#[from] XyzError),

    #[error(transparent)]
    Ransac(#[from] RansacError),
}

fn build_settings(args: &Args) -> Result<RansacSettings, String> {
    let mut settings = match &args.config {
        Some(path) => RansacSettings::from_toml_file(path)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => RansacSettings::default(),
    };

    if let Some(epsilon) = args.epsilon {
        settings.inlier_threshold = epsilon;
    }
    if let Some(passes) = args.passes {
        settings.pass_count = passes;
    }
    if let Some(confidence) = args.confidence {
        settings.confidence = confidence;
    }
    if let Some(ratio) = args.inlier_ratio {
        settings.assumed_inlier_ratio = ratio;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if args.min_support.is_some() {
        settings.min_support = args.min_support;
    }

    settings.validate().map_err(|e| e.to_string())?;
    Ok(settings)
}

/// `<name>_<suffix>.xyz`, placed in `output_dir` if one is given.
fn output_path(cloud_name: &str, suffix: &str, output_dir: Option<&Path>) -> PathBuf {
    let file = format!("{cloud_name}_{suffix}.xyz");
    match output_dir {
        Some(dir) => {
            let base = Path::new(&file)
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&file));
            dir.join(base)
        }
        None => PathBuf::from(file),
    }
}

fn process(
    input: &Path,
    settings: &RansacSettings,
    output_dir: Option<&Path>,
) -> Result<(), DriverError> {
    let mut cloud: PointCloud = read_xyz(input)?;
    let name = cloud.name().unwrap_or("cloud").to_owned();
    log::info!("{}: {} points", input.display(), cloud.len());

    let outcome = {
        let mut extractor = RansacPlaneExtractor::new(&mut cloud, settings.clone())?;
        extractor.run(settings.pass_count, settings.inlier_threshold)
    };

    // A run that fails after some passes still removed their support from
    // the cloud; write what was extracted before reporting the failure.
    let detections = match &outcome {
        Ok(detections) => detections.as_slice(),
        Err(e) => e.completed(),
    };
    if outcome.is_ok() || !detections.is_empty() {
        for (pass, detection) in detections.iter().enumerate() {
            let path = output_path(&name, &(pass + 1).to_string(), output_dir);
            write_xyz(&detection.support, &path)?;
            log::info!(
                "plane {}: {:?} with {} points -> {}",
                pass + 1,
                detection.plane.coefficients(),
                detection.support.len(),
                path.display()
            );
        }
        write_xyz(&cloud, output_path(&name, "p0", output_dir))?;
    }

    outcome?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = match build_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for input in &args.inputs {
        let started = Instant::now();
        match process(input, &settings, args.output_dir.as_deref()) {
            Ok(()) => println!(
                "Algorithm Complete ({}). Program runtime: {:?}",
                input.display(),
                started.elapsed()
            ),
            Err(DriverError::Io(e)) => {
                log::error!("{}: {e}", input.display());
                eprintln!("Something went wrong while trying to open/read the file");
                failed = true;
            }
            Err(DriverError::Ransac(e)) => {
                eprintln!("{}: plane extraction failed: {e}", input.display());
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
