mod ui;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use vox_core::{DensityVoxelSet, VoxelSet};
use vox_ingest::{
    chunk_file, process_parallel, process_sequential, ConcurrentStatus, DensityProcessor,
    IngestError, PointSourceProcessor, Processor,
};
use vox_las::LasFile;
use vox_pipeline::{
    chain, run_pipeline, BoxedStage, DensityCondenser, GradientFileWriter, GradientProcessor,
    LazyNormalizer, MeasurementFinder, MeasurementsFileWriter, MinimumDegrouper,
    MinimumHeightFinder, PipelineStatus, PointSourceSplitter, Stage, VoxelFileWriter, WriteError,
};

#[derive(Parser, Debug)]
#[command(
    name = "Fuel Voxelizer",
    about = "Voxelizes LiDAR point clouds into canopy fuel structure products",
    version = "0.1.0"
)]
struct Cli {
    /// Input LAS file
    #[arg(value_name = "FILE")]
    input: String,

    /// Destination path for the primary CSV output
    #[arg(long, default_value = "output.csv")]
    output: String,

    /// Worker threads for the ingest pool
    #[arg(long, default_value_t = 32)]
    concurrency: u32,

    /// Number of chunks to split the point stream into
    #[arg(long, default_value_t = 256)]
    chunks: u32,

    /// Minimum points per voxel for the voxel to count as filled
    #[arg(long, default_value_t = 20)]
    density: u32,

    /// Voxel edge length, in the units of the LAS header
    #[arg(long, default_value_t = 0.1)]
    voxel: f64,

    /// Rebase every column onto its own minimum height
    #[arg(long, default_value_t = false)]
    normalize: bool,

    /// Emit a height histogram instead of the voxel list
    #[arg(long, default_value_t = false)]
    gradient: bool,

    /// Emit per-column canopy measurements instead of the voxel list
    #[arg(long, default_value_t = false)]
    measurements: bool,

    /// If set, also render the per-column minimum heights as a PNG
    #[arg(long, default_value = "")]
    minimum_output: String,

    /// Partition by point source id and run one pipeline per source
    #[arg(long, default_value_t = false)]
    split_sources: bool,

    /// Ingest chunks on a single worker, for diagnostics
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn validate(args: &Cli) -> Result<(), String> {
    if args.concurrency <= 2 {
        return Err("--concurrency must be greater than 2".to_string());
    }
    if args.chunks == 0 {
        return Err("--chunks must be greater than 0".to_string());
    }
    if args.density <= 1 {
        return Err("--density must be greater than 1".to_string());
    }
    if args.voxel <= 0.0 {
        return Err("--voxel must be greater than 0".to_string());
    }
    if args.gradient && args.measurements {
        return Err("--gradient and --measurements are mutually exclusive".to_string());
    }
    Ok(())
}

/// Runs a processor over the file with the worker pool, rendering the
/// shared ingest status until the fold completes.
fn ingest<P: Processor>(
    file: &LasFile,
    processor: &P,
    args: &Cli,
) -> Result<P::Output, IngestError> {
    let chunks = chunk_file(file.header.number_of_points as usize, args.chunks as usize);

    let status = Arc::new(ConcurrentStatus::new());
    let quit = Arc::new(AtomicBool::new(false));
    let renderer = ui::spawn_ingest_renderer(Arc::clone(&status), Arc::clone(&quit));

    let output = if args.sequential {
        process_sequential(file, &chunks, processor, &status)
    } else {
        process_parallel(file, &chunks, processor, args.concurrency as usize, &status)
    };

    quit.store(true, Ordering::Relaxed);
    let _ = renderer.join();

    output
}

/// Runs a post-processing pipeline, rendering the shared stage status until
/// the terminal sentinel is written.
fn post_process<S: Stage>(input: S::Input, pipeline: &S) -> S::Output {
    let status = Arc::new(PipelineStatus::new());
    let quit = Arc::new(AtomicBool::new(false));
    let renderer = ui::spawn_pipeline_renderer(Arc::clone(&status), Arc::clone(&quit));

    let output = run_pipeline(input, pipeline, &status);

    quit.store(true, Ordering::Relaxed);
    let _ = renderer.join();

    output
}

/// Assembles the density post-processing chain for the given options.
///
/// The condenser always runs first. Normalization routes through the
/// minimum finder and the lazy normalizer; a requested raster without
/// normalization routes through the finder and the degrouping adapter. The
/// chain ends in the voxel writer, or in the gradient processor and its
/// writer when a histogram was requested.
fn density_pipeline(
    args: &Cli,
    output_path: &str,
    raster_path: Option<PathBuf>,
) -> BoxedStage<DensityVoxelSet, Result<(), WriteError>> {
    let mut voxel_stage: BoxedStage<DensityVoxelSet, VoxelSet> = Box::new(DensityCondenser {
        density: args.density,
    });

    if args.normalize {
        voxel_stage = Box::new(chain(
            chain(voxel_stage, MinimumHeightFinder { raster_path }),
            LazyNormalizer,
        ));
    } else if raster_path.is_some() {
        voxel_stage = Box::new(chain(
            chain(voxel_stage, MinimumHeightFinder { raster_path }),
            MinimumDegrouper,
        ));
    }

    if args.gradient {
        Box::new(chain(
            chain(voxel_stage, GradientProcessor),
            GradientFileWriter {
                path: PathBuf::from(output_path),
            },
        ))
    } else if args.measurements {
        Box::new(chain(
            chain(voxel_stage, MeasurementFinder),
            MeasurementsFileWriter {
                path: PathBuf::from(output_path),
            },
        ))
    } else {
        Box::new(chain(
            voxel_stage,
            VoxelFileWriter {
                path: PathBuf::from(output_path),
            },
        ))
    }
}

/// Prefixes a per-source output path with its source index.
fn prefixed(index: usize, path: &str) -> String {
    format!("{}-{}", index, path)
}

fn raster_path(minimum_output: &str) -> Option<PathBuf> {
    if minimum_output.is_empty() {
        None
    } else {
        Some(PathBuf::from(minimum_output))
    }
}

fn run_density(file: &LasFile, args: &Cli) -> Result<(), Box<dyn Error>> {
    let processor = DensityProcessor {
        point_density: args.density,
        voxel_size: args.voxel,
    };

    log::info!("ingesting {} points", file.header.number_of_points);
    let output = ingest(file, &processor, args)?;

    log::info!("post-processing {} voxels", output.voxels.len());
    let pipeline = density_pipeline(args, &args.output, raster_path(&args.minimum_output));
    post_process(output, &pipeline)?;

    Ok(())
}

fn run_split_sources(file: &LasFile, args: &Cli) -> Result<(), Box<dyn Error>> {
    let processor = PointSourceProcessor {
        point_density: args.density,
        voxel_size: args.voxel,
    };

    log::info!("ingesting {} points", file.header.number_of_points);
    let output = ingest(file, &processor, args)?;

    log::info!("splitting {} sources", output.by_source.len());
    let sets = post_process(output, &PointSourceSplitter);

    for (index, set) in sets.into_iter().enumerate() {
        log::info!("processing source {}", index);

        let output_path = prefixed(index, &args.output);
        let raster = if args.minimum_output.is_empty() {
            None
        } else {
            Some(PathBuf::from(prefixed(index, &args.minimum_output)))
        };

        let pipeline = density_pipeline(args, &output_path, raster);
        post_process(set, &pipeline)?;

        log::info!("completed source {}", index);
    }

    Ok(())
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();

    let args = Cli::parse();

    if let Err(message) = validate(&args) {
        eprintln!("{}", message);
        process::exit(1);
    }

    let file = match LasFile::open(&args.input) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("error accessing LAS file: {}", error);
            process::exit(1);
        }
    };

    let outcome = if args.split_sources {
        run_split_sources(&file, &args)
    } else {
        run_density(&file, &args)
    };

    if let Err(error) = outcome {
        eprintln!("{}", error);
        process::exit(1);
    }

    println!("Complete");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write as _;

    use byteorder::{ByteOrder, LittleEndian};
    use tempfile::NamedTempFile;

    use super::*;

    fn base_args() -> Cli {
        Cli::parse_from(["fuelvox", "input.las"])
    }

    // Format-0 LAS file with scale 0.01 and zero offset.
    fn write_las(points: &[(f64, f64, f64)], bounds: ([f64; 3], [f64; 3])) -> NamedTempFile {
        let record_length = 20u16;
        let mut bytes = vec![0u8; 227];
        bytes[0..4].copy_from_slice(b"LASF");
        LittleEndian::write_u32(&mut bytes[96..100], 227);
        bytes[104] = 0;
        LittleEndian::write_u16(&mut bytes[105..107], record_length);
        LittleEndian::write_u32(&mut bytes[107..111], points.len() as u32);
        for i in 0..3 {
            LittleEndian::write_f64(&mut bytes[131 + i * 8..139 + i * 8], 0.01);
        }
        let (min, max) = bounds;
        for i in 0..3 {
            LittleEndian::write_f64(&mut bytes[179 + i * 16..187 + i * 16], max[i]);
            LittleEndian::write_f64(&mut bytes[187 + i * 16..195 + i * 16], min[i]);
        }

        for &(x, y, z) in points {
            let mut record = vec![0u8; record_length as usize];
            LittleEndian::write_i32(&mut record[0..4], (x * 100.0).round() as i32);
            LittleEndian::write_i32(&mut record[4..8], (y * 100.0).round() as i32);
            LittleEndian::write_i32(&mut record[8..12], (z * 100.0).round() as i32);
            bytes.extend_from_slice(&record);
        }

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file
    }

    #[test]
    fn test_density_run_end_to_end() {
        let las = write_las(
            &[(0.05, 0.05, 0.05), (0.06, 0.06, 0.06), (2.0, 0.0, 0.0)],
            ([0.0, 0.0, 0.0], [2.0, 1.0, 1.0]),
        );
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("voxels.csv");

        let args = Cli::parse_from([
            "fuelvox",
            las.path().to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--density",
            "2",
            "--chunks",
            "2",
            "--concurrency",
            "3",
        ]);
        let file = LasFile::open(las.path()).unwrap();

        run_density(&file, &args).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert_eq!(contents, "x,y,z\n0,0,0\n");
    }

    #[test]
    fn test_sequential_run_matches_parallel() {
        let las = write_las(
            &[(0.05, 0.05, 0.05), (0.06, 0.06, 0.06), (2.0, 0.0, 0.0)],
            ([0.0, 0.0, 0.0], [2.0, 1.0, 1.0]),
        );
        let dir = tempfile::tempdir().unwrap();
        let parallel_output = dir.path().join("parallel.csv");
        let sequential_output = dir.path().join("sequential.csv");

        let file = LasFile::open(las.path()).unwrap();

        let mut args = base_args();
        args.density = 2;
        args.chunks = 3;
        args.output = parallel_output.to_str().unwrap().to_string();
        run_density(&file, &args).unwrap();

        args.sequential = true;
        args.output = sequential_output.to_str().unwrap().to_string();
        run_density(&file, &args).unwrap();

        let mut parallel: Vec<String> = fs::read_to_string(&parallel_output)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        let mut sequential: Vec<String> = fs::read_to_string(&sequential_output)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        parallel.sort_unstable();
        sequential.sort_unstable();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_source_prefix_applies_to_the_whole_path() {
        assert_eq!(prefixed(2, "output.csv"), "2-output.csv");
    }

    #[test]
    fn test_defaults_match_the_documented_surface() {
        let args = base_args();
        assert_eq!(args.output, "output.csv");
        assert_eq!(args.concurrency, 32);
        assert_eq!(args.chunks, 256);
        assert_eq!(args.density, 20);
        assert_eq!(args.voxel, 0.1);
        assert!(!args.normalize);
        assert!(!args.gradient);
        assert_eq!(args.minimum_output, "");
        assert!(!args.split_sources);
        assert!(!args.measurements);
        assert!(!args.sequential);
        assert!(validate(&args).is_ok());
    }

    #[test]
    fn test_constraints_are_rejected_before_io() {
        let mut args = base_args();
        args.concurrency = 2;
        assert!(validate(&args).is_err());

        let mut args = base_args();
        args.chunks = 0;
        assert!(validate(&args).is_err());

        let mut args = base_args();
        args.density = 1;
        assert!(validate(&args).is_err());

        let mut args = base_args();
        args.voxel = 0.0;
        assert!(validate(&args).is_err());

        let mut args = base_args();
        args.gradient = true;
        args.measurements = true;
        assert!(validate(&args).is_err());
    }
}
