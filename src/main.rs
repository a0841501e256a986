//! Squisher CLI - Offline repair tool for Halo CE cache files.
//!
//! Each map named on the command line is loaded, repaired in memory and
//! written back only if every repair succeeded.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use squisher_cache::{is_resource_map_path, CacheFile};
use squisher_patch::{process, Outcome, PatchOptions};

/// Squisher - repair defects left in Halo CE maps by the stock compilers
#[derive(Parser)]
#[command(name = "squisher")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cache files to repair
    #[arg(required = true, value_name = "MAP")]
    maps: Vec<PathBuf>,

    /// Keep the stored checksum instead of updating it
    #[arg(long)]
    preserve_crc: bool,

    /// Skip the corruption audit
    #[arg(long, env = "SQUISHER_RELAXED")]
    relaxed: bool,

    /// Mark repaired maps so they are not processed again
    #[arg(long)]
    stamp_build: bool,

    /// Tag paths of the stock bitmaps.map, one per line
    #[arg(long, env = "SQUISHER_BITMAP_RESOURCES", value_name = "FILE")]
    bitmap_resources: Option<PathBuf>,

    /// Repair in memory only, never write
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// What happened to one map.
#[derive(Debug, PartialEq, Eq)]
enum Status {
    Saved,
    WouldSave,
    NoChanges,
    SkippedResourceMap,
}

impl Status {
    fn message(&self) -> &'static str {
        match self {
            Status::Saved => "Saved!",
            Status::WouldSave => "Repairs found (dry run, not saved)",
            Status::NoChanges => "No changes necessary",
            Status::SkippedResourceMap => "Skipped resource map",
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let bitmap_resources = match &cli.bitmap_resources {
        Some(path) => {
            let text = fs::read(path)
                .with_context(|| format!("Failed to read bitmap resource list {}", path.display()))?;
            let resources = PatchOptions::parse_resource_list(&text);
            info!("loaded {} bitmap resource paths", resources.len());
            Some(resources)
        }
        None => None,
    };
    let options = PatchOptions {
        preserve_checksum: cli.preserve_crc,
        relaxed: cli.relaxed,
        stamp_build: cli.stamp_build,
        bitmap_resources,
        dry_run: cli.dry_run,
    };

    let pb = if cli.maps.len() > 1 {
        let pb = ProgressBar::new(cli.maps.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let failures = squish_all(&cli.maps, &options, &pb);
    pb.finish_and_clear();

    debug!(files = cli.maps.len(), failures, "done");
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Repair every map in turn, reporting one line per file. A failed file does
/// not stop the rest. Returns the number of failed files.
fn squish_all(maps: &[PathBuf], options: &PatchOptions, pb: &ProgressBar) -> usize {
    let mut failures = 0;
    for path in maps {
        let line = match squish_file(path, options) {
            Ok(status) => format!("{}: {}", path.display(), status.message()),
            Err(e) => {
                failures += 1;
                format!("{}: {:#}", path.display(), e)
            }
        };
        pb.suspend(|| println!("{line}"));
        pb.inc(1);
    }
    failures
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Repair one map. The file is only written after the whole pipeline succeeded.
fn squish_file(path: &Path, options: &PatchOptions) -> Result<Status> {
    if is_resource_map_path(path) {
        return Ok(Status::SkippedResourceMap);
    }

    let mut cache = CacheFile::open(path).context("Failed to load cache file")?;
    match process(&mut cache, options)? {
        Outcome::NoChanges => Ok(Status::NoChanges),
        Outcome::Patched { changes } => {
            info!("{}: {changes} repairs", path.display());
            if options.dry_run {
                return Ok(Status::WouldSave);
            }
            cache.save(path).context("Failed to save cache file")?;
            Ok(Status::Saved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use squisher_cache::builder::CacheFileBuilder;
    use squisher_cache::definitions::Shader;
    use squisher_cache::TagGroup;
    use tempfile::TempDir;
    use zerocopy::{FromZeros, IntoBytes};

    fn write_map(dir: &TempDir, name: &str, shader_type: u16) -> PathBuf {
        let mut shader = Shader::new_zeroed();
        shader.shader_type.set(shader_type);

        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        builder.add_tag(TagGroup::Shader, "shaders\\floor", shader.as_bytes());

        let path = dir.path().join(name);
        fs::write(&path, builder.build()).unwrap();
        path
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["squisher", "-vv", "--preserve-crc", "--dry-run", "a.map", "b.map"]).unwrap();
        assert_eq!(cli.maps.len(), 2);
        assert_eq!(cli.verbose, 2);
        assert!(cli.preserve_crc);
        assert!(cli.dry_run);
        assert!(!cli.stamp_build);

        assert!(Cli::try_parse_from(["squisher"]).is_err());
    }

    #[test]
    fn test_saved() {
        let dir = TempDir::new().unwrap();
        let path = write_map(&dir, "broken.map", 0xFF05);
        let before = fs::read(&path).unwrap();

        let status = squish_file(&path, &PatchOptions::default()).unwrap();
        assert_eq!(status, Status::Saved);

        let after = fs::read(&path).unwrap();
        assert_eq!(after.len(), before.len());
        assert_ne!(after, before);
        assert_eq!(squish_file(&path, &PatchOptions::default()).unwrap(), Status::NoChanges);
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = write_map(&dir, "broken.map", 0xFF05);
        let before = fs::read(&path).unwrap();

        let options = PatchOptions {
            dry_run: true,
            ..PatchOptions::default()
        };
        let status = squish_file(&path, &options).unwrap();
        assert_eq!(status, Status::WouldSave);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_clean_map() {
        let dir = TempDir::new().unwrap();
        let path = write_map(&dir, "clean.map", 5);
        let before = fs::read(&path).unwrap();

        assert_eq!(squish_file(&path, &PatchOptions::default()).unwrap(), Status::NoChanges);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_resource_maps_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bitmaps.map");
        fs::write(&path, b"not a cache file").unwrap();

        assert_eq!(
            squish_file(&path, &PatchOptions::default()).unwrap(),
            Status::SkippedResourceMap
        );
    }

    #[test]
    fn test_failure_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("truncated.map");
        fs::write(&path, [0u8; 64]).unwrap();

        let error = squish_file(&path, &PatchOptions::default()).unwrap_err();
        assert!(format!("{error:#}").starts_with("Failed to load cache file: "));
        assert_eq!(fs::read(&path).unwrap(), vec![0u8; 64]);

        let missing = dir.path().join("missing.map");
        assert!(squish_file(&missing, &PatchOptions::default()).is_err());
    }

    #[test]
    fn test_bad_file_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("truncated.map");
        fs::write(&bad, [0u8; 64]).unwrap();
        let good = write_map(&dir, "broken.map", 0xFF05);
        let good_before = fs::read(&good).unwrap();

        let maps = vec![bad.clone(), good.clone()];
        let failures = squish_all(&maps, &PatchOptions::default(), &ProgressBar::hidden());

        assert_eq!(failures, 1);
        assert_eq!(fs::read(&bad).unwrap(), vec![0u8; 64]);
        assert_ne!(fs::read(&good).unwrap(), good_before);
        assert_eq!(squish_file(&good, &PatchOptions::default()).unwrap(), Status::NoChanges);
    }

    #[test]
    fn test_clean_batch_has_no_failures() {
        let dir = TempDir::new().unwrap();
        let maps = vec![write_map(&dir, "a.map", 5), write_map(&dir, "b.map", 0xFF05)];
        assert_eq!(squish_all(&maps, &PatchOptions::default(), &ProgressBar::hidden()), 0);
    }
}
