mod config;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use blockforge_blocks::{Atlas, map_voxels_with_report};
use blockforge_io::{
    ExportOptions, SchematicExporter, load_obj_mesh, load_texture, read_schematic,
    write_block_names_preview, write_voxel_preview,
};
use blockforge_voxel::compute_face_visibility;
use blockforge_voxelize::{BasicGridVoxelizer, Voxelizer};
use clap::{Args, Parser, Subcommand};

use config::{PipelineConfig, load_config};

#[derive(Parser, Debug)]
#[command(name = "blockforge")]
#[command(about = "Convert textured meshes into Minecraft schematics")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Voxelize a mesh, pick blocks from an atlas and write a .schem file
    Convert(ConvertArgs),
    /// Print dimensions and block counts of a .schem file
    Inspect {
        schem: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Wavefront OBJ with texture coordinates
    #[arg(long)]
    mesh: PathBuf,

    /// Texture image sampled by the mesh UVs
    #[arg(long)]
    texture: PathBuf,

    /// Output schematic path
    #[arg(long)]
    out: PathBuf,

    /// Block atlas (JSON); overrides [atlas].path
    #[arg(long)]
    atlas: Option<PathBuf>,

    /// Pipeline settings file
    #[arg(long, default_value = "blockforge.toml")]
    config: PathBuf,

    /// Voxels along the longest mesh axis
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_blocks: Option<u32>,

    /// Fill the enclosed interior
    #[arg(long, overrides_with = "no_fill")]
    fill: bool,

    /// Keep only the surface shell
    #[arg(long, overrides_with = "fill")]
    no_fill: bool,

    /// Minecraft data version written to the schematic
    #[arg(long)]
    data_version: Option<i32>,

    /// Write voxels.json and blocks.json here
    #[arg(long)]
    preview_dir: Option<PathBuf>,
}

/// Settings after layering CLI flags over the config file.
#[derive(Debug)]
struct Resolved {
    atlas: PathBuf,
    max_blocks: u32,
    fill: bool,
    export: ExportOptions,
}

fn resolve(args: &ConvertArgs, cfg: PipelineConfig) -> Result<Resolved, Box<dyn Error>> {
    let atlas = args
        .atlas
        .clone()
        .or(cfg.atlas.path)
        .ok_or("no atlas given (use --atlas or [atlas].path)")?;
    let max_blocks = args.max_blocks.unwrap_or(cfg.voxelize.max_blocks);
    if max_blocks == 0 {
        return Err("max_blocks must be at least 1".into());
    }
    let fill = if args.fill {
        true
    } else if args.no_fill {
        false
    } else {
        cfg.voxelize.fill
    };
    Ok(Resolved {
        atlas,
        max_blocks,
        fill,
        export: ExportOptions {
            data_version: args.data_version.unwrap_or(cfg.export.data_version),
            air: cfg.export.air,
        },
    })
}

fn convert(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let cfg = if args.config.exists() {
        load_config(&args.config)?
    } else {
        log::debug!("{} not found; using defaults", args.config.display());
        PipelineConfig::default()
    };
    let settings = resolve(args, cfg)?;
    log::info!(
        "convert: max_blocks={} fill={} data_version={}",
        settings.max_blocks,
        settings.fill,
        settings.export.data_version
    );

    let atlas = Atlas::load(&settings.atlas)?;
    let mesh = load_obj_mesh(&args.mesh)?;
    let texture = load_texture(&args.texture)?;

    let (voxels, solid) =
        BasicGridVoxelizer.run(&mesh, &texture, settings.max_blocks, settings.fill);
    let visibility = compute_face_visibility(&solid);
    let (blocks, skipped) = map_voxels_with_report(&voxels, &visibility, &atlas);
    if !skipped.is_empty() {
        log::warn!("{} voxels could not be placed", skipped.len());
    }

    if let Some(dir) = &args.preview_dir {
        write_previews(dir, &voxels, &blocks, solid.dims())?;
    }

    SchematicExporter::with_options(&blocks, &settings.export)?.export(&args.out)?;
    println!("{}", args.out.display());
    Ok(())
}

fn write_previews(
    dir: &Path,
    voxels: &blockforge_voxel::VoxelMesh,
    blocks: &blockforge_blocks::BlockMesh,
    dims: (usize, usize, usize),
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    write_voxel_preview(voxels, dir.join("voxels.json"))?;
    write_block_names_preview(blocks, dims, dir.join("blocks.json"))?;
    log::info!("previews written to {}", dir.display());
    Ok(())
}

fn inspect(path: &Path) -> Result<(), Box<dyn Error>> {
    let schem = read_schematic(path)?;
    let (w, h, l) = schem.dims();
    println!("{}", path.display());
    println!("  version {} (data version {})", schem.version, schem.data_version);
    println!("  size {}x{}x{} (width x height x length)", w, h, l);
    println!("  palette {} entries", schem.palette_max);
    for (name, count) in schem.block_counts()? {
        println!("    {:>8}  {}", count, name);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Command::Convert(args) => convert(args),
        Command::Inspect { schem } => inspect(schem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ConvertArgs {
        let mut argv = vec!["blockforge", "convert", "--mesh", "m.obj", "--texture", "t.png"];
        argv.extend_from_slice(&["--out", "o.schem"]);
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Convert(a) => a,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = PipelineConfig::default();
        cfg.atlas.path = Some("from_config.atlas".into());
        let r = resolve(
            &parse(&["--atlas", "cli.atlas", "--max-blocks", "64", "--no-fill"]),
            cfg,
        )
        .unwrap();
        assert_eq!(r.atlas, PathBuf::from("cli.atlas"));
        assert_eq!(r.max_blocks, 64);
        assert!(!r.fill);
        assert_eq!(r.export.data_version, 3953);
    }

    #[test]
    fn config_fills_unset_flags() {
        let mut cfg = PipelineConfig::default();
        cfg.atlas.path = Some("vanilla.atlas".into());
        cfg.voxelize.fill = false;
        cfg.export.data_version = 3465;
        let r = resolve(&parse(&[]), cfg.clone()).unwrap();
        assert_eq!(r.atlas, PathBuf::from("vanilla.atlas"));
        assert_eq!(r.max_blocks, 128);
        assert!(!r.fill);
        assert_eq!(r.export.data_version, 3465);

        assert!(resolve(&parse(&["--fill"]), cfg).unwrap().fill);
    }

    #[test]
    fn missing_atlas_and_zero_resolution_are_errors() {
        assert!(resolve(&parse(&[]), PipelineConfig::default()).is_err());
        assert!(Cli::try_parse_from([
            "blockforge", "convert", "--mesh", "m", "--texture", "t", "--out", "o",
            "--max-blocks", "0",
        ])
        .is_err());
        let mut cfg = PipelineConfig::default();
        cfg.atlas.path = Some("a".into());
        cfg.voxelize.max_blocks = 0;
        assert!(resolve(&parse(&[]), cfg).is_err());
    }

    #[test]
    fn demo_atlas_parses() {
        let atlas = Atlas::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/demo.atlas"))
            .unwrap();
        assert_eq!(atlas.len(), 8);
        assert_eq!(atlas.blocks()[0].name, "minecraft:white_concrete");
    }

    #[test]
    fn convert_writes_a_readable_schematic() {
        let dir = tempfile::tempdir().unwrap();
        let obj = dir.path().join("cube.obj");
        fs::write(
            &obj,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 0 1\nv 1 0 1\nv 1 1 1\nv 0 1 1\n\
             vt 0.5 0.5\n\
             f 1/1 3/1 2/1\nf 1/1 4/1 3/1\nf 5/1 6/1 7/1\nf 5/1 7/1 8/1\n\
             f 1/1 2/1 6/1\nf 1/1 6/1 5/1\nf 4/1 8/1 7/1\nf 4/1 7/1 3/1\n\
             f 1/1 5/1 8/1\nf 1/1 8/1 4/1\nf 2/1 3/1 7/1\nf 2/1 7/1 6/1\n",
        )
        .unwrap();
        let png = dir.path().join("red.png");
        image::RgbImage::from_pixel(1, 1, image::Rgb([142, 33, 33]))
            .save(&png)
            .unwrap();
        let out = dir.path().join("cube.schem");
        let previews = dir.path().join("preview");

        let mut args = parse(&["--atlas", "x", "--max-blocks", "4"]);
        args.mesh = obj;
        args.texture = png;
        args.out = out.clone();
        args.atlas = Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/demo.atlas"));
        args.config = dir.path().join("absent.toml");
        args.preview_dir = Some(previews.clone());
        convert(&args).unwrap();

        let schem = read_schematic(&out).unwrap();
        assert_eq!(schem.dims(), (4, 4, 4));
        let counts = schem.block_counts().unwrap();
        assert_eq!(counts["minecraft:red_concrete"], 64);
        assert_eq!(counts["minecraft:air"], 0);
        assert!(previews.join("voxels.json").exists());
        assert!(previews.join("blocks.json").exists());
    }
}
