use anyhow::Context;
use clap::Parser;
use kerf::cli::{Cli, Command, EngraveArgs};
use kerf::{init_logging, CancelToken, DeviceConfig, GrblDriver, LogProgressListener};
use kerf_core::job::{check_job, Job, JobPart, LaserProperty, Point};
use kerf_encoder::{
    encode_raster, encode_raster3d, encode_vector, expand_command_block,
    raster3d_part_from_image, raster_part_from_image, BitmapImportParams, EmitterState,
};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(DeviceConfig::default_path);

    match cli.command {
        Command::Ports => cmd_ports(),
        Command::Engrave(args) => cmd_engrave(&config_path, args),
        Command::InitConfig { path } => {
            cmd_init_config(path.unwrap_or_else(DeviceConfig::default_path))
        }
    }
}

fn cmd_ports() -> anyhow::Result<()> {
    let ports = kerf_driver::list_ports()?;
    if ports.is_empty() {
        println!("no laser controller ports found");
        return Ok(());
    }
    for port in ports {
        match &port.manufacturer {
            Some(manufacturer) => {
                println!("{}  {} ({})", port.port_name, port.description, manufacturer)
            }
            None => println!("{}  {}", port.port_name, port.description),
        }
    }
    Ok(())
}

fn cmd_engrave(config_path: &Path, args: EngraveArgs) -> anyhow::Result<()> {
    let config = DeviceConfig::load_or_default(config_path)?;
    let img = image::open(&args.image)
        .with_context(|| format!("failed to open {}", args.image.display()))?;

    let params = BitmapImportParams {
        width_mm: args.width_mm,
        height_mm: args.height_mm,
        dpi: args.dpi,
        threshold: args.threshold,
        invert: args.invert,
    };
    let property = LaserProperty::power_speed(args.power, args.speed);
    let origin = Point::new(0, 0);
    let part = if args.grayscale {
        JobPart::Raster3d(raster3d_part_from_image(&img, &params, origin, property)?)
    } else {
        JobPart::Raster(raster_part_from_image(&img, &params, origin, property)?)
    };

    let name = args
        .image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "engrave".to_string());
    let mut job = Job::new(name);
    job.add_part(part);

    let driver = GrblDriver::new(config);
    match args.output {
        Some(path) => {
            let device = driver.config();
            check_job(&job, device.bed_width_mm, device.bed_height_mm)?;
            std::fs::write(&path, render_job(&driver, &job))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => {
            driver.send_job(&mut job, &mut LogProgressListener, &CancelToken::new())?;
        }
    }
    Ok(())
}

/// Encode a whole job, preamble and postamble included, without a device.
fn render_job(driver: &GrblDriver, job: &Job) -> String {
    let encoder_config = driver.encoder_config();
    let device = driver.config();
    let mut state = EmitterState::new();

    let mut out = expand_command_block(&device.pre_gcode);
    for part in &job.parts {
        let stream = match part {
            JobPart::Vector(p) => encode_vector(p, &mut state, &encoder_config),
            JobPart::Raster(p) => encode_raster(p, &mut state, &encoder_config),
            JobPart::Raster3d(p) => encode_raster3d(p, &mut state, &encoder_config),
        };
        out.push_str(&stream);
    }
    out.push('\n');
    out.push_str(&expand_command_block(&device.post_gcode));
    out
}

fn cmd_init_config(path: PathBuf) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    DeviceConfig::default().save_to_file(&path)?;
    println!("wrote {}", path.display());
    Ok(())
}
