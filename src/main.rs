use std::path::PathBuf;

use anyhow::{Context, bail};
use rawkit_rs::logger;
use rawkit_rs::raw_pipeline::{ExportFormat, ProcessingOptions, open_session};

use tracing::info;

fn usage() -> ! {
    eprintln!("usage: rawkit_rs <input> <output> [ppm|tiff]");
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args_os().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        usage();
    };
    let (input, output) = (PathBuf::from(input), PathBuf::from(output));

    let format = match args.next().as_ref().and_then(|f| f.to_str()) {
        Some("ppm") => ExportFormat::Pixmap,
        Some("tiff") | Some("tif") => ExportFormat::TaggedImage,
        Some(other) => bail!("unknown output format '{}'", other),
        None => ExportFormat::from_path(&output)?,
    };

    let mut session =
        open_session(&input).with_context(|| format!("opening {}", input.display()))?;

    let metadata = session.metadata()?;
    info!(
        "{} {}: ISO {} 1/{:.0}s f/{:.1} {}mm",
        metadata.make,
        metadata.model,
        metadata.iso_speed,
        if metadata.shutter > 0.0 {
            1.0 / metadata.shutter
        } else {
            0.0
        },
        metadata.aperture,
        metadata.focal_length
    );

    session.process(&ProcessingOptions::default())?;
    session
        .save(&output, format)
        .with_context(|| format!("writing {}", output.display()))?;
    session.close();

    info!("Conversion successful!");
    println!("{}", session.timings());
    Ok(())
}
