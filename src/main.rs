//! v210dec: decode an uncompressed v210 file into yuv422p10le planes

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use bytes::Bytes;
use color_eyre::{eyre::eyre, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use v210dec::decode::passthrough::v210_row_bytes;
use v210dec::decode::PassthroughEngine;
use v210dec::{utils, Config, DecoderSession};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("v210dec=info"));

    #[cfg(feature = "profiling")]
    {
        use tracing_subscriber::prelude::*;
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_timer(tracing_subscriber::fmt::time::uptime()))
            .with(tracing_tracy::TracyLayer::default())
            .init();
    }

    #[cfg(not(feature = "profiling"))]
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .init();
}

fn main() -> Result<()> {
    // Initialize error handling and logging
    color_eyre::install()?;
    init_tracing();

    let mut args = std::env::args_os().skip(1);
    let (input, output) = match (args.next(), args.next()) {
        (Some(i), Some(o)) => (PathBuf::from(i), PathBuf::from(o)),
        _ => return Err(eyre!("usage: v210dec <input.v210> <output.yuv> [config.toml]")),
    };
    let config_path = args.next().map(PathBuf::from);

    // Load configuration
    let config = Config::load(config_path.as_deref())?;
    let (width, height) = (config.output.width, config.output.height);
    info!("Decoding {} at {}x{}", input.display(), width, height);

    let map = utils::map_input(&input)?;
    let frame_bytes = v210_row_bytes(width)
        .checked_mul(height as usize)
        .filter(|&n| n > 0)
        .ok_or_else(|| eyre!("Invalid frame size {}x{}", width, height))?;
    if map.len() % frame_bytes != 0 {
        tracing::warn!(
            "Input length {} is not a multiple of the frame size {}; trailing bytes ignored",
            map.len(),
            frame_bytes
        );
    }

    let mut session = DecoderSession::open(PassthroughEngine, config.decoder.clone())?;
    info!(
        "Threaded decode: {}, frame alignment: {} bytes",
        session.config().threaded,
        session.config().frame_alignment
    );
    let mut out = BufWriter::new(File::create(&output)?);
    let start = Instant::now();

    let data = Bytes::from_owner(map);
    for offset in (0..data.len() / frame_bytes).map(|i| i * frame_bytes) {
        let packet = data.slice(offset..offset + frame_bytes);
        let frame = session.decode(&packet, width, height)?;
        utils::write_planar(&mut out, &frame)?;
    }

    info!(
        "Decoded {} frames to {} in {:?}",
        session.frames_decoded(),
        output.display(),
        start.elapsed()
    );
    Ok(())
}
