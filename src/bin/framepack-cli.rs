//! Demo driver: packs and unpacks a raw 12-bit-per-pixel plane file, the same
//! role `c_example/example.c` plays for the original C library. Reads a raw
//! `u16` plane (little-endian, one sample per pixel) or, without `--input`,
//! synthesizes a gradient test pattern.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{Arg, ArgAction, Command};
use framepack::Context;
use std::time::Instant;
use std::{fs, io::Write};

/// A scoped utility struct for measuring and reporting time.
struct Timer {
    start: Instant,
    label: &'static str,
}

impl Timer {
    fn new(label: &'static str) -> Self {
        Self { start: Instant::now(), label }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed().as_secs_f32();
        log::info!("{} completed in {:.3} seconds", self.label, elapsed);
    }
}

fn synth_pattern(width: usize, height: usize) -> Vec<u16> {
    (0..width * height)
        .map(|i| {
            let x = i % width;
            let y = i / width;
            ((x + y * width) % 4096) as u16
        })
        .collect()
}

fn load_plane(path: &str) -> Vec<u16> {
    let bytes = fs::read(path).expect("Can't open the input file");
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

fn main() {
    env_logger::builder().format_timestamp(None).init();

    let matches = Command::new("framepack-cli")
        .version("0.1")
        .about("Packs and unpacks 12-bit image frames with the tiled FSE codec")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Raw u16-LE 12-bit plane file; synthesizes a test pattern if omitted")
                .num_args(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to write the packed frame")
                .num_args(1),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .value_name("PIXELS")
                .help("Frame width")
                .num_args(1),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .help("Frame height")
                .num_args(1),
        )
        .arg(
            Arg::new("tile-width")
                .long("tile-width")
                .value_name("PIXELS")
                .help("Tile width")
                .num_args(1),
        )
        .arg(
            Arg::new("tile-height")
                .long("tile-height")
                .value_name("PIXELS")
                .help("Tile height (must be a multiple of 4)")
                .num_args(1),
        )
        .arg(
            Arg::new("no-write")
                .long("no-write")
                .help("Don't write the packed output file")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let width: usize = matches
        .get_one::<String>("width")
        .and_then(|s| s.parse().ok())
        .unwrap_or(256);
    let height: usize = matches
        .get_one::<String>("height")
        .and_then(|s| s.parse().ok())
        .unwrap_or(256);
    let twidth: usize = matches
        .get_one::<String>("tile-width")
        .and_then(|s| s.parse().ok())
        .unwrap_or(16);
    let theight: usize = matches
        .get_one::<String>("tile-height")
        .and_then(|s| s.parse().ok())
        .unwrap_or(16);
    let no_write = matches.get_flag("no-write");

    let input: Vec<u16> = match matches.get_one::<String>("input") {
        Some(path) => load_plane(path),
        None => {
            log::info!("No --input given, synthesizing a {width}x{height} gradient pattern");
            synth_pattern(width, height)
        }
    };

    if input.len() != width * height {
        log::error!(
            "input has {} samples, expected {} for a {}x{} frame",
            input.len(),
            width * height,
            width,
            height
        );
        return;
    }

    let mut ctx = match Context::new(width, height, 12, twidth, theight) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("could not create context: {e}");
            return;
        }
    };

    let mut packed = vec![0u8; ctx.max_packed_size()];
    let written = {
        let _t = Timer::new("pack");
        ctx.pack(&input, &mut packed, 1, width as isize)
    };

    if written == 0 {
        log::error!("pack failed");
        return;
    }
    packed.truncate(written);
    log::info!(
        "Packed {} pixels ({} raw bytes) into {} bytes ({:.3}x ratio)",
        input.len(),
        input.len() * 2,
        written,
        (input.len() * 2) as f64 / written as f64
    );

    if !no_write {
        if let Some(path) = matches.get_one::<String>("output") {
            let mut f = fs::File::create(path).expect("can't create output file");
            f.write_all(&packed).expect("can't write output file");
            log::info!("Wrote {path}");
        }
    }

    let mut roundtripped = vec![0u16; width * height];
    let ok = {
        let _t = Timer::new("unpack");
        ctx.unpack(&packed, &mut roundtripped, 1, width as isize)
    };

    if !ok {
        log::error!("unpack failed");
        return;
    }
    if roundtripped == input {
        log::info!("Round-trip verified: output matches input exactly");
    } else {
        log::error!("Round-trip mismatch!");
    }
}
