//! binary font conversion tool
//!
//! Rasterizes the requested characters of a font file and writes a C header
//! and source describing the packed glyphs.

use std::path::PathBuf;

use clap::Parser;
use pakka::{parse_codes, Bpp, Error, Options, DEFAULT_ROW_THRESHOLD};

#[derive(Parser, Debug)]
#[command(version, about = "Convert a font file into a packed bitmap font for embedded renderers.")]
struct Args {
    /// Bits per pixel of the generated font (1, 2, 4 or 8)
    #[arg(long)]
    bpp: u8,

    /// Name of the generated font, used as the prefix of every C symbol
    #[arg(long)]
    name: String,

    /// Height of the generated font in pixels per em
    #[arg(long)]
    height: u32,

    /// The font file to convert
    #[arg(long)]
    font: PathBuf,

    /// Face index when the font file is a collection
    #[arg(long, default_value_t = 0)]
    index: u32,

    /// Comma separated list of codes or ranges to convert, e.g. 65,66-70,0x20AC
    #[arg(long)]
    characters: String,

    /// Drop rows whose intensity is below this fraction of a full row
    #[arg(long, default_value_t = DEFAULT_ROW_THRESHOLD)]
    row_threshold: f64,

    /// Directory the generated files are written to
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let command = std::env::args().collect::<Vec<_>>().join(" ");
    match options(args).and_then(|options| pakka::run(&options, &command)) {
        Ok((header, source)) => {
            println!("{}\n{}", header.display(), source.display());
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn options(args: Args) -> Result<Options, Error> {
    Ok(Options {
        name: args.name,
        bpp: Bpp::try_from(args.bpp)?,
        height: args.height,
        font: args.font,
        font_index: args.index,
        characters: parse_codes(&args.characters)?,
        row_threshold: args.row_threshold,
        output: args.output,
    })
}
