//! gifscope CLI - Command-line tool for inspecting the byte structure of GIF files.
//!
//! This is the main entry point for the gifscope command-line application.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gifscope_gif::{
    hex_rows, ApplicationExtension, FrameIndex, GifFile, GraphicControl, ImageDescriptor,
    StructureNode,
};

/// gifscope - GIF structure inspection tool
#[derive(Parser)]
#[command(name = "gifscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header and logical screen descriptor
    Info {
        /// Path to the GIF file
        #[arg(short, long, env = "GIFSCOPE_INPUT")]
        input: PathBuf,
    },

    /// List every block with its byte range
    Blocks {
        /// Path to the GIF file
        #[arg(short, long, env = "GIFSCOPE_INPUT")]
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show blocks grouped into frames
    Tree {
        /// Path to the GIF file
        #[arg(short, long, env = "GIFSCOPE_INPUT")]
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Explain a single byte
    Describe {
        /// Path to the GIF file
        #[arg(short, long, env = "GIFSCOPE_INPUT")]
        input: PathBuf,

        /// Byte offset (decimal, or hex with 0x prefix)
        #[arg(short, long, value_parser = parse_offset)]
        offset: i64,
    },

    /// Hex dump annotated with the owning block of each row
    Hexdump {
        /// Path to the GIF file
        #[arg(short, long, env = "GIFSCOPE_INPUT")]
        input: PathBuf,

        /// First offset to show (decimal, or hex with 0x prefix)
        #[arg(short, long, default_value = "0", value_parser = parse_offset)]
        start: i64,

        /// Number of rows to show
        #[arg(short, long)]
        rows: Option<usize>,

        /// Bytes per row
        #[arg(short, long, default_value_t = gifscope_gif::DEFAULT_BYTES_PER_ROW)]
        width: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Blocks { input, json } => {
            cmd_blocks(&input, json)?;
        }
        Commands::Tree { input, json } => {
            cmd_tree(&input, json)?;
        }
        Commands::Describe { input, offset } => {
            cmd_describe(&input, offset)?;
        }
        Commands::Hexdump {
            input,
            start,
            rows,
            width,
        } => {
            cmd_hexdump(&input, start, rows, width)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "gifscope=debug,gifscope_gif=debug"
    } else {
        "gifscope=warn,gifscope_gif=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Parse a decimal or `0x`-prefixed hex offset.
fn parse_offset(text: &str) -> Result<i64, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid offset '{}': {}", text, e))
}

fn load(input: &Path) -> Result<(GifFile, Vec<u8>)> {
    tracing::info!("Loading {}", input.display());
    GifFile::open(input).with_context(|| format!("Failed to load {}", input.display()))
}

fn cmd_info(input: &Path) -> Result<()> {
    let (file, data) = load(input)?;
    let screen = file.screen();

    println!("{}", file.path().display());
    println!("{}", file.status_line());
    println!("Size:                {} bytes", data.len());
    println!("Color resolution:    {}", screen.color_resolution());
    println!("Sort flag:           {}", screen.sort_flag());
    println!("Background index:    {}", screen.background_color_index);
    println!("Pixel aspect ratio:  {}", screen.pixel_aspect_ratio);

    let frames = FrameIndex::build(&file.tree(&data));
    println!("Frames:              {}", frames.frame_count());

    Ok(())
}

fn cmd_blocks(input: &Path, json: bool) -> Result<()> {
    let (file, data) = load(input)?;
    let ranges = file.ranges(&data);

    if json {
        println!("{}", serde_json::to_string_pretty(&ranges)?);
        return Ok(());
    }

    let index = FrameIndex::build(&file.tree(&data));
    for range in &ranges {
        match index.frame_of(range) {
            Some(frame) => println!("{:>5}  {}", format!("#{}", frame), range),
            None => println!("{:>5}  {}", "", range),
        }
    }

    let covered: usize = ranges.iter().map(|r| r.length).sum();
    println!("\nTotal: {} blocks, {} of {} bytes", ranges.len(), covered, data.len());

    Ok(())
}

fn cmd_tree(input: &Path, json: bool) -> Result<()> {
    let (file, data) = load(input)?;
    let tree = file.tree(&data);

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    print_node(&tree, &data, 0);
    println!("\nTotal: {} nodes, depth {}", tree.count(), tree.depth());

    Ok(())
}

fn print_node(node: &StructureNode, data: &[u8], depth: usize) {
    let indent = "  ".repeat(depth);
    match node.range() {
        Some(range) => println!("{}{}", indent, range),
        None => println!("{}{}{}", indent, node.title(), frame_summary(node, data)),
    }

    for child in node.children() {
        print_node(child, data, depth + 1);
    }
}

/// Decoded descriptor and timing fields shown next to a frame title.
fn frame_summary(node: &StructureNode, data: &[u8]) -> String {
    let mut summary = String::new();

    for range in node.children().iter().filter_map(|c| c.range()) {
        if let Some(desc) = ImageDescriptor::decode(data, range) {
            summary.push_str(&format!(
                " {}x{} @ {},{}",
                desc.width, desc.height, desc.left, desc.top
            ));
            if desc.interlace_flag() {
                summary.push_str(" interlaced");
            }
        }
        if let Some(gce) = GraphicControl::decode(data, range) {
            summary.push_str(&format!(
                " delay {}cs disposal {}",
                gce.delay,
                gce.disposal_method()
            ));
            if gce.transparency_flag() {
                summary.push_str(&format!(" transparent #{}", gce.transparent_index));
            }
        }
    }

    if summary.is_empty() {
        summary
    } else {
        format!(" ({})", summary.trim_start())
    }
}

fn cmd_describe(input: &Path, offset: i64) -> Result<()> {
    let (file, data) = load(input)?;

    let info = usize::try_from(offset)
        .ok()
        .and_then(|offset| file.inspect(&data, offset));

    match info {
        Some(info) => {
            println!("Offset:  0x{} ({})", info.offset_hex, info.offset);
            println!("Value:   0x{} ({}) '{}'", info.value_hex, info.value, info.ascii);
            println!("Meaning: {}", info.description);
        }
        None => println!("{}", file.describe(&data, offset)),
    }

    let owner = usize::try_from(offset).ok().and_then(|offset| {
        file.ranges(&data)
            .into_iter()
            .find(|r| r.contains(offset))
    });
    if let Some(range) = owner {
        println!("Block:   {}", range);
        if let Some(app) = ApplicationExtension::decode(&data, &range) {
            println!("App:     {}{}", app.identifier, app.auth_code);
        }
    }

    Ok(())
}

fn cmd_hexdump(input: &Path, start: i64, rows: Option<usize>, width: usize) -> Result<()> {
    let (file, data) = load(input)?;
    let start = usize::try_from(start).context("Start offset must not be negative")?;
    let ranges = file.ranges(&data);

    let rows = hex_rows(&data, width)
        .into_iter()
        .filter(|row| row.offset + row.bytes.len() > start)
        .take(rows.unwrap_or(usize::MAX));

    let width = if width == 0 { gifscope_gif::DEFAULT_BYTES_PER_ROW } else { width };

    for row in rows {
        let cells: Vec<String> = (0..width)
            .map(|i| row.cell(i).unwrap_or_else(|| "  ".to_string()))
            .collect();
        let owner = ranges
            .iter()
            .find(|r| r.contains(row.offset))
            .map(|r| r.name.as_str())
            .unwrap_or("");

        println!("{}  {}  |{}|  {}", row.offset_hex, cells.join(" "), row.ascii, owner);
    }

    Ok(())
}
