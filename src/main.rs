//! Vector Scene CLI
//!
//! Usage:
//!   vector-scene [OPTIONS] [FILE]
//!
//! Options:
//!   -s, --stylesheet <FILE>  Extra CSS rules (TOML format)
//!   --no-resolve             Emit translate/scale entries instead of folding them
//!   --no-resize              Do not derive the viewBox from content
//!   -p, --pretty             Indent nested elements
//!   --fragment               Omit the XML declaration
//!   -e, --example            Print an annotated example scene
//!   -d, --debug              Log pipeline details to stderr
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vector_scene::{render_with_config, RenderConfig, SvgConfig, Stylesheet};

#[derive(Parser)]
#[command(name = "vector-scene")]
#[command(about = "Render TOML scene descriptions to SVG")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Extra CSS rules merged over the scene's own (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Keep translate/scale as transform attributes
    #[arg(long)]
    no_resolve: bool,

    /// Do not derive the viewBox from content
    #[arg(long)]
    no_resize: bool,

    /// Indent nested elements
    #[arg(short, long)]
    pretty: bool,

    /// Omit the XML declaration
    #[arg(long)]
    fragment: bool,

    /// Print an annotated example scene
    #[arg(short, long)]
    example: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.example {
        print!("{}", EXAMPLE_SCENE);
        return ExitCode::SUCCESS;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return ExitCode::SUCCESS;
    }

    let mut config = RenderConfig::new()
        .with_resolve_transforms(!cli.no_resolve)
        .with_auto_resize(!cli.no_resize)
        .with_svg(
            SvgConfig::new()
                .with_standalone(!cli.fragment)
                .with_pretty_print(cli.pretty),
        );

    if let Some(path) = &cli.stylesheet {
        match Stylesheet::from_file(path) {
            Ok(s) => config = config.with_stylesheet(s),
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                return ExitCode::FAILURE;
            }
            buffer
        }
    };

    match render_with_config(&source, config) {
        Ok(svg) => {
            println!("{}", svg);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_intro() {
    println!(
        r#"Vector Scene - render TOML scene descriptions to SVG

USAGE:
    vector-scene [OPTIONS] [FILE]
    cat scene.toml | vector-scene

OPTIONS:
    -s, --stylesheet   Extra CSS rules (TOML file)
    --no-resolve       Keep translate/scale as transform attributes
    --no-resize        Do not derive the viewBox from content
    -p, --pretty       Indent nested elements
    --fragment         Omit the XML declaration
    -e, --example      Print an annotated example scene
    -d, --debug        Log pipeline details to stderr
    -h, --help         Print help

QUICK START:
    vector-scene --example > scene.toml
    vector-scene scene.toml > scene.svg"#
    );
}

const EXAMPLE_SCENE: &str = r##"# Optional fixed viewport; derived from content when absent
# view_box = "0 0 200 100"

# CSS rules embedded in a <style> block
[stylesheet.".accent"]
fill = "#2196f3"
stroke = "#1565c0"

# Shapes: rect, circle, ellipse, line, polygon, polyline, path, text, group
[[nodes]]
kind = "rect"
x = 10
y = 10
width = 80
height = 40
rx = 4
class = "accent"
# translate/scale fold into coordinates; rotate stays a transform attribute
transform = [{ translate = [5] }, { rotate = [15] }]

[[nodes]]
kind = "text"
text = "hello"
x = 20
y = 35
style = { font_size = 14, fill = "white" }

# Group transforms apply to every child
[[nodes]]
kind = "group"
transform = [{ translate = [120, 10] }, { scale = [2] }]

[[nodes.children]]
kind = "circle"
cx = 10
cy = 10
r = 8
style = { fill = "#ff9800" }

[[nodes.children]]
kind = "polyline"
points = [[0, 20], [10, 25], [20, 20]]
style = { fill = "none", stroke = "#333333" }
"##;
