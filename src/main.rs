//! # Boxflow CLI
//!
//! Usage:
//!   boxflow layout.json -o geometry.json
//!   echo '{ "root": { ... } }' | boxflow --width 800 --height 600
//!   boxflow --example | boxflow --paint --pretty

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use boxflow::model::Document;
use boxflow::paint::{self, DisplayList};
use boxflow::{LayoutEngine, LayoutInfo, Viewport};

#[derive(Debug, Parser)]
#[command(name = "boxflow", version, about = "Lay out a JSON box tree and print its geometry")]
struct Cli {
    /// Input document. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Write output here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Viewport width, overriding the document.
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Viewport height, overriding the document.
    #[arg(long, requires = "width")]
    height: Option<f64>,

    /// Emit the paint list (rectangles in paint order) instead of the layout.
    #[arg(long)]
    paint: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Print an example document and exit.
    #[arg(long)]
    example: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.example {
        print!("{}", example_document_json());
        return Ok(());
    }

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let mut document: Document =
        serde_json::from_str(&input).map_err(boxflow::Error::from)?;
    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        document.viewport = Viewport::new(width, height);
    }
    let viewport = document.viewport;

    let tree = LayoutEngine::new(viewport).calculate(document.root.into_tree())?;
    log::info!("laid out {} boxes", tree.len());

    let json = if cli.paint {
        let mut list = DisplayList::default();
        paint::paint(&tree, &mut list);
        to_json(&list, cli.pretty)?
    } else {
        to_json(&LayoutInfo::from_tree(&tree, viewport), cli.pretty)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("✓ Written {} bytes to {}", json.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    Ok(json.map_err(boxflow::Error::Serialize)?)
}

fn example_document_json() -> &'static str {
    r##"{
  "viewport": { "width": 1280, "height": 720 },
  "root": {
    "id": "card",
    "style": {
      "width": "100%",
      "height": "100%",
      "flexDirection": "row",
      "alignItems": "center",
      "padding": 10,
      "gap": 10,
      "backgroundColor": "#1a1a1d"
    },
    "children": [
      {
        "id": "left",
        "style": { "height": 100, "flex": 1, "backgroundColor": "blue" }
      },
      {
        "id": "middle",
        "style": { "height": 100, "flex": 1, "backgroundColor": "beige" }
      },
      {
        "id": "right",
        "style": {
          "height": 200,
          "flex": 2,
          "alignSelf": "flex-end",
          "backgroundColor": "pink"
        },
        "children": [
          {
            "id": "badge",
            "style": {
              "position": "absolute",
              "top": 8,
              "right": 8,
              "width": 24,
              "height": 24,
              "zIndex": 1,
              "backgroundColor": "red"
            }
          }
        ]
      },
      {
        "id": "hidden",
        "style": { "width": 50, "height": 50, "display": "none" }
      }
    ]
  }
}
"##
}
