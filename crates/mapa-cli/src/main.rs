use mapa::raster::{RasterError, RasterOptions};
use mapa::{
    MapConfig, MapSession, MindTree, SvgRenderOptions, Theme, ViewportSize, layout_tree, seed,
    settle,
};
use serde::Serialize;
use std::io::{Read, Write};
use std::str::FromStr;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Map(mapa::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Map(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<mapa::Error> for CliError {
    fn from(value: mapa::Error) -> Self {
        Self::Map(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Tree,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            RenderFormat::Svg => "svg",
            RenderFormat::Png => "png",
            RenderFormat::Jpeg => "jpg",
            RenderFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    theme: Option<String>,
    viewport_width: f64,
    viewport_height: f64,
    edits: Vec<(String, String)>,
    zoom_in: u32,
    zoom_out: u32,
    out: Option<String>,
}

fn usage() -> &'static str {
    "mapa-cli\n\
\n\
USAGE:\n\
  mapa-cli tree [--pretty] [<tree.json>|-]\n\
  mapa-cli layout [--pretty] [--config <config.json>] [<tree.json>|-]\n\
  mapa-cli render [--format svg|png|jpg|pdf] [--width <w>] [--height <h>] [--theme indigo|slate] [--config <config.json>] [--edit <id>=<label>]... [--zoom-in <n>] [--zoom-out <n>] [--scale <n>] [--background <css-color>] [--out <path>] [<tree.json>|-]\n\
\n\
NOTES:\n\
  - Without <tree.json> the built-in strategy manual is used; '-' reads the tree from stdin.\n\
  - render applies edits as dialog saves, lets the layout and auto-fit settle, then applies zoom steps.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> without one).\n\
  - Set MAPA_LOG (e.g. MAPA_LOG=debug) to enable diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_positive_f64(raw: &str) -> Result<f64, CliError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(CliError::Usage(usage())),
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        viewport_width: 1280.0,
        viewport_height: 800.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "tree" => args.command = Command::Tree,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = parse_positive_f64(next_value(&mut it)?)? as f32;
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--theme" => args.theme = Some(next_value(&mut it)?.clone()),
            "--width" => args.viewport_width = parse_positive_f64(next_value(&mut it)?)?,
            "--height" => args.viewport_height = parse_positive_f64(next_value(&mut it)?)?,
            "--edit" => {
                let raw = next_value(&mut it)?;
                let Some((id, label)) = raw.split_once('=') else {
                    return Err(CliError::Usage(usage()));
                };
                if id.is_empty() {
                    return Err(CliError::Usage(usage()));
                }
                args.edits.push((id.to_string(), label.to_string()));
            }
            "--zoom-in" => {
                args.zoom_in = next_value(&mut it)?
                    .parse::<u32>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--zoom-out" => {
                args.zoom_out = next_value(&mut it)?
                    .parse::<u32>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn load_tree(input: Option<&str>) -> Result<MindTree, CliError> {
    let text = match input {
        None => return Ok(seed::strategic_manual()),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    Ok(MindTree::from_json_str(&text).map_err(mapa::Error::from)?)
}

fn load_config(path: Option<&str>) -> Result<MapConfig, CliError> {
    match path {
        None => Ok(MapConfig::default()),
        Some(path) => Ok(MapConfig::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_bytes(bytes: &[u8], out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => std::io::stdout().lock().write_all(bytes)?,
        Some(path) => std::fs::write(path, bytes)?,
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> String {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path)
            .with_extension(ext)
            .to_string_lossy()
            .to_string(),
        _ => format!("out.{ext}"),
    }
}

/// Applies edits and zoom steps through the session, letting every animation finish.
fn drive_session(session: &mut MapSession, args: &Args) -> Duration {
    let mut now = settle(session, Duration::ZERO);

    if !args.edits.is_empty() {
        for (id, label) in &args.edits {
            if session.click_node(id).is_none() {
                tracing::warn!(id = id.as_str(), "edit target not found; skipped");
                continue;
            }
            session.set_draft(label.as_str());
            session.save_edit();
        }
        now = settle(session, now + FRAME);
    }

    for _ in 0..args.zoom_in {
        session.zoom_in(now);
        now = settle(session, now + FRAME);
    }
    for _ in 0..args.zoom_out {
        session.zoom_out(now);
        now = settle(session, now + FRAME);
    }
    now
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Tree => {
            let tree = load_tree(args.input.as_deref())?;
            write_json(&tree, args.pretty)
        }
        Command::Layout => {
            let tree = load_tree(args.input.as_deref())?;
            let config = load_config(args.config.as_deref())?;
            let layout = layout_tree(&tree, &config.layout);
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let tree = load_tree(args.input.as_deref())?;
            let mut config = load_config(args.config.as_deref())?;
            if let Some(name) = args.theme.as_deref() {
                config.theme = Theme::by_name(name).map_err(mapa::Error::from)?;
            }

            let mut session = MapSession::new(tree, config);
            session.resize(ViewportSize::new(args.viewport_width, args.viewport_height));
            let now = drive_session(&mut session, &args);
            tracing::debug!(?now, transform = ?session.transform(now), "session settled");

            let svg_options = SvgRenderOptions {
                background: args.background.clone(),
                ..Default::default()
            };
            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };
            let raster_out = || {
                args.out.clone().unwrap_or_else(|| {
                    default_raster_out_path(args.input.as_deref(), args.render_format.extension())
                })
            };

            match args.render_format {
                RenderFormat::Svg => {
                    let svg = session.render_svg(now, &svg_options);
                    write_bytes(svg.as_bytes(), args.out.as_deref())?;
                }
                RenderFormat::Png => {
                    let bytes = session.render_png(now, &svg_options, &raster)?;
                    write_bytes(&bytes, Some(raster_out().as_str()))?;
                }
                RenderFormat::Jpeg => {
                    let bytes = session.render_jpeg(now, &svg_options, &raster)?;
                    write_bytes(&bytes, Some(raster_out().as_str()))?;
                }
                RenderFormat::Pdf => {
                    let bytes = session.render_pdf(now, &svg_options)?;
                    write_bytes(&bytes, Some(raster_out().as_str()))?;
                }
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MAPA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
