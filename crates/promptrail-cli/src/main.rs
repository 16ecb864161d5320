use promptrail::render::{SurfaceBox, SvgRenderOptions, sanitize_surface_id};
use promptrail::{HistoryConfig, HistoryDocument};
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    History(promptrail::Error),
    Render(promptrail::render::HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::History(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<promptrail::Error> for CliError {
    fn from(value: promptrail::Error) -> Self {
        Self::History(value)
    }
}

impl From<promptrail::render::HeadlessError> for CliError {
    fn from(value: promptrail::render::HeadlessError) -> Self {
        Self::Render(value)
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
    Render,
    Layout,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    viewport_width: f64,
    viewport_height: f64,
    viewport_top: f64,
    surface_id: Option<String>,
    config_json: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "promptrail-cli\n\
\n\
USAGE:\n\
  promptrail-cli [render] [--viewport-width <w>] [--viewport-height <h>] [--viewport-top <t>] [--id <surface-id>] [--config <json>] [--out <path>] [<path>|-]\n\
  promptrail-cli layout [--pretty] [--viewport-width <w>] [--viewport-height <h>] [--viewport-top <t>] [--config <json>] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a history JSON document: {\"entries\": [{\"id\", \"parentId\"?}, ...]}\n\
    or {\"executions\": [...]}, optionally with \"activeId\".\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - render prints connector SVG to stdout by default; use --out to write a file.\n\
  - layout prints the computed cards/connectors as JSON.\n\
  - --config takes inline JSON overrides, e.g. '{\"history\":{\"startX\":24}}'.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Render,
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "--pretty" => args.pretty = true,
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--viewport-top" => {
                let Some(t) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_top = t.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.surface_id = Some(id.clone());
            }
            "--config" => {
                let Some(json) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config_json = Some(json.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
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

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn build_config(config_json: Option<&str>) -> Result<HistoryConfig, CliError> {
    let mut config = HistoryConfig::default();
    if let Some(json) = config_json {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        config.deep_merge(&overrides);
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let session = HistoryDocument::from_json_str(&text)?.into_session();
    let config = build_config(args.config_json.as_deref())?;
    let viewport = SurfaceBox::new(args.viewport_width, args.viewport_height, args.viewport_top);

    match args.command {
        Command::Render => {
            let options = SvgRenderOptions {
                surface_id: args.surface_id.as_deref().map(sanitize_surface_id),
            };
            let svg = promptrail::render::render_history_svg(&session, viewport, &config, &options)?;
            write_text(&svg, args.out.as_deref())?;
        }
        Command::Layout => {
            let layout = promptrail::render::layout_history_sync(&session, viewport, &config)?;
            let json = if args.pretty {
                serde_json::to_string_pretty(&layout)?
            } else {
                serde_json::to_string(&layout)?
            };
            write_text(&json, args.out.as_deref())?;
        }
    }
    Ok(())
}

fn main() {
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

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
