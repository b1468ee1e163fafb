use crate::config::{Config, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::page::render_page;
use crate::parser::{ParseOutput, parse_records};
use crate::render::{render_svg, write_output_png, write_output_text};
use crate::viewer::ViewerState;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rtree", version, about = "Radial tidy-tree renderer for class/title/subtitle datasets")]
pub struct Args {
    /// Input dataset (.json array of records) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for html/svg/json if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "html")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, caps, layout and page settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Render the tree with subtitles (static formats) or start the page with them shown
    #[arg(short = 's', long = "subtitles")]
    pub subtitles: bool,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Log aggregation and layout details
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = resolve_config(&args)?;
    let parsed = load_dataset(args.input.as_deref())?;
    log::info!(
        "loaded {} records ({} skipped)",
        parsed.records.len(),
        parsed.skipped
    );

    let state = ViewerState::from_records(&parsed.records, &config);
    match args.output_format {
        OutputFormat::Html => {
            let html = render_page(&state, &config)?;
            write_output_text(&html, args.output.as_deref())?;
        }
        OutputFormat::Svg => {
            let layout = compute_layout(state.current(), &config.theme, &config.layout);
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_text(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let layout = compute_layout(state.current(), &config.theme, &config.layout);
            let svg = render_svg(&layout, &config.theme, &config.layout);
            let mut render = config.render.clone();
            render.width = layout.width;
            render.height = layout.height;
            write_output_png(&svg, &output, &render, &config.theme)?;
        }
        OutputFormat::Json => {
            let layout = compute_layout(state.current(), &config.theme, &config.layout);
            match args.output.as_deref() {
                Some(path) => write_layout_dump(path, &layout, state.show_subtitles())?,
                None => println!("{}", layout_dump_json(&layout, state.show_subtitles())?),
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    if let Some(width) = args.width {
        config.layout.width = width;
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.layout.height = height;
        config.render.height = height;
    }
    if args.subtitles {
        config.page.show_subtitles = true;
    }
    Ok(config)
}

fn load_dataset(path: Option<&Path>) -> Result<ParseOutput> {
    let input = read_input(path).map_err(|err| {
        log::error!("dataset could not be read: {err:#}");
        err
    })?;
    parse_records(&input).map_err(|err| {
        log::error!("dataset could not be parsed: {err}");
        err.into()
    })
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from([
            "rtree", "-i", "titles.json", "-e", "svg", "-s", "-w", "800", "-H", "600",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("titles.json")));
        assert_eq!(args.output_format, OutputFormat::Svg);
        assert!(args.subtitles);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.layout.width, 800.0);
        assert_eq!(config.render.height, 600.0);
        assert!(config.page.show_subtitles);
    }

    #[test]
    fn defaults_to_html() {
        let args = Args::try_parse_from(["rtree"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Html);
        assert!(!args.verbose);
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("tree.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }

    #[test]
    fn missing_dataset_is_an_error() {
        let err = load_dataset(Some(Path::new("/nonexistent/titles.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("titles.json"));
    }
}
