//! Command-line interface for statprobe
//! This binary parses USLM titles into statute trees and generates synthetic statutes.
//!
//! Usage:
//!   statprobe parse `<path>` [--section `<identifier>`] [--format `<format>`]  - Parse the sections of a title
//!   statprobe sections `<path>`                                            - List sections and their outcome
//!   statprobe stats `<path>`                                               - Tree statistics per section
//!   statprobe generate [--depth D] [--width W] [--seed S] [--style `<style>`]  - Render a synthetic statute
//!
//! Every command accepts `--config <file>` layered over the built-in defaults; without it
//! a `statprobe.toml` in the working directory is used when present. Generate flags win
//! over both.

mod transforms;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rand::rngs::StdRng;
use rand::SeedableRng;
use statprobe_config::{Loader, StatprobeConfig};
use statprobe_parser::statute::loader::{SectionReport, UslmLoader};
use statprobe_parser::statute::synthetic::{generate, NoncePool, RenderStyle};
use statprobe_parser::statute::uslm::SectionOutcome;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOCAL_CONFIG: &str = "statprobe.toml";

fn build_cli() -> Command {
    let path_arg = || {
        Arg::new("path")
            .help("Path to a USLM XML file")
            .required(true)
            .index(1)
    };

    Command::new("statprobe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing and generating statutes")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse the sections of a USLM title")
                .arg(path_arg())
                .arg(
                    Arg::new("section")
                        .long("section")
                        .short('s')
                        .help("Only parse the section with this identifier"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (text, lines, leaves, treeviz, json)")
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("sections")
                .about("List the sections of a USLM title and how each one parses")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("stats")
                .about("Print tree statistics for every parsed section")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate and render a synthetic statute")
                .arg(
                    Arg::new("depth")
                        .long("depth")
                        .short('d')
                        .value_parser(value_parser!(usize))
                        .help("Levels below the root"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .short('w')
                        .value_parser(value_parser!(usize))
                        .help("Children per non-leaf node"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for shuffling the term pool"),
                )
                .arg(
                    Arg::new("nonces")
                        .long("nonces")
                        .help("File of whitespace-separated nonce words")
                        .conflicts_with("systematic"),
                )
                .arg(
                    Arg::new("systematic")
                        .long("systematic")
                        .help("Use A00..Z99 identifiers instead of nonce words")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("style")
                        .long("style")
                        .help("Output style (statute, compact, sentences, citations, treeviz, json)"),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    });
    init_logging(&config.logging.filter);

    let result = match matches.subcommand() {
        Some(("parse", sub)) => handle_parse_command(sub, &config),
        Some(("sections", sub)) => handle_sections_command(sub, &config),
        Some(("stats", sub)) => handle_stats_command(sub, &config),
        Some(("generate", sub)) => handle_generate_command(sub, &config),
        _ => unreachable!("clap requires a subcommand"),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Defaults, then `--config` (or `./statprobe.toml` when present), then flags.
fn load_config(matches: &ArgMatches) -> Result<StatprobeConfig> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(("generate", sub)) = matches.subcommand() {
        loader = generate_overrides(loader, sub)?;
    }
    loader.build().context("failed to load configuration")
}

fn generate_overrides(mut loader: Loader, sub: &ArgMatches) -> Result<Loader> {
    if let Some(depth) = sub.get_one::<usize>("depth") {
        loader = loader.set_override("generator.depth", i64::try_from(*depth)?)?;
    }
    if let Some(width) = sub.get_one::<usize>("width") {
        loader = loader.set_override("generator.width", i64::try_from(*width)?)?;
    }
    if let Some(seed) = sub.get_one::<u64>("seed") {
        loader = loader.set_override("generator.seed", *seed)?;
    }
    if let Some(path) = sub.get_one::<String>("nonces") {
        loader = loader.set_override("generator.nonce_file", path.as_str())?;
    }
    // Views such as `citations` are not render styles and stay on the command line.
    if let Some(style) = sub.get_one::<String>("style").and_then(|s| s.parse::<RenderStyle>().ok()) {
        loader = loader.set_override("render.style", style.to_string())?;
    }
    Ok(loader)
}

/// Logs go to stderr; `RUST_LOG` wins over the configured filter.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_title(sub: &ArgMatches, config: &StatprobeConfig) -> Result<UslmLoader> {
    let path = sub
        .get_one::<String>("path")
        .context("path is required")?;
    let loader = UslmLoader::from_path(path).with_context(|| format!("failed to load {path}"))?;
    Ok(loader.with_options(config.uslm.clone()))
}

/// Handle the parse command
fn handle_parse_command(sub: &ArgMatches, config: &StatprobeConfig) -> Result<()> {
    let loader = open_title(sub, config)?;
    let format = sub
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");

    if let Some(identifier) = sub.get_one::<String>("section") {
        match loader.section(identifier)? {
            SectionOutcome::Parsed(section) => {
                print!("{}", transforms::format_section(&section, format).map_err(anyhow::Error::msg)?)
            }
            SectionOutcome::Discarded { identifier, reason } => {
                eprintln!("{identifier}: discarded: {reason}");
            }
        }
        return Ok(());
    }

    for report in loader.parse_all() {
        match report {
            SectionReport::Parsed(section) => {
                print!("{}", transforms::format_section(&section, format).map_err(anyhow::Error::msg)?)
            }
            other => eprintln!("{}: {}", other.identifier(), other.status()),
        }
    }
    Ok(())
}

/// Handle the sections command
fn handle_sections_command(sub: &ArgMatches, config: &StatprobeConfig) -> Result<()> {
    let loader = open_title(sub, config)?;
    for report in loader.parse_all() {
        println!("{}\t{}", report.identifier(), report.status());
    }
    Ok(())
}

/// Handle the stats command
fn handle_stats_command(sub: &ArgMatches, config: &StatprobeConfig) -> Result<()> {
    let loader = open_title(sub, config)?;
    for report in loader.parse_all() {
        if let SectionReport::Parsed(section) = report {
            println!("{}\t{}", section.identifier, section.tree.stats());
        }
    }
    Ok(())
}

/// Handle the generate command
fn handle_generate_command(sub: &ArgMatches, config: &StatprobeConfig) -> Result<()> {
    let generator = &config.generator;
    let (depth, width, seed) = (generator.depth, generator.width, generator.seed);
    let style = match sub.get_one::<String>("style") {
        Some(view) if view.parse::<RenderStyle>().is_err() => view.clone(),
        _ => config.render.style.to_string(),
    };
    if !transforms::GENERATE_STYLES.contains(&style.as_str()) {
        bail!(
            "Style '{}' not supported (available: {})",
            style,
            transforms::GENERATE_STYLES.join(", ")
        );
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let nonce_file = if sub.get_flag("systematic") {
        None
    } else {
        generator.nonce_file.as_deref()
    };
    let mut pool = match nonce_file {
        Some(path) => {
            let mut pool = NoncePool::from_path(path)?;
            pool.shuffle(&mut rng);
            pool
        }
        None => NoncePool::systematic(&mut rng),
    };
    debug!(depth, width, seed, terms = pool.len(), "generating");

    let mut tree = generate(&mut pool, depth, width)?;
    let renderer = config.render.renderer();
    let out = transforms::render_generated(&mut tree, &renderer, &style).map_err(anyhow::Error::msg)?;
    print!("{}", out);
    Ok(())
}
