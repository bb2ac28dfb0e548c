use super::render;
use super::setup::{Cli, Commands};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::io::{self, Read};
use std::path::PathBuf;
use tankapp::api::TankApi;
use tankapp::commands::ListFilter;
use tankapp::config::TankConfig;
use tankapp::error::TankError;
use tankapp::model::RawFish;
use tankapp::oplog::FileLogSink;
use tankapp::store::fs::FileStore;

/// Options resolved from flags layered over the loaded config.
struct Settings {
    root: PathBuf,
    log_file: Option<PathBuf>,
    hide_deleted: bool,
}

/// Parse arguments, run one operation and print its envelope.
///
/// Returns `Ok(false)` when the operation failed and its error envelope was
/// printed; `Err` is reserved for problems before an operation could run.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = resolve_settings(&cli)?;
    let input = match &cli.command {
        Commands::Create { json } | Commands::Update { json } | Commands::Noop { json } => {
            read_input(json.as_deref())?
        }
        _ => String::new(),
    };

    Ok(emit(dispatch(&cli.command, &settings, &input)))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let config = TankConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let root = cli
        .root
        .clone()
        .or_else(|| config.storage_root())
        .context("cannot determine a storage root; pass --root or set TANK_ROOT")?;
    log::debug!("storage root {}", root.display());

    Ok(Settings {
        root,
        log_file: cli.log_file.clone().or(config.log_file),
        hide_deleted: config.hide_deleted,
    })
}

fn dispatch(
    command: &Commands,
    settings: &Settings,
    input: &str,
) -> std::result::Result<Value, TankError> {
    let with_sink = |api: TankApi<FileStore>| match &settings.log_file {
        Some(path) => api.with_log_sink(FileLogSink::new(path)),
        None => api,
    };
    let open_api = || -> std::result::Result<TankApi<FileStore>, TankError> {
        Ok(with_sink(TankApi::new(FileStore::open(&settings.root)?)))
    };

    match command {
        Commands::Create { .. } => {
            let raw = RawFish::from_json(input)?;
            open_api()?.create_fish(raw).map(|r| render::created(&r))
        }
        Commands::List { hide_deleted } => {
            let filter = if *hide_deleted || settings.hide_deleted {
                ListFilter::hide_deleted()
            } else {
                ListFilter::default()
            };
            open_api()?
                .with_list_filter(filter)
                .list_fish()
                .map(|r| render::listed(&r))
        }
        Commands::Get { name } => open_api()?.get_fish(name).map(|r| render::single(&r)),
        Commands::Update { .. } => {
            let raw = RawFish::from_json(input)?;
            open_api()?.update_fish(raw).map(|r| render::updated(&r))
        }
        Commands::Delete { name } => open_api()?.delete_fish(name).map(|r| render::deleted(&r)),
        Commands::Sweep => open_api()?.sweep().map(|r| render::swept(&r)),
        Commands::Noop { .. } => {
            let raw = RawFish::from_json(input)?;
            // The root is not created for a call that never touches it.
            with_sink(TankApi::new(FileStore::new(&settings.root)))
                .noop()
                .map(|_| render::noop(&raw))
        }
    }
}

/// The JSON argument, or stdin when it was omitted. Blank input is `{}`.
fn read_input(arg: Option<&str>) -> Result<String> {
    let text = match arg {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read JSON from stdin")?;
            buf
        }
    };
    if text.trim().is_empty() {
        Ok("{}".to_string())
    } else {
        Ok(text)
    }
}

fn emit(outcome: std::result::Result<Value, TankError>) -> bool {
    match outcome {
        Ok(body) => {
            print_json(&body);
            true
        }
        Err(e) => {
            print_json(&render::error(&e));
            eprintln!("{}", render::status_code(e.kind()));
            false
        }
    }
}

fn print_json(body: &Value) {
    match serde_json::to_string_pretty(body) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: cannot encode response: {}", e),
    }
}
