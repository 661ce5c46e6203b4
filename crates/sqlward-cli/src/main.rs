use std::{env, fs, path::PathBuf};

use build::build_request;
use clap::Parser;
use cli::{Args, Commands};
use error::{CliError, Result};
use exec::exec_request;
use logging::setup_logging;
use sqlward_config::config::{generate_default_config, Config, CONFIG_PATH};
use tracing::{info, warn};
use utils::{read_request, COLOR};

mod build;
mod cli;
mod error;
mod events;
mod exec;
mod logging;
mod request;
mod utils;

fn handle_cli() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color || args.json {
        let mut color = COLOR.write().unwrap();
        *color = false;
    }

    if let Some(ref c) = args.config {
        let mut config_path = CONFIG_PATH.write().unwrap();
        let path = PathBuf::from(c);
        *config_path = if path.is_absolute() {
            path
        } else {
            env::current_dir()
                .map_err(|err| CliError::Io {
                    action: "retrieving current directory".to_string(),
                    source: err,
                })?
                .join(path)
        };
    }

    match args.command {
        Commands::DefConfig => {
            generate_default_config()?;
        }
        Commands::Config => {
            let config_path = CONFIG_PATH.read().unwrap().to_path_buf();
            let content = match fs::read_to_string(&config_path) {
                Ok(content) => content,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    warn!("Config file {} not found", config_path.display());
                    Config::default_config()
                        .to_annotated_document()?
                        .to_string()
                }
                Err(err) => {
                    return Err(CliError::Io {
                        action: "reading config".to_string(),
                        source: err,
                    });
                }
            };
            info!("{}", content);
        }
        Commands::Build {
            kind,
            table,
            request,
        } => {
            let options = Config::new()?.options_for(&table)?;
            build_request(kind, &options, &read_request(request)?)?;
        }
        Commands::Exec {
            kind,
            table,
            db,
            request,
        } => {
            let options = Config::new()?.options_for(&table)?;
            exec_request(kind, options, &db, &read_request(request)?)?;
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
