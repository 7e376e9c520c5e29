//! Command dispatch

use std::fs::File;
use std::io::{self, BufReader};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::session::Session;
use crate::config::{global_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_color {
        settings.color = false;
    }
    if !settings.color {
        colored::control::set_override(false);
    }
    debug!("settings: {:?}", settings);

    match &cli.command {
        None | Some(Commands::Shell) => _shell(settings),
        Some(Commands::Run { file }) => _run(file, settings),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(&settings),
            ConfigCommands::Path => _config_path(),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

#[instrument(skip(settings))]
fn _shell(settings: Settings) -> CliResult<()> {
    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), settings);
    session.run()
}

#[instrument(skip(settings))]
fn _run(file: &std::path::Path, settings: Settings) -> CliResult<()> {
    if !file.is_file() {
        return Err(CliError::InvalidArgs(format!(
            "not a file: {}",
            file.display()
        )));
    }
    let script = File::open(file).map_err(|e| CliError::io(format!("open {}", file.display()), e))?;
    let mut session = Session::new(BufReader::new(script), io::stdout(), settings);
    session.run()
}

fn _config_show(settings: &Settings) -> CliResult<()> {
    let text = settings.to_toml()?;
    output::info(&mut io::stdout(), text.trim_end())
        .map_err(|e| CliError::io("write output", e))
}

fn _config_path() -> CliResult<()> {
    let mut out = io::stdout();
    let written = match global_config_path() {
        Some(path) => output::info(&mut out, &path.display()),
        None => output::warning(&mut out, "no config directory available"),
    };
    written.map_err(|e| CliError::io("write output", e))
}
