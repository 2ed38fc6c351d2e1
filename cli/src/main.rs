mod export;
mod serve;
mod theme;

use clap::{Arg, ArgMatches, Command};
use keepsake::{config, Config};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cmd().get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("serve", m)) => serve::run(m, config).await?,
        Some(("theme", m)) => theme::run(m, &config)?,
        Some(("export", m)) => export::run(m, &config)?,
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

pub fn cmd() -> Command {
    Command::new("keepsake")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .infer_subcommands(true)
        .version(VERSION)
        .about("Password-gated personal archive")
        .subcommand(serve::cmd())
        .subcommand(theme::cmd())
        .subcommand(export::cmd())
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .global(true)
                .help("Config file to load instead of keepsake.toml"),
        )
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .short('v')
                .display_order(100)
                .value_name("level")
                .value_parser(["trace", "debug", "info", "warn", "error", "none"])
                .global(true)
                .help("Set the verbosity of the log output"),
        )
}

/// Loads the config file, either the default one or the one provided with
/// `--config`, applying the verbosity override if present.
fn load_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let mut config: Config = match matches.get_one::<String>("config") {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };
    if let Some(level) = matches.get_one::<String>("verbosity") {
        config.tracing.level = level.parse()?;
    }
    Ok(config)
}
