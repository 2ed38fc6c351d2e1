use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use keepsake::{settings, Config, Database};

pub fn cmd() -> Command {
    Command::new("theme")
        .about("Print the stored theme, or set it if a value is provided")
        .display_order(20)
        .arg(Arg::new("value").help("New theme value"))
}

pub fn run(matches: &ArgMatches, config: &Config) -> Result<()> {
    let db = Database::new(&config.db)?;

    let theme = match matches.get_one::<String>("value") {
        Some(value) => settings::set_theme(&db, value.as_str())?,
        None => settings::get_theme(&db)?,
    };
    println!("{theme}");

    Ok(())
}
