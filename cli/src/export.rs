use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use keepsake::{collection, Achievement, Config, Database, GalleryImage, Todo, TributeImage};

pub fn cmd() -> Command {
    Command::new("export")
        .about("Export a collection from the database as json")
        .display_order(30)
        .arg(
            Arg::new("collection")
                .display_order(11)
                .help("Collection name")
                .value_parser(["gallery", "achievements", "todos", "tribute"])
                .required(true),
        )
}

pub fn run(matches: &ArgMatches, config: &Config) -> Result<()> {
    let db = Database::new(&config.db)?;

    let json = match matches
        .get_one::<String>("collection")
        .map(String::as_str)
    {
        Some("gallery") => serde_json::to_string_pretty(&collection::list::<GalleryImage>(&db)?)?,
        Some("achievements") => {
            serde_json::to_string_pretty(&collection::list::<Achievement>(&db)?)?
        }
        Some("todos") => serde_json::to_string_pretty(&collection::list::<Todo>(&db)?)?,
        Some("tribute") => serde_json::to_string_pretty(&collection::list::<TributeImage>(&db)?)?,
        _ => unreachable!("collection is required"),
    };
    println!("{json}");

    Ok(())
}
