use std::net::SocketAddr;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};

use keepsake::Config;

pub fn cmd() -> Command {
    Command::new("serve")
        .about("Run the api server")
        .display_order(10)
        .arg(
            Arg::new("address")
                .long("address")
                .short('a')
                .value_name("ADDR")
                .value_parser(clap::value_parser!(SocketAddr))
                .help("Address to listen on, overrides the configured one"),
        )
}

pub async fn run(matches: &ArgMatches, mut config: Config) -> Result<()> {
    if let Some(address) = matches.get_one::<SocketAddr>("address") {
        config.address = *address;
    }
    keepsake::axum::start(config).await?;
    Ok(())
}
