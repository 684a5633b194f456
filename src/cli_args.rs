use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;

#[derive(Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to a YAML configuration file. When given, the remaining options are ignored.
    #[clap(long, env = "CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Address to listen on.
    #[clap(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[clap(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// MongoDB connection string.
    #[clap(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database holding the `books` and `authors` collections.
    #[clap(long, env = "MONGODB_DATABASE", default_value = "book_author_db")]
    pub database: String,

    /// Keep documents in process memory instead of MongoDB.
    #[clap(long, env = "IN_MEMORY_STORE")]
    pub in_memory: bool,
}
