use std::net::TcpListener;

use atlas::{configuration::get_configuration, services::map_scraper_handler, startup::run};
use clap::Parser;
use env_logger::Env;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Scrape business listings from a Google Maps search")]
struct Cli {
    /// Search query typed into the maps search box
    #[arg(short, long, default_value = "dental clinics in lahore")]
    search: String,

    /// Stop once this many listings are loaded
    #[arg(short, long, default_value_t = 50_000)]
    total: usize,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    // Spawn backgound tasks
    tokio::spawn(async move { map_scraper_handler(configuration, cli.search, cli.total).await });

    run(listener)?.await
}
