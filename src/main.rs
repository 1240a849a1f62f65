//! hifi-pool — command line probe for the mirrored hifi catalog API.
//!
//! Usage:
//!   hifi-pool search <query>
//!   hifi-pool stream <track-id>
//!   hifi-pool album <album-id>

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use hifi_pool::{ClientConfig, HifiClient, Outcome};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: hifi-pool <search|stream|album> <query|id>");
        std::process::exit(1);
    }

    let config = ClientConfig::load()?;
    let client = HifiClient::new(config)?;

    match args[1].as_str() {
        "search" => {
            let query = args[2..].join(" ");
            match client.search(&query).await {
                Outcome::Success(tracks) => {
                    println!("Found {} tracks", tracks.len());
                    for track in &tracks {
                        println!(
                            "{:>10}  {} — {} ({})",
                            track.id,
                            track.title,
                            track.artist_name(),
                            track.album_title()
                        );
                    }
                }
                Outcome::Empty => println!("No results"),
                Outcome::Failed(err) => return Err(anyhow!("search failed: {}", err)),
                Outcome::Superseded => {}
            }
        }
        "stream" => {
            let track_id: u64 = args[2].parse().map_err(|_| anyhow!("invalid track id"))?;
            match client.track_stream_url(track_id).await {
                Outcome::Success(url) => println!("{}", url),
                Outcome::Empty => println!("No stream available"),
                Outcome::Failed(err) => return Err(anyhow!("stream resolution failed: {}", err)),
                Outcome::Superseded => {}
            }
        }
        "album" => {
            let album_id: u64 = args[2].parse().map_err(|_| anyhow!("invalid album id"))?;
            match client.album(album_id).await {
                Outcome::Success(album) => {
                    println!("{}", serde_json::to_string_pretty(&album)?)
                }
                Outcome::Empty => println!("No album data"),
                Outcome::Failed(err) => return Err(anyhow!("album lookup failed: {}", err)),
                Outcome::Superseded => {}
            }
        }
        other => {
            eprintln!("Unknown command: {}", other);
            std::process::exit(1);
        }
    }

    Ok(())
}
