use anyhow::Result;
use clap::Parser;
use skycast_core::{FavoritesStore, KeyStore, OpenWeatherGateway, WeatherGateway};
use std::path::PathBuf;

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Interactive OpenWeather CLI")]
pub struct Cli {
    /// Directory holding the API key and favorites files.
    /// Defaults to the platform data directory.
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let (keys, favorites) = match &self.data_dir {
            Some(dir) => (KeyStore::in_dir(dir), FavoritesStore::in_dir(dir)),
            None => (KeyStore::open_default()?, FavoritesStore::open_default()?),
        };

        println!("Hello! Welcome to the skycast weather tool.");

        let gateway = obtain_gateway(&keys).await?;
        crate::menu::run(&gateway, &favorites).await
    }
}

/// Resolve a working API key: baked-in or stored key first, otherwise prompt
/// and probe until one validates. Ctrl-C leaves the loop through the error
/// path.
async fn obtain_gateway(keys: &KeyStore) -> Result<OpenWeatherGateway> {
    if let Some(key) = keys.load()? {
        return OpenWeatherGateway::new(key);
    }

    println!("No stored API key found!");
    loop {
        let entered = view::ask("Please enter your OpenWeather API key:")?;
        let key = entered.trim();
        if key.is_empty() {
            continue;
        }

        let gateway = OpenWeatherGateway::new(key.to_string())?;
        if gateway.validate_key().await {
            keys.save(key)?;
            println!("API key is valid! Saved to {}.", keys.path().display());
            return Ok(gateway);
        }

        println!("That key did not work. Please try again, or press Ctrl-C to quit.");
    }
}
