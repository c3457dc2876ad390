use std::io::{self, Write};

use crate::config::Config;
use crate::error::{PlaneError, Result};

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Plane CLI Configuration");
    println!("=======================\n");

    let base_url = prompt("Plane URL [https://app.plane.so]: ")?;

    let cookie = prompt("Session cookie (copy the Cookie header from a signed-in browser): ")?;
    if cookie.is_empty() {
        return Err(PlaneError::MissingSession);
    }

    let config = Config {
        base_url: (!base_url.is_empty()).then_some(base_url),
        cookie: Some(cookie),
        revalidate_secs: None,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PlaneError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, toml::to_string(&config)?).map_err(|e| {
        PlaneError::ConfigRead {
            path: config_path.clone(),
            source: e,
        }
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now use 'plane' commands!");

    Ok(())
}
