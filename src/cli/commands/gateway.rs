use anyhow::Result;
use log::info;

use crate::config;

pub fn gateway_command(gateway: &str) -> Result<()> {
    let url = config::gateway_url(gateway, "");
    info!("Resolved gateway URL: {}", url);
    println!("{}", url);
    Ok(())
}
