//! CLI Status Command
//!
//! Reports whether a local gateway is up, and what it is serving.

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/api/health");
    match reqwest::get(&url).await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("ocrelay is not running on port {port}");
        }
    }
    Ok(())
}
