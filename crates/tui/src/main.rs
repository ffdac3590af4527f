mod app;
mod cache;
mod client;
mod commands;
mod config;
mod error;
mod persist;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;
    match command {
        Some(command) => commands::run(config, command).await,
        None => {
            let mut app = app::App::new(config).await?;
            app.run().await
        }
    }
}
