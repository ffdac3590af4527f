//! Non-interactive subcommands.

use std::{path::Path, time::Duration};

use engine::{
    Action, ImportReport, Library,
    password::{self, PasswordOptions},
    transfer,
};

use crate::{
    client::Client,
    config::{AppConfig, Command},
    error::Result,
    persist::{StoreAdapter, WriteOutcome},
};

pub fn export_to(library: &Library, path: &Path) -> Result<()> {
    std::fs::write(path, transfer::export(library)?)?;
    Ok(())
}

pub fn import_from(path: &Path) -> Result<ImportReport> {
    let raw = std::fs::read_to_string(path)?;
    Ok(transfer::import(&raw)?)
}

pub fn password_options(command: &Command) -> Option<PasswordOptions> {
    let Command::Password {
        length,
        no_uppercase,
        no_lowercase,
        no_digits,
        no_symbols,
        allow_similar,
    } = command
    else {
        return None;
    };
    Some(PasswordOptions {
        length: *length,
        uppercase: !no_uppercase,
        lowercase: !no_lowercase,
        digits: !no_digits,
        symbols: !no_symbols,
        avoid_similar: !allow_similar,
    })
}

pub async fn run(config: AppConfig, command: Command) -> Result<()> {
    if let Some(options) = password_options(&command) {
        let password = password::generate(&options)?;
        println!("{password}");
        println!("strength: {}", password::strength(&password));
        return Ok(());
    }

    let client = Client::new(&config.base_url)?;
    let (mut adapter, _outcomes) = StoreAdapter::new(
        client,
        &config.cache_path,
        Duration::from_millis(config.debounce_ms),
    );
    let loaded = adapter.load().await;
    tracing::info!("library loaded from {:?}", loaded.source);

    match command {
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| transfer::EXPORT_FILE_NAME.to_string());
            export_to(&loaded.library, Path::new(&path))?;
            println!(
                "exported {} categories and {} links to {path}",
                loaded.library.categories.len(),
                loaded.library.links.len()
            );
        }
        Command::Import { path } => {
            let report = import_from(Path::new(&path))?;
            let (categories, links, skipped) = (
                report.library.categories.len(),
                report.library.links.len(),
                report.skipped(),
            );

            let mut store = loaded.into_store();
            store.dispatch(Action::ReplaceLibrary(report.library))?;
            adapter.save_local(&store)?;
            println!("imported {categories} categories and {links} links ({skipped} skipped)");

            if let WriteOutcome::Failed(reason) = adapter.flush(store.library()).await {
                println!("saved locally only, the server rejected the update: {reason}");
            }
        }
        Command::Password { .. } => {}
    }
    Ok(())
}
