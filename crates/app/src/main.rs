use std::net::{IpAddr, SocketAddr};

use server::{Documents, FileStorage, MirroredStorage, S3Object, ServerOptions};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "linkdeck={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let ip: IpAddr = settings.server.bind.parse()?;
    let options = ServerOptions {
        addr: SocketAddr::new(ip, settings.server.port),
        allowed_origins: settings.server.allowed_origins,
    };

    let local = FileStorage::new(&settings.server.data_file);
    let documents = match settings.s3.filter(|s3| s3.enabled) {
        Some(s3) => {
            tracing::info!("S3 storage enabled: {}/{}", s3.bucket, s3.key);
            let remote = S3Object::connect(&s3.into()).await;
            Documents::new(MirroredStorage::new(local, remote))
        }
        None => {
            tracing::info!("using local file storage: {}", local.path().display());
            Documents::new(local)
        }
    };

    server::run(documents, options).await;
    Ok(())
}
