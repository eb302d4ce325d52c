#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use timetable::{Timetable, TimetableConfig, config, http_api};

    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = TimetableConfig::from_env();
    let addr: SocketAddr = config.http_addr.parse()?;
    let timetable = Timetable::open(&config)?;

    tracing::info!(%addr, data_dir = %config.data_dir.display(), "timetable HTTP API listening");
    http_api::serve(addr, timetable).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
