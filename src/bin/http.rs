#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use liturgical_calendar::{DatasetFile, DatasetFormat, http_api, load_cached, logging};

    logging::init(1);

    let addr: SocketAddr = std::env::var("LITURGICAL_CALENDAR_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    let dataset = std::env::var("LITURGICAL_CALENDAR_DATASET")
        .unwrap_or_else(|_| "LiturgicalCalendar.csv".to_string());
    let format = DatasetFormat::from_path(&dataset)?;

    let table = load_cached(&DatasetFile::new(dataset, format))?;
    tracing::info!(%addr, events = table.len(), "starting http api");
    println!("liturgical-calendar HTTP API listening on http://{addr}");
    http_api::serve(addr, table).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
