use pagecraft_catalog::Catalog;
use pagecraft_workspace::{api, telemetry, MemoryBackend};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing("info");

    let args: Vec<String> = std::env::args().collect();
    let mut port: u16 = 3030;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("--port requires a value");
                    std::process::exit(1);
                };
                port = value.parse()?;
                i += 2;
            }
            "--help" | "-h" => {
                println!("Usage: pagecraft-server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --port <PORT>   HTTP port to listen on (default: 3030)");
                println!("  -h, --help          Show this help message");
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                std::process::exit(1);
            }
        }
    }

    let catalog = Arc::new(Catalog::builtin()?);
    let backend = Arc::new(MemoryBackend::new(catalog));
    let app = api::router(backend).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("pagecraft-server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
