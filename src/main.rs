use claim_audit_rust::{api, AppConfig, AuditService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local-time log format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // Config files first, plain environment variables as fallback
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Config files unusable ({}), falling back to environment", e);
            AppConfig::from_env()
        }
    };
    info!("Starting server with config: {:?}", config);

    let service = Arc::new(AuditService::from_config(&config));

    let app = api::router(service).layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/audit         - JSON audit summary");
    info!("  POST /api/audit/report  - paginated PDF report");
    info!("  POST /api/audit/export  - flat CSV export");
    info!("  POST /api/audit/batch   - several claims in parallel");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
