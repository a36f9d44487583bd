mod error;
mod routes;

use std::{
    error::Error,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum_server::tls_rustls::RustlsConfig;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use ventas::{
    domain::query::CustomerQueryService, infrastructure::JsonFileCustomerRepository, VentasConfig,
};

#[tokio::main]
async fn main() {
    match VentasConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = serve(&config).await {
                error!("アプリケーションエラー: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("設定読み込みエラー: {}", error)
        }
    }
}

async fn serve(config: &VentasConfig) -> Result<(), Box<dyn Error>> {
    let repository = JsonFileCustomerRepository::new(&config.data.path);
    info!("データソース: {}", repository.path().display());
    let app = routes::routes(Arc::new(CustomerQueryService::new(repository)))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.server.host.parse::<IpAddr>()?, config.server.port);
    match &config.server.tls {
        Some(tls) => {
            let rustls = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            info!("サーバー起動: https://{}", addr);
            axum_server::bind_rustls(addr, rustls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("サーバー起動: http://{}", addr);
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }
    Ok(())
}
