use service::routes;
use service::state::{ServiceCollection, Settings};
use std::env;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().json().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Could not init tracing.");

    let settings = Settings {
        port: get_port(),
        cors_origins: get_cors_origins(),
        admin_password: get_admin_password(),
        max_upload_bytes: get_max_upload_bytes(),
        request_timeout: get_request_timeout(),
        temp_dir: get_temp_dir(),
        pdfium_path: get_pdfium_path(),
    };
    if settings.admin_password.is_none() {
        info!("ADMIN_PASSWORD is not set, admin endpoints will reject every request");
    }

    let services = ServiceCollection::build(&settings).expect("Could not build services.");
    let app = routes::create_router(services, &settings);

    let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0)), settings.port);
    info!("listening on {}", &addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .expect("Server stopped unexpectedly.");
}

fn get_port() -> u16 {
    match env::var("PORT").map(|port| port.parse::<u16>()) {
        Ok(Ok(port)) => port,
        _ => 8000,
    }
}

fn get_cors_origins() -> Vec<String> {
    env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "*".to_string())
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn get_admin_password() -> Option<String> {
    env::var("ADMIN_PASSWORD").ok().filter(|password| !password.is_empty())
}

fn get_max_upload_bytes() -> usize {
    let max_upload = env::var("MAX_UPLOAD_MB").map(|megabytes| megabytes.parse::<usize>());
    let max_upload = match max_upload {
        Ok(Ok(megabytes)) if megabytes > 0 => megabytes,
        _ => 100,
    };
    max_upload * 1024 * 1024
}

fn get_request_timeout() -> Duration {
    let timeout = env::var("REQUEST_TIMEOUT_SECONDS").map(|seconds| seconds.parse::<u64>());
    let timeout = match timeout {
        Ok(Ok(timeout)) if timeout > 0 => timeout,
        _ => 59,
    };
    Duration::from_secs(timeout)
}

fn get_temp_dir() -> PathBuf {
    env::var("TEMP_DIR").map(PathBuf::from).unwrap_or_else(|_| env::temp_dir())
}

fn get_pdfium_path() -> String {
    env::var("PDFIUM_PATH").unwrap_or_else(|_| "./".to_string())
}
