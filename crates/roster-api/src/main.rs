//! 사용자 관리 API 서버 진입점.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use roster_api::{
    create_api_router, metrics_layer, openapi::swagger_ui_router, setup_metrics_recorder,
    AppState, InMemoryUserDirectory, PgUserRepository, UserDirectory,
};
use roster_core::{init_logging, AppConfig, CorsConfig, DatabaseConfig};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// 설정된 origin으로 CORS 레이어 생성.
///
/// origin 목록이 비어 있으면 모든 origin을 허용하되 자격 증명은 허용하지 않습니다.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        warn!("No valid CORS origins configured, allowing any origin without credentials");
        layer.allow_origin(AllowOrigin::any())
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 사용자 디렉터리 준비.
///
/// 데이터베이스 URL이 있으면 PostgreSQL에 연결하고 마이그레이션을 적용합니다.
/// 없으면 메모리 디렉터리를 사용합니다.
async fn open_directory(
    config: &DatabaseConfig,
) -> anyhow::Result<(Arc<dyn UserDirectory>, Option<sqlx::PgPool>)> {
    let Some(url) = config.url.as_deref() else {
        warn!("database.url not set, using in-memory user directory (data is lost on restart)");
        return Ok((Arc::new(InMemoryUserDirectory::new()), None));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url)
        .await
        .context("failed to connect to database")?;

    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .context("failed to verify database connection")?;
    info!("Connected to PostgreSQL successfully");

    let repository = PgUserRepository::new(pool.clone());
    repository.migrate().await?;
    info!("Database migrations applied");

    Ok((Arc::new(repository), Some(pool)))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle, cors: &CorsConfig) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(cors))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 및 검증 (JWT 비밀 키 누락 시 시작 실패)
    let config = AppConfig::load_default().context("failed to load configuration")?;
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    info!("Starting Roster API server...");

    let metrics_handle = setup_metrics_recorder().context("failed to install metrics recorder")?;
    info!("Prometheus metrics recorder initialized");

    let (directory, db_pool) = open_directory(&config.database).await?;

    let mut state = AppState::new(&config.jwt, directory).context("invalid JWT settings")?;
    if let Some(pool) = db_pool {
        state = state.with_db_pool(pool);
    }
    info!(
        backend = state.directory_backend(),
        issuer = %config.jwt.issuer,
        expiry_minutes = config.jwt.expiry_minutes,
        "Application state initialized"
    );

    let app = create_router(Arc::new(state), metrics_handle, &config.cors);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
