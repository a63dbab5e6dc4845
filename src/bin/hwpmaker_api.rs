use hwpmaker::exam::api::{build_state, create_router_with_state, ServerConfig};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // tracing 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env();
    let addr = config.addr();

    tracing::info!(
        host = %config.host,
        port = config.port,
        max_request_size = config.max_request_size,
        "hwpmaker-api 서버 시작"
    );

    let app = create_router_with_state(build_state(), config.max_request_size);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(addr = %addr, error = %e, "서버 바인딩 실패");
            std::process::exit(1);
        });

    tracing::info!(addr = %addr, "서버 대기 중");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "서버 실행 오류");
            std::process::exit(1);
        });

    tracing::info!("서버 정상 종료");
}

/// Graceful shutdown 시그널 대기
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C 핸들러 설치 실패");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM 핸들러 설치 실패");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C 수신, 서버 종료 시작");
        }
        _ = terminate => {
            tracing::info!("SIGTERM 수신, 서버 종료 시작");
        }
    }
}
