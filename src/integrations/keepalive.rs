//! 保活 HTTP 端点
//!
//! 任意路径、任意方法都返回固定文本，供托管平台做存活探测。

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const KEEPALIVE_BODY: &str = "Bot activo";

pub fn create_router() -> Router {
    Router::new().fallback(|| async { KEEPALIVE_BODY })
}

/// 绑定 0.0.0.0:port 并服务，直到 token 被取消
pub async fn serve(port: u16, shutdown: CancellationToken) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind keep-alive endpoint on {addr}"))?;
    tracing::info!("Keep-alive endpoint listening on http://{}", addr);
    serve_on(listener, shutdown).await
}

/// 在后台运行保活端点；启动或运行失败时立即记录错误，不等到进程关闭
pub fn spawn(port: u16, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(port, shutdown).await {
            tracing::error!("Keep-alive endpoint stopped: {e:#}");
        }
    })
}

pub async fn serve_on(listener: TcpListener, shutdown: CancellationToken) -> anyhow::Result<()> {
    axum::serve(listener, create_router())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_path_returns_static_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let token = CancellationToken::new();
        let server = tokio::spawn(serve_on(listener, token.clone()));

        let client = reqwest::Client::new();
        for path in ["/", "/health", "/anything/else"] {
            let body = client
                .get(format!("http://{addr}{path}"))
                .send()
                .await
                .unwrap()
                .text()
                .await
                .unwrap();
            assert_eq!(body, KEEPALIVE_BODY);
        }
        let posted = client
            .post(format!("http://{addr}/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(posted, KEEPALIVE_BODY);

        token.cancel();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_ends_task() {
        let occupied = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let err = serve(port, CancellationToken::new()).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to bind keep-alive endpoint"));

        let handle = spawn(port, CancellationToken::new());
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("keep-alive task should end on bind failure")
            .unwrap();
    }
}
