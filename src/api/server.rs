//! Chat server lifecycle: bind, serve the router, stop on a shutdown signal.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::api::router::chat_api_router;
use crate::api::types::ApiContext;

/// Bind the listener. Separate from `serve` so tests can bind `127.0.0.1:0`
/// and learn the chosen port.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, String> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind chat server on {addr}: {e}"))?;
    Ok(listener)
}

/// Serve the chat API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, ctx: ApiContext, shutdown: F) -> Result<(), String>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = chat_api_router(ctx);
    tracing::info!(%addr, "Chat server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| format!("Chat server error: {e}"))?;

    tracing::info!("Chat server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Chat server received shutdown signal");
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::oneshot;

    use super::*;
    use crate::models::PredictionResult;
    use crate::pipeline::conversation::MockBackend;
    use crate::pipeline::prediction::MockPredictor;

    fn test_ctx() -> ApiContext {
        ApiContext::new(
            Arc::new(MockBackend::replying("hi")),
            Arc::new(MockPredictor::returning(PredictionResult::not_at_risk())),
            "gemini-pro",
        )
    }

    #[tokio::test]
    async fn server_accepts_connections_and_shuts_down() {
        let listener = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve(listener, test_ctx(), async move {
            let _ = shutdown_rx.await;
        }));

        // Server should accept TCP connections
        let stream = tokio::net::TcpStream::connect(addr).await;
        assert!(stream.is_ok());
        drop(stream);

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn bind_reports_address_in_use() {
        let first = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let taken = first.local_addr().unwrap();

        let err = bind(taken).await.unwrap_err();
        assert!(err.contains(&taken.to_string()));
    }
}
