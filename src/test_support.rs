//! Local HTTP stubs for exercising the blocking clients in tests.

use std::net::SocketAddr;
use std::sync::mpsc;

use axum::Router;

/// Serve `app` on an ephemeral loopback port from a dedicated thread.
///
/// The blocking reqwest clients must not run inside a tokio runtime, so the
/// stub owns its own runtime and the test thread stays synchronous.
/// Returns the base URL, e.g. `http://127.0.0.1:40123`.
pub(crate) fn spawn_stub(app: Router) -> String {
    let (tx, rx) = mpsc::channel::<SocketAddr>();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("stub runtime");

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind stub listener");
            tx.send(listener.local_addr().expect("stub address"))
                .expect("report stub address");
            axum::serve(listener, app).await.expect("stub server");
        });
    });

    let addr = rx.recv().expect("stub server did not start");
    format!("http://{addr}")
}

/// A loopback URL nothing is listening on.
pub(crate) fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let addr = listener.local_addr().expect("free port address");
    drop(listener);
    format!("http://{addr}")
}
