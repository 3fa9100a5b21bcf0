use crate::adapters::http::pages::Pages;
use crate::adapters::http::{build_router, AppState};
use crate::adapters::relay::{DisabledRelay, WsRelay};
use crate::adapters::storage::JsonFileStore;
use crate::adapters::ws::{build_ws_router, WsState};
use crate::config::BoardConfig;
use crate::core::board::MessageBoard;
use crate::core::MessageRelay;
use crate::utils::error::{BoardError, Result};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Both listeners bound, ready to serve.
pub struct BoundServers {
    http_listener: TcpListener,
    ws_listener: TcpListener,
    http_router: Router,
    ws_router: Router,
    http_addr: SocketAddr,
    ws_addr: SocketAddr,
    drain: Duration,
}

fn server_error(context: &str, e: impl std::fmt::Display) -> BoardError {
    BoardError::ServerError {
        message: format!("{}: {}", context, e),
    }
}

async fn bind_listener(addr: SocketAddr, name: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| server_error(&format!("{} bind {} failed", name, addr), e))
}

impl BoundServers {
    pub async fn bind(config: &BoardConfig) -> Result<Self> {
        let store = JsonFileStore::new(config.data_file());
        store.ensure_parent_dir().await?;

        let http_listener = bind_listener(config.http_addr()?, "HTTP").await?;
        let ws_listener = bind_listener(config.ws_addr()?, "WebSocket").await?;
        let http_addr = http_listener.local_addr()?;
        let ws_addr = ws_listener.local_addr()?;

        let relay: Arc<dyn MessageRelay> = if config.relay.enabled {
            let url = config.relay_url(ws_addr.port());
            tracing::info!("Relaying messages to {}", url);
            Arc::new(WsRelay::new(url, config.relay_timeout()))
        } else {
            tracing::info!("Message relay disabled");
            Arc::new(DisabledRelay)
        };

        let board = MessageBoard::new(Arc::new(store), relay);
        let pages = Pages::new(config.templates_dir(), config.static_dir());

        Ok(Self {
            http_listener,
            ws_listener,
            http_router: build_router(AppState::new(board, pages)),
            ws_router: build_ws_router(WsState::new(config.relay.broadcast_capacity)),
            http_addr,
            ws_addr,
            drain: config.shutdown_drain(),
        })
    }

    pub fn http_addr(&self) -> SocketAddr {
        self.http_addr
    }

    pub fn ws_addr(&self) -> SocketAddr {
        self.ws_addr
    }

    /// 任一伺服器結束都會讓另一個一起關閉；`shutdown` 完成時正常結束
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let (stop_tx, stop_rx) = watch::channel(false);

        tracing::info!("HTTP server started on {}", self.http_addr);
        let http = spawn_server(self.http_listener, self.http_router, stop_rx.clone());
        tracing::info!("WebSocket server started on {}", self.ws_addr);
        let ws = spawn_server(self.ws_listener, self.ws_router, stop_rx);

        supervise(http, ws, stop_tx, shutdown, self.drain).await
    }
}

type ServerTask = JoinHandle<std::io::Result<()>>;

/// Waits for `shutdown` or for either server to stop, then tells both to stop
/// and gives the survivors `drain` to finish. A server stopping on its own is an error.
async fn supervise<F>(
    mut http: ServerTask,
    mut ws: ServerTask,
    stop_tx: watch::Sender<bool>,
    shutdown: F,
    drain: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let early_exit = tokio::select! {
        _ = shutdown => None,
        res = &mut http => Some(finish("HTTP", res)),
        res = &mut ws => Some(finish("WebSocket", res)),
    };

    let _ = stop_tx.send(true);

    let outcome = match early_exit {
        Some(first) => Err(first.err().unwrap_or_else(|| BoardError::ServerError {
            message: "server stopped unexpectedly".to_string(),
        })),
        None => Ok(()),
    };

    // 等待剩餘連線排空
    for (name, handle) in [("HTTP", http), ("WebSocket", ws)] {
        if handle.is_finished() {
            continue;
        }
        match tokio::time::timeout(drain, handle).await {
            Ok(res) => {
                if let Err(e) = finish(name, res) {
                    tracing::warn!("{} server shutdown: {}", name, e);
                }
            }
            Err(_) => tracing::warn!("{} server did not drain within {:?}", name, drain),
        }
    }

    outcome
}

fn spawn_server(
    listener: TcpListener,
    router: Router,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<std::io::Result<()>> {
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop.wait_for(|stopped| *stopped).await;
            })
            .await
    })
}

fn finish(
    name: &str,
    res: std::result::Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match res {
        Ok(Ok(())) => {
            tracing::info!("{} server stopped", name);
            Ok(())
        }
        Ok(Err(e)) => Err(server_error(&format!("{} server failed", name), e)),
        Err(e) => Err(server_error(&format!("{} server task panicked", name), e)),
    }
}

pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                tracing::warn!("Could not register signal handlers, falling back to Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

pub async fn run(config: &BoardConfig) -> Result<()> {
    let servers = BoundServers::bind(config).await?;
    servers
        .serve_until(async {
            wait_for_shutdown_signal().await;
            tracing::info!("Shutdown signal received");
        })
        .await
}
