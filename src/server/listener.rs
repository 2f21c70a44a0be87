use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::handler::Handler;

/// Handle to a running accept loop.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

/// Binds `cfg.listen_addr` and starts accepting connections in the background.
pub async fn serve<H: Handler>(cfg: &Config, handler: H) -> anyhow::Result<Server> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    let local_addr = listener.local_addr()?;
    info!("Listening on {}", local_addr);

    let closed = Arc::new(AtomicBool::new(false));
    let shutdown = Arc::new(Notify::new());

    let task = tokio::spawn(run(
        listener,
        cfg.clone(),
        Arc::new(handler),
        closed.clone(),
        shutdown.clone(),
    ));

    Ok(Server {
        local_addr,
        closed,
        shutdown,
        task,
    })
}

impl Server {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections. Workers already running finish on their own.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Waits for the accept loop to exit.
    pub async fn wait(self) -> anyhow::Result<()> {
        self.task.await.context("accept loop panicked")
    }
}

async fn run<H: Handler>(
    listener: TcpListener,
    cfg: Config,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) {
    loop {
        let accepted = tokio::select! {
            _ = shutdown.notified() => break,
            res = listener.accept() => res,
        };

        let (socket, peer) = match accepted {
            Ok(conn) => conn,
            Err(e) if closed.load(Ordering::SeqCst) => {
                tracing::debug!(error = %e, "accept failed after close");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to accept connection");
                continue;
            }
        };

        info!("Accepted connection from {}", peer);

        let handler = handler.clone();
        let conn = Connection::new(socket, &cfg);
        tokio::spawn(async move {
            if let Err(e) = conn.run(handler.as_ref()).await {
                tracing::warn!("Connection error from {}: {:#}", peer, e);
            }
        });
    }

    info!("Accept loop stopped");
}
