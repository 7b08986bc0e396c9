//! HTTP + WebSocket delivery of diagram payloads

pub mod error;
pub mod handlers;
pub mod router;
pub mod websocket;

use std::net::SocketAddr;
use std::sync::Arc;

use ngdiagram_core::{DiagramPayload, DiagramSession, ProjectEntities, Snapshot};
use tokio::sync::{RwLock, broadcast};
use tracing::info;

pub use error::ApiError;
pub use websocket::PanelMessage;

/// Where the server listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 7891,
        }
    }
}

/// State shared by every request and socket.
pub struct ServerState {
    pub session: RwLock<DiagramSession>,
    /// Serialized [`PanelMessage`]s for every connected panel.
    pub display_tx: broadcast::Sender<String>,
}

impl ServerState {
    pub fn new(session: DiagramSession) -> Self {
        let (display_tx, _) = broadcast::channel(16);
        ServerState {
            session: RwLock::new(session),
            display_tx,
        }
    }

    /// Send a message to every connected panel.
    pub fn broadcast(&self, msg: String) -> Result<usize, broadcast::error::SendError<String>> {
        self.display_tx.send(msg)
    }

    /// Re-analyze with fresh entities.
    ///
    /// The ticket is taken, and the result installed and broadcast, under
    /// the write lock; the build itself runs outside it. Returns `None` when a newer
    /// analysis started before this one finished.
    pub async fn analyze(&self, entities: ProjectEntities) -> Result<Option<DiagramPayload>, ApiError> {
        let ticket = self.session.write().await.begin_analysis();

        let snapshot = tokio::task::spawn_blocking(move || Snapshot::build(ticket, entities))
            .await
            .map_err(|e| ApiError::Internal(e.into()))??;

        let mut session = self.session.write().await;
        if session.install(snapshot).is_none() {
            return Ok(None);
        }
        let payload = session.payload()?;

        // Sent under the guard so panels see installs in ticket order.
        let message = PanelMessage::DisplayDiagram {
            data: payload.clone(),
        };
        if let Ok(json) = serde_json::to_string(&message) {
            // No receivers just means no panel is open.
            let _ = self.broadcast(json);
        }
        drop(session);

        Ok(Some(payload))
    }
}

pub struct NgDiagramServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl NgDiagramServer {
    pub fn new(session: DiagramSession, config: ServerConfig) -> Self {
        NgDiagramServer {
            state: Arc::new(ServerState::new(session)),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    pub fn address(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.config.host, self.config.port).parse()?)
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = self.address()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router::create_router(self.state)).await?;
        Ok(())
    }
}
