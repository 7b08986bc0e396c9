//! WebSocket channel to the diagram panel

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use ngdiagram_core::{DiagramPayload, FilterOptions, MetadataView, NodeCategory};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::ServerState;

/// Messages exchanged with a panel, tagged by `command`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum PanelMessage {
    /// Server pushes a full diagram
    #[serde(rename = "DISPLAY-DIAGRAM")]
    DisplayDiagram { data: DiagramPayload },
    /// Server answers a metadata request
    #[serde(rename = "SHOW-METADATA")]
    ShowMetadata { data: MetadataView },
    /// Panel asks for the metadata of a clicked node
    #[serde(rename = "REQUEST-METADATA")]
    RequestMetadata {
        #[serde(rename = "nodeId")]
        node_id: String,
    },
    /// Panel asks for the diagram without some categories; an empty list
    /// means the configured default filter
    #[serde(rename = "FILTER")]
    Filter {
        #[serde(default)]
        exclude: Vec<NodeCategory>,
    },
    #[serde(rename = "ERROR")]
    Error { message: String },
}

impl PanelMessage {
    fn to_text(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("Failed to serialize panel message: {}", e);
                None
            }
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    info!("Panel connected");

    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.display_tx.subscribe();
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(16);

    let initial = state.session.read().await.payload().ok();
    if let Some(text) = initial.and_then(|data| PanelMessage::DisplayDiagram { data }.to_text()) {
        if sender.send(Message::Text(text)).await.is_err() {
            warn!("Failed to send initial diagram to panel");
            return;
        }
        debug!("Sent current diagram to panel");
    }

    let state_clone = Arc::clone(&state);
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    debug!("Received panel message: {}", text);
                    let reply = match serde_json::from_str::<PanelMessage>(&text) {
                        Ok(msg) => handle_panel_message(msg, &state_clone).await,
                        Err(e) => Some(PanelMessage::Error {
                            message: format!("unreadable message: {e}"),
                        }),
                    };
                    if let Some(text) = reply.as_ref().and_then(PanelMessage::to_text) {
                        if reply_tx.send(text).await.is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        loop {
            let text = tokio::select! {
                reply = reply_rx.recv() => match reply {
                    Some(text) => text,
                    None => break,
                },
                update = rx.recv() => match update {
                    Ok(text) => text,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Panel lagged behind by {} diagrams", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };
            if sender.send(Message::Text(text)).await.is_err() {
                debug!("Panel went away");
                break;
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    info!("Panel disconnected");
}

/// Answer a panel request. Server-bound commands produce no reply.
pub async fn handle_panel_message(msg: PanelMessage, state: &ServerState) -> Option<PanelMessage> {
    let session = state.session.read().await;
    let result = match msg {
        PanelMessage::RequestMetadata { node_id } => session
            .metadata(&node_id)
            .map(|data| PanelMessage::ShowMetadata { data }),
        PanelMessage::Filter { exclude } => {
            let options = if exclude.is_empty() {
                session.default_filter().clone()
            } else {
                FilterOptions::excluding(exclude).with_edge_policy(session.default_filter().edges)
            };
            session
                .filter(&options)
                .map(|data| PanelMessage::DisplayDiagram { data })
        }
        other => {
            debug!("Ignoring panel message {:?}", other);
            return None;
        }
    };

    Some(result.unwrap_or_else(|e| PanelMessage::Error {
        message: e.to_string(),
    }))
}
