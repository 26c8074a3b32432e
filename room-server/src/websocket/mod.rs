use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::room_service::RoomService;
use room_types::{ClientMessage, RoomError};

pub mod connection;
pub mod handlers;
pub mod rate_limiter;


use connection::ConnectionId;
pub use connection::ConnectionManager;
use handlers::MessageHandler;
use rate_limiter::RateLimiter;

pub async fn handle_connection(
    websocket: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    room_service: Arc<RoomService>,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let mut rate_limiter = RateLimiter::new();

    // Register the connection and take the receiver for outgoing messages
    let message_receiver = connection_manager.create_connection(connection_id).await;

    let message_handler = MessageHandler::new(
        connection_id,
        connection_manager.clone(),
        room_service.clone(),
    );

    // Inbound: parse frames and dispatch them
    let incoming = {
        let message_handler = message_handler.clone();
        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) => {
                        if let Err(e) =
                            dispatch_frame(msg, &mut rate_limiter, &message_handler).await
                        {
                            error!("Dropping connection {} after send failure: {}", connection_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        }
    };

    // Outbound: drain the channel into the socket
    let outgoing = async move {
        let mut receiver = message_receiver;

        while let Some(message) = receiver.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }
    };

    tokio::select! {
        _ = incoming => {},
        _ = outgoing => {},
    }

    if let Some(connection) = connection_manager.get_connection(connection_id).await {
        info!(
            "Connection {} closed after {:?}",
            connection_id,
            connection.connected_at.elapsed()
        );
    }
    message_handler.handle_disconnect().await;
    connection_manager.remove_connection(connection_id).await;
}

/// Decode one frame and hand it to the dispatcher. A malformed frame
/// earns the sender an error reply and nothing else; only a dead outbound
/// channel ends the connection.
async fn dispatch_frame(
    msg: Message,
    rate_limiter: &mut RateLimiter,
    message_handler: &MessageHandler,
) -> Result<(), String> {
    // Only text frames carry requests; warp answers pings itself
    if !msg.is_text() {
        return Ok(());
    }

    if !rate_limiter.allow() {
        warn!(
            "Rate limit exceeded for connection {}, dropping frame",
            message_handler.connection_id()
        );
        return Ok(());
    }

    let Ok(text) = msg.to_str() else {
        return Ok(());
    };

    match serde_json::from_str::<ClientMessage>(text) {
        Ok(client_message) => message_handler.handle_message(client_message).await,
        Err(e) => {
            warn!(
                "Malformed frame from {}: {}",
                message_handler.connection_id(),
                e
            );
            message_handler.send_error(RoomError::BadRequest).await
        }
    }
}
