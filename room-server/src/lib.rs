use std::sync::Arc;
use warp::Filter;

use crate::room_service::RoomService;
use crate::websocket::ConnectionManager;

pub mod config;
pub mod room_service;
pub mod websocket;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    room_service: Arc<RoomService>,
    public_dir: String,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let room_service_filter = warp::any().map({
        let room_service = room_service.clone();
        move || room_service.clone()
    });

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter)
        .and(room_service_filter)
        .map(|ws: warp::ws::Ws, conn_mgr, service| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, conn_mgr, service))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Browser client assets served from the public directory
    let assets = warp::get().and(warp::fs::dir(public_dir));

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(assets)
        .with(cors)
        .with(warp::log("room_server"))
}
