use std::sync::Arc;
use warp::Filter;

use crate::rooms::RoomRegistry;
use crate::websocket::ConnectionManager;
use scribble_core::room_snapshot;

pub mod config;
pub mod rooms;
pub mod websocket;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    rooms: Arc<RoomRegistry>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let rooms_filter = warp::any().map({
        let rooms = rooms.clone();
        move || rooms.clone()
    });

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter.clone())
        .and(rooms_filter.clone())
        .map(|ws: warp::ws::Ws, conn_mgr, rooms| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, conn_mgr, rooms))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Room snapshot, word masked
    let room_state = warp::path!("rooms" / String / "state")
        .and(warp::get())
        .and(rooms_filter.clone())
        .and_then(handle_room_state_request);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    websocket
        .or(health)
        .or(room_state)
        .with(cors)
        .with(warp::log("scribble_room"))
}

async fn handle_room_state_request(
    room_id: String,
    rooms: Arc<RoomRegistry>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let repository = rooms.repository();

    let roster = match repository.get_roster(&room_id).await {
        Ok(Some(roster)) => roster,
        Ok(None) => {
            return Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Room not found"
                })),
                warp::http::StatusCode::NOT_FOUND,
            ));
        }
        Err(err) => {
            tracing::error!("Failed to load room {}: {}", room_id, err);
            return Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Failed to load room"
                })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    match repository.get_game(&room_id).await {
        Ok(game) => Ok(warp::reply::with_status(
            warp::reply::json(&room_snapshot(&room_id, &roster, game.as_ref())),
            warp::http::StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("Failed to load game for room {}: {}", room_id, err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Failed to load room"
                })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
