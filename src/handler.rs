// HTTP handler bindings for the move API
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's core logic methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use serde_json::Value;

use fancy_2048_ai::bot::Bot;
use fancy_2048_ai::types::{MoveDecision, MoveRequest};

/// GET / endpoint
/// Returns service metadata and the supported algorithms
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /move endpoint
/// Computes the best move for the submitted board
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<MoveRequest>,
) -> Result<Json<MoveDecision>, BadRequest<String>> {
    match bot.get_move(move_req.into_inner()).await {
        Ok(decision) => Ok(Json(decision)),
        Err(e) => {
            log::warn!("Rejected move request: {}", e);
            Err(BadRequest(e))
        }
    }
}
