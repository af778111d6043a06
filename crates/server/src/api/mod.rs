pub mod handlers;
pub mod lookup;
pub mod middleware;
pub mod routes;
pub mod watchlist;

pub use routes::create_router;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
