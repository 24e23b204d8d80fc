pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod service;

pub use handlers::AppState;
pub use routes::{create_app, create_router};
pub use service::GameService;
