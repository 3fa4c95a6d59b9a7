//! HTTP and WebSocket surface of the room server.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod websocket;

pub use server::ApiServer;
