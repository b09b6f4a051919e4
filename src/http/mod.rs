//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → GET /      → blocking pool: load simulator → visitor counter
//!     → GET /count → visitor counter (read)
//!     → response.rs (JSON body, error → 500)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{AppError, CountResponse};
pub use server::{serve, AppState, HttpServer};
