//! HTTP middleware: request ids, access logging and CORS.

mod cors;
mod request_id;
mod request_log;

pub use cors::cors_layer;
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
pub use request_log::request_log_middleware;
