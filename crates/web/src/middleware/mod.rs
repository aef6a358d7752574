//! HTTP middleware stack for the console.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (recorded in the span, echoed in the response)
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthSession, LOGIN_PATH, OptionalAuth, RequireAuth, clear_current_user, set_current_user,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
