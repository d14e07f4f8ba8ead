//! Locale-aware request routing.
//!
//! - `path`: splitting a request path into locale segment and remainder
//! - `resolver`: the pure pass-through / redirect decision
//! - `negotiation`: optional locale detection from cookie and `Accept-Language`
//! - `middleware`: the axum adapter that applies a decision to a request

mod middleware;
mod negotiation;
mod path;
mod resolver;

pub use middleware::{locale_middleware, ResolvedLocale};
pub use negotiation::{negotiate, parse_accept_language, LOCALE_COOKIE};
pub use path::LocalePath;
pub use resolver::{resolve, RequestSignals, RoutingConfig, RoutingDecision};
