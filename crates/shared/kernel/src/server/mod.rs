//! Axum building blocks shared by the server and the feature slices.

mod health;
mod router;
mod state;

pub use health::HealthResponse;
pub use router::system_router;
pub use state::{ApiState, ApiStateError, ApiStateErrorExt};
