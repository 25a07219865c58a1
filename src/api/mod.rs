//! # API Module
//!
//! HTTP endpoints of the web front-end, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /` renders the workout form.
//! - [`generate`] - `POST /playlist` resolves the named playlist, imports and
//!   classifies its tracks, and renders the tracks matching the requested
//!   workout type and mood. Matches are also exported as CSV.
//! - [`health`] - `GET /health` returns status and version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::{get, post}};
//! use workoutmix::api::{generate, health, index};
//!
//! let app = Router::new()
//!     .route("/", get(index))
//!     .route("/playlist", post(generate))
//!     .route("/health", get(health));
//! ```

mod health;
mod playlist;

pub use health::health;
pub use playlist::AppState;
pub use playlist::PageOutcome;
pub use playlist::WorkoutForm;
pub use playlist::escape_html;
pub use playlist::generate;
pub use playlist::index;
pub use playlist::render_page;
