mod attendance;
mod auth;
pub mod client;
mod resources;
pub mod types;

pub use attendance::*;
pub use auth::*;
pub use client::*;
pub use resources::*;
pub use types::*;
