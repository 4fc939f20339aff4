//! Domain services
//!
//! Pure projections over backend data, and the HTTP client that fetches it.

mod backend_api_client;
mod day_overview;
mod machine_access;
mod schedule_projector;

pub use backend_api_client::*;
pub use day_overview::*;
pub use machine_access::*;
pub use schedule_projector::*;
