// apibee - A chainable REST API client for Rust
//
// Build request URLs by chaining path segments, merge persistent query
// parameters, and shape requests and results through hooks.

// Re-export the client
pub use apibee_client::*;

// Prelude for common imports
pub mod prelude {
    pub use apibee_client::hooks;
    pub use apibee_client::prelude::*;
}
