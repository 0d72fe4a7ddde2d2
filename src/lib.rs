//! microrm: declare a struct, derive its table, save and look up typed records.
//!
//! ```ignore
//! #[derive(microrm::Model)]
//! struct User {
//!     #[microrm(surrogate)]
//!     id: Option<i64>,
//!     name: String,
//!     email: String,
//! }
//! ```
//!
//! The table is created the first time the model is used with a database
//! handle. `save` updates by key when the key is known, inserts otherwise.
pub use microrm_core::*;
pub use microrm_macros::*;
