mod as_value;
mod column;
mod connection;
mod criteria;
mod descriptor;
mod driver;
mod error;
mod executor;
mod field;
pub mod gateway;
mod model;
mod query;
pub mod registrar;
mod registry;
mod sql_writer;
mod util;
mod value;

#[doc(hidden)]
pub use ::anyhow;
pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use connection::*;
pub use criteria::*;
pub use descriptor::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use field::*;
pub use model::*;
pub use query::*;
pub use registry::*;
pub use sql_writer::*;
pub use util::*;
pub use value::*;

pub type Result<T> = std::result::Result<T, Error>;
