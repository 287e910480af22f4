//! SQL building: identifiers are interpolated (validated by callers), values
//! are always bound parameters.

mod ddl;
pub mod params;
mod query;

pub use ddl::*;
pub use params::*;
pub use query::*;
