//! Solution counts per problem: the read-only table and the builder that computes it

mod builder;
mod errors;
mod table;

pub use builder::DatabaseBuilder;
pub use errors::DatabaseError;
pub use table::SolutionTable;
