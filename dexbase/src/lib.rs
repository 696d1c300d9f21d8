pub mod cache;
pub mod catalog;
pub mod distribution;
pub mod effectiveness;
pub mod pokemon;
pub mod resolver;
pub mod resource;
pub mod session;
pub mod team;
pub mod ty;

mod error;

#[cfg(test)]
mod testing;

pub use cache::Cache;
pub use catalog::Catalog;
pub use distribution::Distribution;
pub use effectiveness::{Effectiveness, Matchups};
pub use error::Error;
pub use pokemon::{Generation, Pokemon};
pub use resolver::Filters;
pub use session::Session;
pub use team::{Summary, Team};
pub use ty::Type;

pub type Result<T, E = Error> = std::result::Result<T, E>;
