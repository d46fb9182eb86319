//! Object catalog: the latest known state of each object, kept current from
//! storage object events.

pub mod db;
mod handler;
pub mod models;
mod objects;
mod tables;

pub use db::{Catalog, DatabaseError};
pub use handler::{CatalogError, CatalogHandler};
pub use tables::*;
