pub mod dates;
pub mod db;
mod error;
pub mod routes;
mod startup;
pub mod templates;
mod utils;

pub use dates::*;
pub use db::*;
pub use error::Error;
pub use routes::*;
pub use startup::*;
pub use utils::*;
