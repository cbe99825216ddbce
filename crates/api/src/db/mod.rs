pub mod climate_data;
pub mod schema;
pub mod sqlite;

pub use climate_data::*;
pub use schema::{Measurement, Station};
pub use sqlite::{Database, MAX_SESSIONS};
