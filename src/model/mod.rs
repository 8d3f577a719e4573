pub mod course;
pub mod database;
pub mod roster;
pub mod types;
pub mod utils;

pub use course::*;
pub use database::*;
pub use roster::*;
pub use types::*;
pub use utils::*;
