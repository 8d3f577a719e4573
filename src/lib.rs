pub mod args;
pub mod controller {
    pub mod db_prefill;
    pub mod editor;
    pub mod generate;
    pub mod save;
    pub mod teesheet;
}
pub mod error;
pub mod handicap;
pub mod model;
pub mod storage;

pub use controller::editor::{EditSession, GroupSlot};
pub use error::CoreError;
pub use storage::{SqlStorage, Storage, StorageError};
