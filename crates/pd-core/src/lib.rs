pub mod config;
pub mod document;
pub mod error;
pub mod id;
pub mod model;
pub mod store;

pub use config::CanvasConfig;
pub use document::{CanvasSize, DesignDocument, ElementRecord, ImportReport};
pub use error::{DocumentError, ElementError, StoreError};
pub use id::{ElementId, IdAllocator};
pub use model::*;
pub use store::ElementStore;
