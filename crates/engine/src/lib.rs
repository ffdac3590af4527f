pub use category::Category;
pub use error::EngineError;
pub use icons::Icon;
pub use ids::new_id;
pub use library::Library;
pub use link::{CategoryPatch, Link, LinkDraft, LinkPatch};
pub use scroll::{
    DEFAULT_FRAME, DEFAULT_SETTLE, ScrollSync, SectionGeometry, Selection, SyncMode, Viewport,
};
pub use search::{CategoryMatches, Query, SearchField, SearchFields, SearchResults};
pub use store::{Action, AppStore, Effect, ViewMode};
pub use transfer::ImportReport;

pub mod batch;
mod category;
mod error;
pub mod favicon;
pub mod icons;
mod ids;
mod library;
mod link;
pub mod password;
pub mod scroll;
pub mod search;
mod store;
pub mod transfer;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
