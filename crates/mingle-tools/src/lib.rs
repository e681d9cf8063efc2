mod capture;
mod directory;
mod draft;
mod lookup;
mod registry;

pub mod heuristic;
pub mod schema;
pub mod templates;

pub use capture::CaptureTool;
pub use directory::DirectoryClient;
pub use draft::{DraftArgs, DraftFollowupTool};
pub use heuristic::{HeuristicExtractor, IntentExtractor};
pub use lookup::LookupContactTool;
pub use registry::ToolRegistry;
