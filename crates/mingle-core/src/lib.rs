pub mod contact;
pub mod error;
pub mod profile;
pub mod tool;
pub mod traits;
pub mod types;

pub use contact::{synthesize_email, Contact, ContactRecord};
pub use error::MingleError;
pub use profile::{Profile, RankQuery};
pub use tool::{ParamSpec, ParamType, ToolArgs, ToolCall, ToolSpec};
pub use traits::{ContactDirectory, GenerationTier, ToolExecutor};
pub use types::*;
