pub mod completion;
pub mod config;
pub mod error;
pub mod fs;
pub mod items;
pub mod logging;
pub mod npm;
pub mod resolve;
pub mod text;
pub mod tsconfig;
pub mod util;

pub use completion::{CompletionInput, complete};
pub use config::{Config, Mapping};
pub use error::{PathsenseError, Result};
pub use items::{CompletionKind, PathCompletion, TextEdit, TextRange};
