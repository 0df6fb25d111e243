mod config;
mod datetime;
mod defaults;
mod document;
mod error;
mod frontmatter;
mod permalink;
mod theme;

pub mod path;

pub use self::config::*;
pub use self::datetime::*;
pub use self::defaults::*;
pub use self::document::*;
pub use self::error::*;
pub use self::frontmatter::*;
pub use self::permalink::*;
pub use self::theme::*;

pub use liquid_core::model::KString;

type Result<T, E = ConfigError> = std::result::Result<T, E>;
