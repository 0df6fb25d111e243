//! Load a Jekyll-style site configuration and work out what the rendering engine would see
//! for every document: the merged front matter and the permalink.

pub mod permalink;
mod site;

pub use quire_config;
pub use quire_config::Config;
pub use quire_core;
pub use site::*;
