pub mod config;
pub mod document;
pub mod region;
pub mod workspace;

pub use config::*;
pub use document::*;
pub use region::*;
pub use workspace::*;
