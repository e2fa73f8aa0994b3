pub mod config_io;
pub mod output_io;
pub mod workspace_io;
