pub mod core;
pub mod memory;
pub mod api_server;
pub mod cli;
