pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
pub mod relation;
mod route;
pub mod server;
pub mod state;
pub mod store;
mod traits;
