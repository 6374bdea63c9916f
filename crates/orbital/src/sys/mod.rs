pub mod protocol;
pub mod runtime;
pub mod server;
