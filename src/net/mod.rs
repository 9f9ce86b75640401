pub mod ntfy;
pub mod server;
pub mod wifi;
