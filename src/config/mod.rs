mod server;

pub use server::{FileConfig, ServerConfig, parse_timezone};
