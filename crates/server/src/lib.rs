pub mod config;
pub mod error;
pub mod routes;

pub use config::{load_dotenv, ServerConfig};
pub use error::AskError;
pub use routes::router;
