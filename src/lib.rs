pub mod aggregate;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod repository;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::load_data;
