mod callback;
mod config;
mod model;
pub mod router;

pub use callback::InFlightCallbacks;
pub use config::Config;
