pub mod config;
pub mod debounce;
pub mod error;
pub mod identity;
pub mod location;
pub mod models;
pub mod normalize;
pub mod recent;
