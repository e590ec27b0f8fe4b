pub mod build_up;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod http_client;
pub mod identity;
pub mod names;
pub mod payload;
pub mod persist;
pub mod pitch;
pub mod prompt;
pub mod proximity;
pub mod remote;
pub mod sync;
pub mod synthetic;
pub mod tracking;
