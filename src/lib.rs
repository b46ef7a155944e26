pub mod config;
pub mod event;
pub mod orchestration;
pub mod provider;
pub mod roles;
pub mod session;
pub mod shared;
