pub mod app;
pub mod auth;
pub mod config;
pub mod diet;
pub mod profiles;
pub mod state;
pub mod store;
#[cfg(test)]
mod testing;
