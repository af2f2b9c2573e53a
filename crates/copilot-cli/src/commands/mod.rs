pub mod session;
pub mod show;
