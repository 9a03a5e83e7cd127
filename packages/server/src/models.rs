pub mod api;
pub mod notification;
pub mod session;
pub mod timer;
