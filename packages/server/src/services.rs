pub mod dictionary;
pub mod session_service;
