pub mod cors;
pub mod handler;
pub mod listener;
pub mod router;
