pub mod broadcast;
pub mod dispatch;
mod doctor;
pub mod handler;
