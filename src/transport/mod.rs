pub mod runtime;
pub mod slack;
