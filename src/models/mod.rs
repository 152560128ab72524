pub mod adf;
pub mod event;
pub mod issue;
pub mod message;
