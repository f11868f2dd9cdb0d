pub mod content;
pub mod subscriber;
