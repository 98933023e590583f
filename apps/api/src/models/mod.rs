pub mod resume;
pub mod styles;
