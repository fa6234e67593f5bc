pub mod context;
pub mod labels;
pub mod mapping;
pub mod result;
