pub mod component;
pub mod focusable;
