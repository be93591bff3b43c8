pub mod lib;
pub mod login;
pub mod traits;
