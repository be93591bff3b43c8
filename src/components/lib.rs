pub mod textfield;
pub mod toast;
