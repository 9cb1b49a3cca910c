pub mod convert;
pub mod layout;
