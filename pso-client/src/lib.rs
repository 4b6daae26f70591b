pub mod driver;
pub mod script;
pub mod settings;
