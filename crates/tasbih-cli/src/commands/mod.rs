pub mod config;
pub mod count;
pub mod phrase;
pub mod prefs;
pub mod reminder;
pub mod target;
