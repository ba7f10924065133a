pub mod channels;
pub mod config;
pub mod gather;
pub mod i18n;
pub mod runtime;
pub mod shared;
pub mod store;
