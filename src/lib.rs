pub mod config;
pub mod contact;
pub mod email;
pub mod i18n;
pub mod middleware;
pub mod pages;
pub mod seo;
pub mod server;
