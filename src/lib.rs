//! Client-side engine of the Charlotte landing page: language switching
//! between German and English, a contact form that opens a prefilled mail
//! draft, and a few page hooks.
//!
//! Everything browser specific sits behind the [`page::Page`] and
//! [`page::PreferenceStore`] traits. The `web` feature provides the
//! `web-sys` implementation and the wasm entry point.

pub mod config;
pub mod contact;
pub mod hooks;
pub mod internationalization;
pub mod landing;
pub mod language;
pub mod page;
#[cfg(feature = "web")]
pub mod web;

pub use config::Config;
pub use landing::Landing;
