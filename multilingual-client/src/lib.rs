//! Remote translation store for `multilingual`
//!
//! [`HttpStore`] implements [`multilingual::TranslationStore`] over the JSON
//! protocol served by `multilingual-web`. The crate also ships the
//! `multilingual` command line tool.

pub mod http;

pub use http::{HttpStore, STORE_TOKEN_ENV, STORE_URL_ENV};
