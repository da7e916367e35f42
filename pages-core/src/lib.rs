//! Pages core library — renderer configuration, page data, site config, errors.
//!
//! Public API surface:
//! - [`config`] — [`RendererConfig`] and [`SelectionPattern`]
//! - [`data`] — [`DataCollection`] and [`TemplateData`]
//! - [`site`] — [`SiteConfig`], the YAML site description
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod data;
pub mod error;
pub mod site;

pub use config::{
    RendererConfig, SelectionPattern, DEFAULT_DESTINATION_EXTENSION, DEFAULT_SOURCE_EXTENSION,
};
pub use data::{DataCollection, TemplateData};
pub use error::ConfigError;
pub use site::SiteConfig;
