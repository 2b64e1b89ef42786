//! titan-invoke — send a prompt to a hosted text model, get the text back.
//!
//! # Quick Start
//!
//! ```no_run
//! use titan_invoke::prelude::*;
//!
//! # async fn example() -> titan_invoke::error::Result<()> {
//! let client = InvocationClient::new(TextModel::TitanTextExpress, ClientConfig::from_env())?;
//! let text = client
//!     .invoke("Write a haiku about Rust.", &GenerationConfig::default())
//!     .await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
