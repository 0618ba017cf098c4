//! Relay backend for the plant diary app
//!
//! Forwards client requests to a generative AI vendor (image generation,
//! chat completion, image analysis), re-hosts generated images in blob
//! storage and records their public URL in the document database.

pub mod ai;
pub mod api;
pub mod error;
pub mod models;
pub mod personality;
pub mod prompts;
pub mod records;
pub mod relay;
pub mod storage;

pub use error::{Error, Result};
