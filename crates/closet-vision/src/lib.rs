//! # closet-vision
//!
//! Image-analysis adapter for Closet. Given a base64 image, an API key and
//! a [`Provider`](closet_core::Provider), it asks Gemini or OpenAI to
//! describe a clothing item, and Gemini to replace the background with
//! solid white.
//!
//! Every failure reaches the caller as a [`VisionError`] whose `Display`
//! text is meant for the user. Vendor detail goes to the log.

pub mod client;
pub mod config;
pub mod error;
mod gemini;
pub mod image;
mod openai;
mod prompt;

pub use client::VisionClient;
pub use config::VisionConfig;
pub use error::{Operation, VisionError};
pub use image::{extension_for_mime, mime_for_extension, EditedImage};
