#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Feature flags
#![doc = document_features::document_features!(feature_label = r#"<span class="stab portability"><code>{feature}</code></span>"#)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod adc;
pub mod board;
pub mod error;
pub mod report;
pub mod sampler;

// Reexports
pub use adc::{AdcSequencer, ChannelConfig, Sequence};
pub use error::{Error, Fatal};
pub use report::{Console, LogConsole, Report};
pub use sampler::{Config, Cycle, Running, Sampler};
