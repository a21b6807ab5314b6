//! Backend and client plumbing for the portfolio site's chat assistant.
//!
//! The crate has three load-bearing pieces:
//! - [`server`]: the HTTP relay that forwards a question to the answer
//!   provider once and re-emits the reply as a word-paced SSE stream;
//! - [`client`]: the consumer side, which owns the rolling conversation
//!   state and tolerantly parses the stream back into frames;
//! - [`content`]: the segmenter that turns a finished answer into
//!   display blocks (paragraphs, headings, lists).

pub mod api_client;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod content;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod server;
