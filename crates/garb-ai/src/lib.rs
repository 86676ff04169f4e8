//! AI gateway plumbing for Garb.
//!
//! Contains the upstream chat-gateway client, the five proxy-function
//! request/response contracts, the prompt templates, and the isolated
//! "first JSON object in free text" extraction utility. The model itself is
//! an external collaborator; only the wire contracts live here.

pub mod client;
pub mod contract;
pub mod dataurl;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod prompts;

pub use client::{AiFunctions, FunctionsClient};
pub use error::{Error, Result};
pub use gateway::{ChatGateway, HttpGateway};
