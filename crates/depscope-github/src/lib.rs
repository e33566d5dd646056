//! # depscope GitHub
//!
//! REST access for depscope tools: [`GitHubConfig`] describes where and how
//! to connect, [`GitHubClient`] sends requests, and [`ClientProvider`] is
//! the capability tools receive to obtain a client per invocation.

pub mod client;
pub mod config;
pub mod provider;

pub use client::{API_VERSION, API_VERSION_HEADER, ClientError, GitHubClient, GitHubClientBuilder};
pub use config::{ConfigError, DEFAULT_API_URL, GitHubConfig, GitHubConfigBuilder, parse_bool};
pub use provider::{ClientProvider, ConfiguredClientProvider};

// Re-exported so tools and tests use the same HTTP types as the client.
pub use reqwest::{Method, StatusCode};
