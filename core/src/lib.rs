//! API client core for the blog showcase backend.
//!
//! # Overview
//! Builds `HttpRequest` values, executes them through a `Transport`, and turns
//! the backend's inconsistent response envelopes into three canonical shapes:
//! a single entity, a sequence, or a paginated listing.
//!
//! # Design
//! - `BlogClient` is stateless: it holds only `base_url`. Each operation is
//!   split into `build_*` and `parse_*` so the I/O boundary is explicit.
//! - `BlogApi` runs the round-trip over any `Transport`; `ReqwestTransport`
//!   is the async default.
//! - `normalize` never fails. Unknown shapes degrade to empty/default values.
//! - Failures are surfaced once and never retried.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod query;
pub mod transport;
pub mod types;

pub use api::BlogApi;
pub use catalog::Catalog;
pub use client::BlogClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::{classify, to_array, to_entity, to_paginated, Envelope};
pub use transport::{decode_body, ReqwestTransport, Transport};
pub use types::{
    Author, Blog, BlogCreatePayload, BlogSearchParams, BlogUpdatePayload, OrderBy, OrderUpdate,
    PaginatedResponse, Product, ProductWithScenes, Scene, SortDirection, SortField,
};
