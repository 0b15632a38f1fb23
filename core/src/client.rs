//! Stateless HTTP request builder and response parser for the blog API.
//!
//! # Design
//! `BlogClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Parsing runs `decode_body`, then the normalizer matching the endpoint's
//! envelope, then a typed decode. `BlogApi` glues the two halves to a
//! `Transport`; hosts with their own HTTP stack can drive them directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{to_array, to_entity, to_paginated};
use crate::query::{list_query, with_query};
use crate::transport::decode_body;
use crate::types::{
    Blog, BlogCreatePayload, BlogSearchParams, BlogUpdatePayload, OrderUpdate, PaginatedResponse,
};

const BLOGS: &str = "/api/blogs";

/// Synchronous, stateless client for the blog API.
#[derive(Debug, Clone)]
pub struct BlogClient {
    base_url: String,
}

impl BlogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A request against `endpoint` relative to the base URL, with JSON
    /// headers merged in.
    pub fn request(&self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{endpoint}", self.base_url)).with_json_headers()
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(method, endpoint).with_body(body))
    }

    pub fn build_list_blogs(&self, params: &BlogSearchParams) -> HttpRequest {
        self.request(HttpMethod::Get, &with_query(BLOGS, &list_query(params)))
    }

    pub fn build_create_blog(&self, payload: &BlogCreatePayload) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, BLOGS, payload)
    }

    pub fn build_update_blog(
        &self,
        id: u64,
        payload: &BlogUpdatePayload,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("{BLOGS}/{id}"), payload)
    }

    pub fn build_delete_blog(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("{BLOGS}/{id}"))
    }

    pub fn build_set_active(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Post, &format!("{BLOGS}/{id}/set-active"))
    }

    pub fn build_set_inactive(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Post, &format!("{BLOGS}/{id}/set-inactive"))
    }

    pub fn build_update_order(&self, id: u64, order: i64) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            &format!("{BLOGS}/{id}/order"),
            &json!({ "order": order }),
        )
    }

    pub fn build_bulk_update_order(&self, orders: &[OrderUpdate]) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Post,
            &format!("{BLOGS}/bulk-update-order"),
            &json!({ "orders": orders }),
        )
    }

    pub fn parse_list_blogs(
        &self,
        response: HttpResponse,
    ) -> Result<PaginatedResponse<Blog>, ApiError> {
        let raw = decode_body(&response)?.unwrap_or(Value::Null);
        to_paginated(raw).try_map(decode)
    }

    pub fn parse_create_blog(&self, response: HttpResponse) -> Result<Blog, ApiError> {
        parse_entity(&response)
    }

    pub fn parse_update_blog(&self, response: HttpResponse) -> Result<Blog, ApiError> {
        parse_entity(&response)
    }

    pub fn parse_delete_blog(&self, response: HttpResponse) -> Result<(), ApiError> {
        decode_body(&response)?;
        Ok(())
    }

    pub fn parse_set_active(&self, response: HttpResponse) -> Result<Blog, ApiError> {
        parse_entity(&response)
    }

    pub fn parse_set_inactive(&self, response: HttpResponse) -> Result<Blog, ApiError> {
        parse_entity(&response)
    }

    pub fn parse_update_order(&self, response: HttpResponse) -> Result<Blog, ApiError> {
        parse_entity(&response)
    }

    pub fn parse_bulk_update_order(&self, response: HttpResponse) -> Result<Vec<Blog>, ApiError> {
        let raw = decode_body(&response)?.unwrap_or(Value::Null);
        to_array(raw).into_iter().map(decode).collect()
    }
}

fn parse_entity<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let raw = decode_body(response)?.unwrap_or(Value::Null);
    decode(to_entity(raw))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}
