//! Async blog operations over a `Transport`.
//!
//! Every operation is `build → execute → parse` and touches nothing but its
//! own request and response, so concurrent calls need no coordination. A
//! failed call is returned as-is; there is no retry.

use serde_json::Value;

use crate::client::BlogClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::{decode_body, ReqwestTransport, Transport};
use crate::types::{
    Blog, BlogCreatePayload, BlogSearchParams, BlogUpdatePayload, OrderUpdate, PaginatedResponse,
};

#[derive(Debug, Clone)]
pub struct BlogApi<T> {
    client: BlogClient,
    transport: T,
}

impl BlogApi<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            BlogClient::new(&config.base_url),
            ReqwestTransport::new()?,
        ))
    }
}

impl<T: Transport> BlogApi<T> {
    pub fn new(client: BlogClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BlogClient {
        &self.client
    }

    /// Send any request and classify the answer. `None` means the server
    /// returned no content.
    pub async fn fetch(&self, request: HttpRequest) -> Result<Option<Value>, ApiError> {
        let response = self.transport.execute(request.with_json_headers()).await?;
        decode_body(&response)
    }

    pub async fn list_blogs(
        &self,
        params: &BlogSearchParams,
    ) -> Result<PaginatedResponse<Blog>, ApiError> {
        let request = self.client.build_list_blogs(params);
        self.client.parse_list_blogs(self.transport.execute(request).await?)
    }

    pub async fn create_blog(&self, payload: &BlogCreatePayload) -> Result<Blog, ApiError> {
        let request = self.client.build_create_blog(payload)?;
        self.client.parse_create_blog(self.transport.execute(request).await?)
    }

    pub async fn update_blog(
        &self,
        id: u64,
        payload: &BlogUpdatePayload,
    ) -> Result<Blog, ApiError> {
        let request = self.client.build_update_blog(id, payload)?;
        self.client.parse_update_blog(self.transport.execute(request).await?)
    }

    pub async fn delete_blog(&self, id: u64) -> Result<(), ApiError> {
        let request = self.client.build_delete_blog(id);
        self.client.parse_delete_blog(self.transport.execute(request).await?)
    }

    pub async fn set_active(&self, id: u64) -> Result<Blog, ApiError> {
        let request = self.client.build_set_active(id);
        self.client.parse_set_active(self.transport.execute(request).await?)
    }

    pub async fn set_inactive(&self, id: u64) -> Result<Blog, ApiError> {
        let request = self.client.build_set_inactive(id);
        self.client.parse_set_inactive(self.transport.execute(request).await?)
    }

    pub async fn update_order(&self, id: u64, order: i64) -> Result<Blog, ApiError> {
        let request = self.client.build_update_order(id, order)?;
        self.client.parse_update_order(self.transport.execute(request).await?)
    }

    pub async fn bulk_update_order(&self, orders: &[OrderUpdate]) -> Result<Vec<Blog>, ApiError> {
        let request = self.client.build_bulk_update_order(orders)?;
        self.client.parse_bulk_update_order(self.transport.execute(request).await?)
    }
}
