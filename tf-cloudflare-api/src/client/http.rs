//! Cloudflare HTTP request methods

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ApiErrorMapper, ErrorContext, RawApiError};
use crate::types::CloudflareResponse;
use crate::utils::log_sanitizer::truncate_for_log;

use super::{CloudflareClient, PER_PAGE};

impl CloudflareClient {
    /// Send a request and unwrap the v4 envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &str,
        url: &str,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>> {
        let (status, text) = HttpUtils::execute_request_with_retry(
            self.authorize(builder),
            method,
            url,
            self.max_retries,
        )
        .await?;
        self.decode(status, &text, context)
    }

    /// Decode the envelope, mapping `success: false` and HTTP errors.
    pub(crate) fn decode<T: DeserializeOwned>(
        &self,
        status: u16,
        text: &str,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>> {
        match serde_json::from_str::<CloudflareResponse<T>>(text) {
            Ok(response) if response.success && status < 400 => Ok(response),
            Ok(response) => {
                let raw = response.errors.first().map_or_else(
                    || RawApiError::new(status, "Unknown error"),
                    |e| RawApiError::with_code(status, e.code.to_string(), e.message.clone()),
                );
                let err = self.map_error(raw, context);
                if err.is_expected() {
                    log::warn!("API error: {err}");
                } else {
                    log::error!("API error: {err}");
                }
                Err(err)
            }
            // Non-JSON error bodies (proxies, HTML error pages)
            Err(_) if status >= 400 => Err(self.map_error(
                RawApiError::new(status, truncate_for_log(text)),
                context,
            )),
            Err(e) => {
                log::error!("JSON parse failed: {e}");
                log::error!("Raw response: {}", truncate_for_log(text));
                Err(self.parse_error(e))
            }
        }
    }

    /// GET a single object
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response: CloudflareResponse<T> = self
            .execute(
                self.client.get(&url),
                "GET",
                &url,
                ErrorContext::for_resource(path),
            )
            .await?;

        response
            .result
            .ok_or_else(|| self.parse_error("Response is missing the result field"))
    }

    /// GET every page of a list endpoint
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let url = format!("{}?page={page}&per_page={PER_PAGE}", self.url(path));
            let response: CloudflareResponse<Vec<T>> = self
                .execute(
                    self.client.get(&url),
                    "GET",
                    &url,
                    ErrorContext::for_resource(path),
                )
                .await?;

            let batch = response.result.unwrap_or_default();
            let fetched = batch.len();
            items.extend(batch);

            let total_pages = response.result_info.map_or(0, |info| info.total_pages);
            if fetched == 0 || page >= total_pages {
                break;
            }
            page += 1;
        }

        log::debug!("Fetched {} items from {path}", items.len());
        Ok(items)
    }

    /// POST a JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        log::debug!(
            "Request Body: {}",
            truncate_for_log(&serde_json::to_string(body).unwrap_or_default())
        );
        let response: CloudflareResponse<T> = self
            .execute(
                self.client.post(&url).json(body),
                "POST",
                &url,
                ErrorContext::for_resource(path),
            )
            .await?;

        response
            .result
            .ok_or_else(|| self.parse_error("Response is missing the result field"))
    }

    /// PATCH a JSON body
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        log::debug!(
            "Request Body: {}",
            truncate_for_log(&serde_json::to_string(body).unwrap_or_default())
        );
        let response: CloudflareResponse<T> = self
            .execute(
                self.client.patch(&url).json(body),
                "PATCH",
                &url,
                ErrorContext::for_resource(path),
            )
            .await?;

        response
            .result
            .ok_or_else(|| self.parse_error("Response is missing the result field"))
    }

    /// DELETE, discarding the result
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let _: CloudflareResponse<serde_json::Value> = self
            .execute(
                self.client.delete(&url),
                "DELETE",
                &url,
                ErrorContext::for_resource(path),
            )
            .await?;
        Ok(())
    }
}
