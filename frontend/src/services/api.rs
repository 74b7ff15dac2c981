//! REST client for the template service.
//!
//! Thin async wrappers over `gloo-net`: each call builds the URL from
//! [`ApiRoutes`], unwraps the `ApiResponse` envelope and maps every failure
//! into [`ApiError`]. Callers decide how to degrade; nothing here retries.

use common::api::ApiRoutes;
use common::model::place_holder::EntityPlaceholders;
use common::model::response::ApiResponse;
use common::model::template::{Template, TemplateType};
use common::model::validation::ValidationReport;
use common::requests::{
    ExtractPlaceholdersRequest, UpsertTemplateRequest, ValidatePlaceholdersRequest,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::app_config;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("No se pudo contactar al servidor: {0}")]
    Network(String),

    #[error("El servidor respondió {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Respuesta inválida del servidor: {0}")]
    Decode(String),

    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateApi {
    routes: ApiRoutes,
}

impl Default for TemplateApi {
    fn default() -> Self {
        Self::new(&app_config().api_base_url)
    }
}

impl TemplateApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            routes: ApiRoutes::new(base_url),
        }
    }

    pub async fn schema_placeholders(
        &self,
        template_type: TemplateType,
    ) -> Result<EntityPlaceholders, ApiError> {
        let response = Request::get(&self.routes.schema_placeholders(template_type))
            .send()
            .await;
        data(response).await
    }

    pub async fn extract_placeholders(&self, content: &str) -> Result<Vec<String>, ApiError> {
        let body = ExtractPlaceholdersRequest {
            content: content.to_string(),
        };
        let response = post_json(&self.routes.extract_placeholders(), &body).await;
        data(response).await
    }

    pub async fn validate_placeholders(
        &self,
        placeholders: Vec<String>,
        template_type: TemplateType,
    ) -> Result<ValidationReport, ApiError> {
        let body = ValidatePlaceholdersRequest {
            placeholders,
            template_type,
        };
        let response = post_json(&self.routes.validate_placeholders(), &body).await;
        data(response).await
    }

    pub async fn list(&self, filter: Option<TemplateType>) -> Result<Vec<Template>, ApiError> {
        let response = Request::get(&self.routes.templates(filter)).send().await;
        data(response).await
    }

    pub async fn get(&self, id: i64) -> Result<Template, ApiError> {
        let response = Request::get(&self.routes.template(id)).send().await;
        data(response).await
    }

    pub async fn create(&self, body: &UpsertTemplateRequest) -> Result<Template, ApiError> {
        let response = post_json(&self.routes.templates(None), body).await;
        data(response).await
    }

    pub async fn update(
        &self,
        id: i64,
        body: &UpsertTemplateRequest,
    ) -> Result<Template, ApiError> {
        let response = match Request::put(&self.routes.template(id)).json(body) {
            Ok(request) => request.send().await,
            Err(e) => Err(e),
        };
        data(response).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = Request::delete(&self.routes.template(id)).send().await;
        ack(response).await
    }

    pub async fn set_default(&self, id: i64) -> Result<(), ApiError> {
        let response = Request::post(&self.routes.set_default(id)).send().await;
        ack(response).await
    }
}

async fn post_json<B: Serialize>(url: &str, body: &B) -> Result<Response, gloo_net::Error> {
    Request::post(url).json(body)?.send().await
}

async fn envelope<T: DeserializeOwned>(
    response: Result<Response, gloo_net::Error>,
) -> Result<ApiResponse<T>, ApiError> {
    let response = response.map_err(|e| ApiError::Network(e.to_string()))?;
    if !response.ok() {
        return Err(ApiError::Status {
            status: response.status(),
            body: response.text().await.unwrap_or_default(),
        });
    }
    response
        .json::<ApiResponse<T>>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn data<T: DeserializeOwned>(
    response: Result<Response, gloo_net::Error>,
) -> Result<T, ApiError> {
    envelope(response)
        .await?
        .into_result()
        .map_err(ApiError::Rejected)
}

async fn ack(response: Result<Response, gloo_net::Error>) -> Result<(), ApiError> {
    envelope::<serde_json::Value>(response)
        .await?
        .into_ack()
        .map_err(ApiError::Rejected)
}
