use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::api::{
    AssignRequest, BroadcastReceipt, BroadcastRequest, CompanyQuery, CreateCompanyRequest, CreateTicketRequest,
    DutyRequest, Envelope, ErrorBody, LoginRequest, LoginResponse, RatingRequest, TechnicianQuery, TicketPatch,
};
use crate::config;
use crate::database::models::{Company, Technician, Ticket, UserSummary};
use crate::filter::TicketFilter;
use crate::recommender::TicketSuggestions;
use crate::services::DashboardStats;
use crate::types::{CompanyId, DutyStatus};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} ({status} {code})")]
    Api { status: u16, code: String, message: String },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Not logged in")]
    NotLoggedIn,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Typed access to the help desk HTTP API
#[derive(Debug, Clone)]
pub struct HelpDeskClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HelpDeskClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let timeout = Duration::from_secs(config::config().client.request_timeout_secs);
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `ws(s)://host/api/relay?token=...` for the current session
    pub fn relay_url(&self) -> Result<Url, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        let mut url = self.base_url.join("/api/relay")?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http(s) -> ws(s) is always a valid scheme change
        let _ = url.set_scheme(scheme);
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            let envelope: Envelope<T> = response.json().await?;
            return Ok(envelope.data);
        }

        let status = status.as_u16();
        let text = response.text().await.unwrap_or_default();
        Err(match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => ClientError::Api {
                status,
                code: body.code,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                status,
                code: "HTTP_ERROR".to_string(),
                message: if text.is_empty() { format!("HTTP {}", status) } else { text },
            },
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError> {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        Self::decode(response).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError> {
        let response = self.request(method, path)?.json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn health(&self) -> bool {
        match self.request(Method::GET, "/health") {
            Ok(request) => matches!(request.send().await, Ok(r) if r.status().is_success()),
            Err(_) => false,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(Method::POST, "/auth/login", &body).await
    }

    pub async fn whoami(&self) -> Result<UserSummary, ClientError> {
        self.get("/api/auth/whoami", &[]).await
    }

    pub async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, ClientError> {
        self.get("/api/tickets", &filter.to_query()).await
    }

    pub async fn get_ticket(&self, id: Uuid) -> Result<Ticket, ClientError> {
        self.get(&format!("/api/tickets/{}", id), &[]).await
    }

    pub async fn create_ticket(&self, req: &CreateTicketRequest) -> Result<Ticket, ClientError> {
        self.send(Method::POST, "/api/tickets", req).await
    }

    pub async fn update_ticket(&self, id: Uuid, patch: &TicketPatch) -> Result<Ticket, ClientError> {
        self.send(Method::PATCH, &format!("/api/tickets/{}", id), patch).await
    }

    pub async fn assign_ticket(&self, id: Uuid, req: &AssignRequest) -> Result<Ticket, ClientError> {
        self.send(Method::PUT, &format!("/api/tickets/{}/assign", id), req).await
    }

    pub async fn rate_ticket(&self, id: Uuid, req: &RatingRequest) -> Result<Ticket, ClientError> {
        self.send(Method::POST, &format!("/api/tickets/{}/rating", id), req).await
    }

    pub async fn suggestions(&self, id: Uuid) -> Result<TicketSuggestions, ClientError> {
        self.get(&format!("/api/tickets/{}/suggestions", id), &[]).await
    }

    pub async fn list_technicians(&self, query: &TechnicianQuery) -> Result<Vec<Technician>, ClientError> {
        let mut pairs = Vec::new();
        if let Some(include) = query.include_workload {
            pairs.push(("includeWorkload", include.to_string()));
        }
        if let Some(company_id) = query.company_id {
            pairs.push(("companyId", company_id.to_string()));
        }
        self.get("/api/technicians", &pairs).await
    }

    pub async fn set_duty(&self, id: Uuid, duty_status: DutyStatus) -> Result<Technician, ClientError> {
        self.send(Method::PUT, &format!("/api/technicians/{}/duty", id), &DutyRequest { duty_status })
            .await
    }

    pub async fn broadcast(&self, req: &BroadcastRequest) -> Result<BroadcastReceipt, ClientError> {
        self.send(Method::POST, "/api/broadcasts", req).await
    }

    pub async fn dashboard(&self, query: &CompanyQuery) -> Result<DashboardStats, ClientError> {
        let pairs: Vec<(&str, String)> = query
            .company_id
            .map(|id: CompanyId| ("companyId", id.to_string()))
            .into_iter()
            .collect();
        self.get("/api/dashboard/stats", &pairs).await
    }

    pub async fn companies(&self) -> Result<Vec<Company>, ClientError> {
        self.get("/api/companies", &[]).await
    }

    pub async fn create_company(&self, req: &CreateCompanyRequest) -> Result<Company, ClientError> {
        self.send(Method::POST, "/api/root/companies", req).await
    }
}
