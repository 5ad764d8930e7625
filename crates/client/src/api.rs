//! Typed HTTP client for the Plexus REST API.
//!
//! Wraps every endpoint using [`reqwest`]. The underlying client keeps a
//! cookie store, so the session cookie issued at signup/login is replayed on
//! `/auth/me` and `/auth/logout`. CRUD calls send the bearer token.

use plexus_core::layout::LayoutPayload;
use plexus_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;
use crate::models::{
    AuthResponse, CreateDashboard, Dashboard, DashboardWithWidgets, HealthStatus, LayoutDocument,
    MeResponse, MessageResponse, ResolvedDashboard, User, Widget, WidgetInput,
};
use crate::session::{ClientSession, SessionStore};

/// HTTP client for one Plexus API server.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:4000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create a client and pick up the token remembered by `session`.
    pub fn from_session<S: SessionStore>(
        base_url: impl Into<String>,
        session: &ClientSession<S>,
    ) -> Result<Self, ClientError> {
        let mut client = Self::new(base_url)?;
        client.token = session.token()?;
        Ok(client)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    // ---- health / auth ----

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.client.get(self.url("/health")).send().await?;
        Self::parse_response(response).await
    }

    /// Register a new account. The returned token is kept for later calls.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = Self::parse_response(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Log in. The returned token is kept for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = Self::parse_response(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// The user owning the current session cookie.
    pub async fn me(&self) -> Result<User, ClientError> {
        let response = self.client.get(self.url("/api/auth/me")).send().await?;
        let me: MeResponse = Self::parse_response(response).await?;
        Ok(me.user)
    }

    /// End the server session and forget the token.
    pub async fn logout(&mut self) -> Result<String, ClientError> {
        let response = self.client.post(self.url("/api/auth/logout")).send().await?;
        let body: MessageResponse = Self::parse_response(response).await?;
        self.token = None;
        Ok(body.message)
    }

    // ---- widgets ----

    pub async fn list_widgets(&self) -> Result<Vec<Widget>, ClientError> {
        self.get("/api/widgets").await
    }

    pub async fn create_widget(&self, input: &WidgetInput) -> Result<Widget, ClientError> {
        let response = self
            .authorized(self.client.post(self.url("/api/widgets")))?
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Replace a widget. Fields left `None` are cleared on the server.
    pub async fn update_widget(&self, id: DbId, input: &WidgetInput) -> Result<Widget, ClientError> {
        let response = self
            .authorized(self.client.put(self.url(&format!("/api/widgets/{id}"))))?
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn delete_widget(&self, id: DbId) -> Result<Widget, ClientError> {
        self.delete(&format!("/api/widgets/{id}")).await
    }

    // ---- dashboards ----

    pub async fn list_dashboards(&self) -> Result<Vec<DashboardWithWidgets>, ClientError> {
        self.get("/api/dashboards").await
    }

    pub async fn create_dashboard(
        &self,
        name: &str,
        widget_ids: &[DbId],
    ) -> Result<Dashboard, ClientError> {
        let response = self
            .authorized(self.client.post(self.url("/api/dashboards")))?
            .json(&CreateDashboard { name, widget_ids })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn delete_dashboard(&self, id: DbId) -> Result<Dashboard, ClientError> {
        self.delete(&format!("/api/dashboards/{id}")).await
    }

    /// Live widgets of a dashboard, ascending id.
    pub async fn dashboard_widgets(&self, id: DbId) -> Result<Vec<Widget>, ClientError> {
        self.get(&format!("/api/dashboards/{id}/widgets")).await
    }

    // ---- layouts ----

    /// The stored layout document. A dashboard without one yields a 404
    /// [`ClientError::Api`].
    pub async fn get_layout(&self, dashboard_id: DbId) -> Result<LayoutDocument, ClientError> {
        self.get(&format!("/api/dashboards/{dashboard_id}/layout"))
            .await
    }

    pub async fn save_layout(
        &self,
        dashboard_id: DbId,
        layout: &LayoutPayload,
    ) -> Result<LayoutDocument, ClientError> {
        let body = serde_json::json!({ "layout": layout });
        let response = self
            .authorized(
                self.client
                    .post(self.url(&format!("/api/dashboards/{dashboard_id}/layout"))),
            )?
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Server-side resolution of a dashboard into render descriptors.
    pub async fn resolved(&self, dashboard_id: DbId) -> Result<ResolvedDashboard, ClientError> {
        self.get(&format!("/api/dashboards/{dashboard_id}/resolved"))
            .await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .authorized(self.client.get(self.url(path)))?
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .authorized(self.client.delete(self.url(path)))?
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Return the response unchanged on a 2xx status, or a
    /// [`ClientError::Api`] carrying the server's message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

fn api_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string());
    ClientError::Api { status, message }
}
