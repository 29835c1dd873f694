use anyhow::{anyhow, Context};
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use hr_shared::{
    const_config::{
        client::CLIENT_DEFAULT_API_BASE_URL,
        path::{PathSpec, PATH_AUTH_LOGIN, PATH_AUTH_ME},
    },
    errors::NotLoggedInError,
    req_args::LoginReqArgs,
    token::AuthToken,
    uac::{LoginResponse, User},
};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret as _;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub const NO_ARGUMENTS: &[(&str, &str)] = &[];

/// REST client for the HR API
///
/// Cheap to clone, clones share the default credential. While a token is set
/// every request carries it as a bearer authorization header.
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    inner: Arc<Mutex<ClientInner>>,
}

#[derive(Debug)]
struct ClientInner {
    base_url: String,
    bearer_token: Option<AuthToken>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(CLIENT_DEFAULT_API_BASE_URL.to_string())
    }
}

impl Client {
    #[tracing::instrument(name = "NEW API CLIENT")]
    pub fn new(base_url: String) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            api_client,
            inner: Arc::new(Mutex::new(ClientInner {
                base_url,
                bearer_token: None,
            })),
        }
    }

    pub fn base_url(&self) -> String {
        self.inner.lock().expect("mutex poisoned").base_url.clone()
    }

    /// Makes `token` the default credential for all following requests
    pub fn set_bearer_token(&self, token: AuthToken) {
        self.inner.lock().expect("mutex poisoned").bearer_token = Some(token);
        debug!("bearer token set");
    }

    pub fn clear_bearer_token(&self) {
        self.inner.lock().expect("mutex poisoned").bearer_token = None;
        debug!("bearer token cleared");
    }

    pub fn has_bearer_token(&self) -> bool {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .bearer_token
            .is_some()
    }

    /// Exchanges credentials for a user and token. Does not change the
    /// default credential, that happens when the session logs in.
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<LoginResponse>> {
        let args = serde_json::json!({
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        self.send_request_expect_json(PATH_AUTH_LOGIN, &args, ui_notify)
    }

    /// Fetches the user the current token belongs to
    ///
    /// Fails with [`NotLoggedInError`] if the API rejects the token.
    #[tracing::instrument(skip(ui_notify))]
    pub fn current_user<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<User>> {
        self.send_request_expect_json(PATH_AUTH_ME, &NO_ARGUMENTS, ui_notify)
    }

    // WARNING: Must not log args as it may contain sensitive info and "safe"
    // versions would usually already be logged by the caller
    fn build_request<T>(&self, path_spec: PathSpec, args: &T) -> reqwest::RequestBuilder
    where
        T: serde::Serialize + Debug,
    {
        let is_get_method = path_spec.method == Method::GET;
        let (url, bearer_token) = {
            let inner = self.inner.lock().expect("mutex poisoned");
            (
                format!("{}{}", inner.base_url, path_spec.path),
                inner.bearer_token.clone(),
            )
        };
        let mut request = self.api_client.request(path_spec.method, url);
        request = if is_get_method {
            request.query(&args)
        } else {
            request.json(&args)
        };
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token.expose());
        }
        request
    }

    #[tracing::instrument(skip(args, on_done))]
    fn initiate_request<T, F, O>(&self, path_spec: PathSpec, args: &T, on_done: F)
    where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        reqwest_cross::fetch(self.build_request(path_spec, args), on_done)
    }

    fn send_request_expect_json<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<anyhow::Result<U>>
    where
        T: serde::Serialize + std::fmt::Debug,
        F: UiCallBack,
        U: Send + std::fmt::Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_json_body(resp).await;
            if tx.send(msg).is_err() {
                // Receiver dropped, nobody is waiting for this response anymore
                debug!("response discarded");
            }
            ui_notify();
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(response: reqwest::Result<reqwest::Response>) -> anyhow::Result<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    match status {
        StatusCode::OK => Ok(response
            .json()
            .await
            .context("failed to parse result as json")?),
        StatusCode::UNAUTHORIZED => Err(NotLoggedInError.into()),
        _ => Err(handle_error(response).await),
    }
}

#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    debug_assert!(
        status != StatusCode::OK,
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let Ok(body) = response.text().await else {
        return anyhow!("failed to get response body");
    };
    if body.is_empty() {
        anyhow!("request failed with status code: {status} and no body")
    } else {
        anyhow!("{body}")
    }
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> anyhow::Result<(reqwest::Response, StatusCode)> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response.context("failed to send request")?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}

#[cfg(test)]
mod tests {
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    use super::*;

    #[test]
    fn bearer_header_follows_token() {
        // Arrange
        let client = Client::new("http://localhost:5001/api/".to_string());
        let authorization = |client: &Client| {
            client
                .build_request(PATH_AUTH_ME, &NO_ARGUMENTS)
                .build()
                .unwrap()
                .headers()
                .get(AUTHORIZATION)
                .map(|x| x.to_str().unwrap().to_string())
        };

        // Act / Assert
        assert_eq!(authorization(&client), None);
        client.set_bearer_token(AuthToken::try_from("tok123").unwrap());
        assert_eq!(authorization(&client).as_deref(), Some("Bearer tok123"));
        client.clear_bearer_token();
        assert_eq!(authorization(&client), None);
    }

    #[test]
    fn clones_share_credential() {
        let client = Client::default();
        let clone = client.clone();
        client.set_bearer_token(AuthToken::try_from("abc").unwrap());
        assert!(clone.has_bearer_token());
    }

    #[test]
    fn url_joins_base_and_path() {
        // Arrange
        let client = Client::new("http://localhost:5001/api/".to_string());

        // Act
        let request = client
            .build_request(PATH_AUTH_ME, &NO_ARGUMENTS)
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url(), "http://localhost:5001/api");
        assert_eq!(request.url().path(), "/api/auth/me");
        assert_eq!(request.method(), Method::GET);
    }

    #[test]
    fn login_is_json_post() {
        // Arrange
        let client = Client::default();
        let args = serde_json::json!({"email": "a@b.c", "password": "secret"});

        // Act
        let request = client
            .build_request(PATH_AUTH_LOGIN, &args)
            .build()
            .unwrap();

        // Assert
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().path(), "/api/auth/login");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
