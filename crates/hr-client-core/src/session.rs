//! Authenticated-identity state of the client and its persistence

use hr_shared::{
    const_config::storage::STORAGE_AUTH_STATE_KEY,
    log_err_as_warn,
    token::AuthToken,
    uac::{Role, User},
};
use hr_time::Timestamp;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::{
    routes::{is_login_path, normalize_path},
    storage::SessionStorage,
    Client,
};

/// In memory session
///
/// Being logged in and having both a user and a token are the same thing by
/// construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(AuthenticatedSession),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedSession {
    pub user: User,
    pub token: AuthToken,
    pub last_screen: Option<LastScreen>,
}

/// Most recent screen visited while logged in. Never the login screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastScreen {
    pub path: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_screen_data"
    )]
    pub data: Option<ScreenData>,
    pub timestamp: Timestamp,
}

/// View state a screen wants back when the user returns to it
///
/// Fields the screens commonly use are typed, anything else is kept in
/// `extra` unchanged. A value that does not fit its typed field is kept in
/// `extra` instead of being rejected. On the wire the typed fields win over
/// `extra` entries with the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenData {
    pub filters: Option<serde_json::Map<String, serde_json::Value>>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub selected_items: Option<Vec<String>>,
    pub pagination: Option<Pagination>,
    pub scroll_position: Option<f64>,
    pub tab_index: Option<u32>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScreenData {
    const FILTERS: &'static str = "filters";
    const SORT_BY: &'static str = "sortBy";
    const SORT_ORDER: &'static str = "sortOrder";
    const SELECTED_ITEMS: &'static str = "selectedItems";
    const PAGINATION: &'static str = "pagination";
    const SCROLL_POSITION: &'static str = "scrollPosition";
    const TAB_INDEX: &'static str = "tabIndex";

    fn from_map(mut map: serde_json::Map<String, serde_json::Value>) -> Self {
        fn take<T: DeserializeOwned>(
            map: &mut serde_json::Map<String, serde_json::Value>,
            key: &str,
        ) -> Option<T> {
            let value = map.remove(key)?;
            match serde_json::from_value(value.clone()) {
                Ok(x) => Some(x),
                Err(err) => {
                    debug!(key, ?err, "screen data kept untyped");
                    map.insert(key.to_string(), value);
                    None
                }
            }
        }
        Self {
            filters: take(&mut map, Self::FILTERS),
            sort_by: take(&mut map, Self::SORT_BY),
            sort_order: take(&mut map, Self::SORT_ORDER),
            selected_items: take(&mut map, Self::SELECTED_ITEMS),
            pagination: take(&mut map, Self::PAGINATION),
            scroll_position: take(&mut map, Self::SCROLL_POSITION),
            tab_index: take(&mut map, Self::TAB_INDEX),
            extra: map,
        }
    }

    fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        fn put<T: Serialize>(
            map: &mut serde_json::Map<String, serde_json::Value>,
            key: &str,
            value: &Option<T>,
        ) {
            let Some(value) = value else {
                return;
            };
            match serde_json::to_value(value) {
                Ok(value) => {
                    map.insert(key.to_string(), value);
                }
                Err(err) => warn!(key, ?err, "screen data field not saved"),
            }
        }
        let mut result = self.extra.clone();
        put(&mut result, Self::FILTERS, &self.filters);
        put(&mut result, Self::SORT_BY, &self.sort_by);
        put(&mut result, Self::SORT_ORDER, &self.sort_order);
        put(&mut result, Self::SELECTED_ITEMS, &self.selected_items);
        put(&mut result, Self::PAGINATION, &self.pagination);
        put(&mut result, Self::SCROLL_POSITION, &self.scroll_position);
        put(&mut result, Self::TAB_INDEX, &self.tab_index);
        result
    }
}

impl Serialize for ScreenData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScreenData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// Screen data that is not an object is dropped rather than failing the
/// whole session
fn lenient_screen_data<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ScreenData>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Object(map)) => Some(ScreenData::from_map(map)),
        None => None,
        Some(other) => {
            warn!(?other, "screen data is not an object, dropped");
            None
        }
    })
}

/// A last screen that cannot be read is dropped, the session itself is kept
fn lenient_last_screen<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<LastScreen>, D::Error> {
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(x) => Ok(Some(x)),
        Err(err) => {
            warn!(?err, "persisted last screen is malformed, dropped");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

/// Shape of the session in durable storage
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    is_authenticated: bool,
    user: Option<User>,
    token: Option<AuthToken>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_last_screen"
    )]
    last_screen: Option<LastScreen>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }

    pub fn authenticated(&self) -> Option<&AuthenticatedSession> {
        match self {
            Self::LoggedOut => None,
            Self::LoggedIn(auth) => Some(auth),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.authenticated().map(|x| &x.user)
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.authenticated().map(|x| &x.token)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|x| x.role)
    }

    pub fn last_screen(&self) -> Option<&LastScreen> {
        self.authenticated().and_then(|x| x.last_screen.as_ref())
    }

    fn to_snapshot(&self) -> SessionSnapshot {
        match self {
            Session::LoggedOut => SessionSnapshot {
                is_authenticated: false,
                user: None,
                token: None,
                last_screen: None,
            },
            Session::LoggedIn(auth) => SessionSnapshot {
                is_authenticated: true,
                user: Some(auth.user.clone()),
                token: Some(auth.token.clone()),
                last_screen: auth.last_screen.clone(),
            },
        }
    }

    /// Parses a persisted value. Anything that does not describe a complete
    /// logged in session is `None`.
    pub fn from_persisted(value: &str) -> Option<Self> {
        let snapshot: SessionSnapshot = match serde_json::from_str(value) {
            Ok(x) => x,
            Err(err) => {
                warn!(?err, "persisted session is malformed");
                return None;
            }
        };
        let SessionSnapshot {
            is_authenticated: true,
            user: Some(user),
            token: Some(token),
            last_screen,
        } = snapshot
        else {
            info!("persisted session is not a logged in session");
            return None;
        };
        let last_screen = last_screen.filter(|x| !is_login_path(&x.path));
        Some(Self::LoggedIn(AuthenticatedSession {
            user,
            token,
            last_screen,
        }))
    }

    pub fn to_persisted(&self) -> String {
        serde_json::to_string(&self.to_snapshot())
            .expect("snapshot only contains types that always serialize")
    }
}

impl LastScreen {
    pub fn new(path: String, data: Option<ScreenData>) -> Self {
        Self {
            path,
            data,
            timestamp: Timestamp::now(),
        }
    }
}

/// Single source of truth for the session, mirrored to durable storage
///
/// Also keeps the default credential of the API client in sync with the
/// session.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    session: Session,
    api_client: Client,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Starts logged out. Nothing is read from storage until
    /// [`Self::restore`] is called.
    pub fn new(storage: S, api_client: Client) -> Self {
        Self {
            storage,
            session: Session::LoggedOut,
            api_client,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api_client(&self) -> &Client {
        &self.api_client
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The last screen survives only if the same user logs in again
    #[tracing::instrument(skip(self, token), fields(user_id = %user.id, role = %user.role))]
    pub fn login(&mut self, user: User, token: AuthToken) {
        self.api_client.set_bearer_token(token.clone());
        let last_screen = match std::mem::take(&mut self.session) {
            Session::LoggedIn(previous) if previous.user.id == user.id => previous.last_screen,
            Session::LoggedIn(_) | Session::LoggedOut => None,
        };
        self.session = Session::LoggedIn(AuthenticatedSession {
            user,
            token,
            last_screen,
        });
        self.persist();
    }

    /// Safe to call when already logged out
    #[tracing::instrument(skip(self))]
    pub fn logout(&mut self) {
        self.api_client.clear_bearer_token();
        self.session = Session::LoggedOut;
        log_err_as_warn!(self.storage.remove(STORAGE_AUTH_STATE_KEY));
    }

    /// Saves `path` (and the screen's state) as the screen to return to.
    ///
    /// Ignored when logged out or for the login screen. Returns `true` if the
    /// screen was recorded.
    #[tracing::instrument(skip(self, data))]
    pub fn record_screen(&mut self, path: &str, data: Option<ScreenData>) -> bool {
        if is_login_path(path) {
            return false;
        }
        let path = normalize_path(path);
        let Session::LoggedIn(auth) = &mut self.session else {
            return false;
        };
        auth.last_screen = Some(LastScreen::new(path, data));
        self.persist();
        true
    }

    /// Records a visit to `path` without knowing the screen's state
    ///
    /// If `path` is already the last screen its saved data is kept so the
    /// screen can pick it up again.
    pub fn touch_screen(&mut self, path: &str) -> bool {
        let data = self.saved_screen_data(path).cloned();
        self.record_screen(path, data)
    }

    /// The saved state for `path`, only if it was the last screen visited
    pub fn saved_screen_data(&self, path: &str) -> Option<&ScreenData> {
        let last_screen = self.session.last_screen()?;
        if last_screen.path == normalize_path(path) {
            last_screen.data.as_ref()
        } else {
            None
        }
    }

    /// Reads the persisted session. Missing, unreadable or malformed values
    /// are all treated as no session.
    pub fn load_persisted(&self) -> Option<Session> {
        let value = match self.storage.get(STORAGE_AUTH_STATE_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(err) => {
                warn!(?err, "failed to read persisted session");
                return None;
            }
        };
        Session::from_persisted(&value)
    }

    /// Replaces the in memory session without writing it back
    pub(crate) fn adopt(&mut self, session: Session) {
        match session.token() {
            Some(token) => self.api_client.set_bearer_token(token.clone()),
            None => self.api_client.clear_bearer_token(),
        }
        self.session = session;
    }

    fn persist(&mut self) {
        let value = self.session.to_persisted();
        log_err_as_warn!(self.storage.set(STORAGE_AUTH_STATE_KEY, &value));
    }
}
