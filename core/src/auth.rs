/*
    spotify-lookup-rs | Resolve artist/track and artist/album names to Spotify URIs.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use log::debug;
use rspotify::{prelude::*, AuthCodeSpotify, Config, Credentials, OAuth};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SCOPES: &str = "playlist-modify-public playlist-modify-private";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),
    #[error("Spotify authentication failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

/// Everything needed to open an authenticated Spotify session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub username: Option<String>,
    pub scopes: HashSet<String>,
    pub cache_path: PathBuf,
}

impl ClientSettings {
    /// Reads settings from the process environment.
    ///
    /// Required: `RSPOTIFY_CLIENT_ID`, `RSPOTIFY_CLIENT_SECRET`, `RSPOTIFY_REDIRECT_URI`.
    /// Optional: `SPOTIFY_USERNAME`, `SPOTIFY_SCOPE` (space separated).
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientSettings::from_env`] but with a caller-supplied lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            var(key)
                .filter(|value| !value.is_empty())
                .ok_or(AuthError::MissingVar(key))
        };

        let username = var("SPOTIFY_USERNAME").filter(|u| !u.is_empty());
        let scope = var("SPOTIFY_SCOPE").unwrap_or_else(|| DEFAULT_SCOPES.to_string());

        Ok(Self {
            client_id: required("RSPOTIFY_CLIENT_ID")?,
            client_secret: required("RSPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("RSPOTIFY_REDIRECT_URI")?,
            cache_path: token_cache_path(username.as_deref()),
            scopes: scope.split_whitespace().map(str::to_string).collect(),
            username,
        })
    }
}

/// One token cache per account, so switching users does not reuse a token.
fn token_cache_path(username: Option<&str>) -> PathBuf {
    match username {
        Some(user) => PathBuf::from(format!(".spotify_token_cache-{}.json", user)),
        None => PathBuf::from(".spotify_token_cache.json"),
    }
}

/// Opens an authenticated Spotify session using the Authorization Code Flow.
///
/// The token is cached at `settings.cache_path` and refreshed automatically.
/// When no valid cached token exists the user is prompted (via stdout) to
/// visit the authorization URL and paste the redirect back.
pub async fn connect(settings: &ClientSettings) -> Result<AuthCodeSpotify, AuthError> {
    let creds = Credentials::new(&settings.client_id, &settings.client_secret);

    let oauth = OAuth {
        redirect_uri: settings.redirect_uri.clone(),
        scopes: settings.scopes.clone(),
        ..Default::default()
    };

    let config = Config {
        token_cached: true,
        token_refreshing: true,
        cache_path: settings.cache_path.clone(),
        ..Default::default()
    };

    let spotify = AuthCodeSpotify::with_config(creds, oauth, config);

    debug!(
        "Authorizing as {} with token cache {:?}",
        settings.username.as_deref().unwrap_or("<default user>"),
        settings.cache_path
    );

    let url = spotify.get_authorize_url(false)?;
    // Reuses the cached token when present, otherwise prompts on the terminal.
    spotify.prompt_for_token(&url).await?;

    Ok(spotify)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_settings_require_credentials() {
        let env = vars(&[
            ("RSPOTIFY_CLIENT_ID", "id"),
            ("RSPOTIFY_REDIRECT_URI", "http://localhost:8888/callback"),
        ]);

        let err = ClientSettings::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, AuthError::MissingVar("RSPOTIFY_CLIENT_SECRET")));
    }

    #[test]
    fn test_settings_default_scopes_and_cache() {
        let env = vars(&[
            ("RSPOTIFY_CLIENT_ID", "id"),
            ("RSPOTIFY_CLIENT_SECRET", "secret"),
            ("RSPOTIFY_REDIRECT_URI", "http://localhost:8888/callback"),
        ]);

        let settings = ClientSettings::from_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(settings.username, None);
        assert!(settings.scopes.contains("playlist-modify-public"));
        assert!(settings.scopes.contains("playlist-modify-private"));
        assert_eq!(settings.cache_path, PathBuf::from(".spotify_token_cache.json"));
    }

    #[test]
    fn test_settings_per_user_cache_and_custom_scope() {
        let env = vars(&[
            ("RSPOTIFY_CLIENT_ID", "id"),
            ("RSPOTIFY_CLIENT_SECRET", "secret"),
            ("RSPOTIFY_REDIRECT_URI", "http://localhost:8888/callback"),
            ("SPOTIFY_USERNAME", "alice"),
            ("SPOTIFY_SCOPE", "user-library-read"),
        ]);

        let settings = ClientSettings::from_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(settings.username.as_deref(), Some("alice"));
        assert_eq!(settings.scopes.len(), 1);
        assert_eq!(
            settings.cache_path,
            PathBuf::from(".spotify_token_cache-alice.json")
        );
    }
}
