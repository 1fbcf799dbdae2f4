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

use crate::models::{CatalogItem, CatalogKind, CatalogUri, SearchPage, TrackIdentifier};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use log::debug;
use rspotify::{
    model::{AlbumId, SearchResult, SearchType},
    prelude::*,
    AuthCodeSpotify,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Spotify API error: {0}")]
    Spotify(#[from] rspotify::ClientError),
    #[error("Failed to encode search response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid Album ID: {0}")]
    InvalidAlbumId(String),
    #[error("Unexpected search result for a {0} search")]
    UnexpectedResponse(CatalogKind),
}

/// Remote music catalog: name search and album listing.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Runs one search and returns at most `limit` candidates.
    async fn search(
        &self,
        query: &str,
        kind: CatalogKind,
        limit: u32,
    ) -> Result<SearchPage, LookupError>;

    /// Lists every track of an album, in album order.
    async fn album_tracks(&self, album: &CatalogUri) -> Result<Vec<TrackIdentifier>, LookupError>;
}

/// [`Catalog`] backed by the Spotify Web API.
pub struct SpotifyCatalog {
    spotify: AuthCodeSpotify,
}

impl SpotifyCatalog {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        Self { spotify }
    }
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn search(
        &self,
        query: &str,
        kind: CatalogKind,
        limit: u32,
    ) -> Result<SearchPage, LookupError> {
        let search_type = match kind {
            CatalogKind::Track => SearchType::Track,
            CatalogKind::Album => SearchType::Album,
        };

        let result = self
            .spotify
            .search(query, search_type, None, None, Some(limit), None)
            .await?;
        let raw = serde_json::to_value(&result)?;

        let (total, items) = match result {
            SearchResult::Tracks(page) => (
                page.total,
                page.items
                    .into_iter()
                    .filter_map(|track| {
                        let id = track.id?;
                        Some(CatalogItem {
                            uri: CatalogUri::new(id.uri()),
                            id: id.id().to_string(),
                            name: track.name,
                        })
                    })
                    .collect(),
            ),
            SearchResult::Albums(page) => (
                page.total,
                page.items
                    .into_iter()
                    .filter_map(|album| {
                        let id = album.id?;
                        Some(CatalogItem {
                            uri: CatalogUri::new(id.uri()),
                            id: id.id().to_string(),
                            name: album.name,
                        })
                    })
                    .collect(),
            ),
            _ => return Err(LookupError::UnexpectedResponse(kind)),
        };

        Ok(SearchPage {
            query: query.to_string(),
            kind,
            total,
            items,
            raw,
        })
    }

    async fn album_tracks(&self, album: &CatalogUri) -> Result<Vec<TrackIdentifier>, LookupError> {
        let album_id = AlbumId::from_id_or_uri(album.as_str())
            .map_err(|_| LookupError::InvalidAlbumId(album.to_string()))?;

        let mut stream = self.spotify.album_track(album_id, None);
        let mut track_ids = Vec::new();

        while let Some(track) = stream.try_next().await? {
            // Local files carry no catalog ID.
            if let Some(id) = track.id {
                track_ids.push(TrackIdentifier::new(id.id()));
            }
        }

        debug!("Album {} has {} tracks", album, track_ids.len());
        Ok(track_ids)
    }
}
