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

use crate::catalog::{Catalog, LookupError};
use crate::diagnostics::DiagnosticSink;
use crate::models::{CatalogKind, CatalogUri, NameQuery, TrackIdentifier};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};
use std::sync::Arc;

/// Only the best candidate is ever used.
const SEARCH_LIMIT: u32 = 1;

#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Where to dump raw search responses, if anywhere.
    pub diagnostics: Option<DiagnosticSink>,
    /// Searches in flight during a batch. 1 means strictly sequential.
    pub concurrency: usize,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            diagnostics: None,
            concurrency: 1,
        }
    }
}

/// Resolves artist/title pairs into catalog URIs and expands albums into tracks.
pub struct Lookup<C> {
    catalog: Arc<C>,
    options: LookupOptions,
}

impl<C: Catalog> Lookup<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_options(catalog, LookupOptions::default())
    }

    pub fn with_options(catalog: C, options: LookupOptions) -> Self {
        Self {
            catalog: Arc::new(catalog),
            options,
        }
    }

    /// Returns the URI of the best matching track, or `None` if nothing matched.
    pub async fn find_track(
        &self,
        artist: &str,
        track: &str,
    ) -> Result<Option<CatalogUri>, LookupError> {
        self.find(CatalogKind::Track, &NameQuery::new(artist, track))
            .await
    }

    /// Returns the URI of the best matching album, or `None` if nothing matched.
    pub async fn find_album(
        &self,
        artist: &str,
        album: &str,
    ) -> Result<Option<CatalogUri>, LookupError> {
        self.find(CatalogKind::Album, &NameQuery::new(artist, album))
            .await
    }

    /// Searches every query as a track. Unmatched queries are dropped; the
    /// rest keep their input order. The first failed request aborts the batch.
    pub async fn find_tracks(&self, queries: &[NameQuery]) -> Result<Vec<CatalogUri>, LookupError> {
        self.find_all(CatalogKind::Track, queries).await
    }

    /// Album counterpart of [`Lookup::find_tracks`].
    pub async fn find_albums(&self, queries: &[NameQuery]) -> Result<Vec<CatalogUri>, LookupError> {
        self.find_all(CatalogKind::Album, queries).await
    }

    /// Expands albums into their track IDs, album order first, then track order.
    pub async fn tracks_for_albums(
        &self,
        album_ids: &[CatalogUri],
    ) -> Result<Vec<TrackIdentifier>, LookupError> {
        let mut track_ids = Vec::new();

        for album in album_ids {
            let tracks = self.catalog.album_tracks(album).await?;
            track_ids.extend(tracks);
        }

        info!(
            "Collected {} track IDs from {} albums",
            track_ids.len(),
            album_ids.len()
        );
        Ok(track_ids)
    }

    async fn find(
        &self,
        kind: CatalogKind,
        query: &NameQuery,
    ) -> Result<Option<CatalogUri>, LookupError> {
        let text = query.search_text(kind);
        debug!("Searching {}: {}", kind, text);

        let page = self.catalog.search(&text, kind, SEARCH_LIMIT).await?;

        if let Some(sink) = &self.options.diagnostics {
            sink.record(&page);
        }

        let uri = page.first_uri().cloned();
        match &uri {
            Some(uri) => debug!(
                "Found {} '{}' by '{}': {}",
                kind, query.title, query.artist, uri
            ),
            None => debug!(
                "{} '{}' by '{}' not found",
                kind.label(),
                query.title,
                query.artist
            ),
        }

        Ok(uri)
    }

    async fn find_all(
        &self,
        kind: CatalogKind,
        queries: &[NameQuery],
    ) -> Result<Vec<CatalogUri>, LookupError> {
        let concurrency = self.options.concurrency.max(1);

        // `buffered` keeps output in input order regardless of completion order.
        let found: Vec<Option<CatalogUri>> = stream::iter(queries)
            .map(|query| self.find(kind, query))
            .buffered(concurrency)
            .try_collect()
            .await?;

        let uris: Vec<CatalogUri> = found.into_iter().flatten().collect();

        info!("Matched {} of {} {}s", uris.len(), queries.len(), kind);
        Ok(uris)
    }
}
