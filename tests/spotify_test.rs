//! Tests for the Spotify-facing pipeline against mock servers.

use indicatif::ProgressBar;
use reqwest::Client;
use serde_json::json;
use workoutmix::config::Config;
use workoutmix::error::{EnrichmentFailure, PlaylistError};
use workoutmix::management::{PlaylistStore, TokenManager, import_playlist_by_name};
use workoutmix::spotify::auth::basic_auth_value;
use workoutmix::spotify::{Paginator, SpotifyClient, pagination::fetch_all, playlists};
use workoutmix::types::{Mood, PlaylistSummary, TrackStub};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    Config::new("client-id", "client-secret", "refresh-secret")
        .with_api_url(server.uri())
        .with_token_url(format!("{}/api/token", server.uri()))
}

async fn mount_token(server: &MockServer, expires_in: i64, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "token_type": "Bearer",
            "expires_in": expires_in
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_features(server: &MockServer, id: &str, tempo: f64, energy: f64, valence: f64) {
    Mock::given(method("GET"))
        .and(path(format!("/audio-features/{}", id)))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "tempo": tempo,
            "energy": energy,
            "valence": valence
        })))
        .mount(server)
        .await;
}

// =============================================================================
// Token Manager Tests
// =============================================================================

mod token_manager {
    use super::*;

    #[tokio::test]
    async fn test_refresh_sends_basic_auth_and_refresh_grant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header(
                "authorization",
                basic_auth_value("client-id", "client-secret").as_str(),
            ))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access-1",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenManager::new(Client::new(), &test_config(&server));
        let token = tokens.ensure_valid().await.unwrap();
        assert_eq!(token, "access-1");

        let credential = tokens.current().await.unwrap();
        assert!(!credential.is_expired());
    }

    #[test]
    fn test_basic_auth_value() {
        // base64("client-id:client-secret")
        assert_eq!(
            basic_auth_value("client-id", "client-secret"),
            "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ="
        );
    }

    #[tokio::test]
    async fn test_no_refresh_before_expiry() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        let tokens = TokenManager::new(Client::new(), &test_config(&server));
        assert_eq!(tokens.ensure_valid().await.unwrap(), "access-1");
        assert_eq!(tokens.ensure_valid().await.unwrap(), "access-1");
    }

    #[tokio::test]
    async fn test_refresh_after_expiry() {
        let server = MockServer::start().await;
        // 60 seconds equals the safety margin, so the token is expired on arrival
        mount_token(&server, 60, 2).await;

        let tokens = TokenManager::new(Client::new(), &test_config(&server));
        tokens.ensure_valid().await.unwrap();
        tokens.ensure_valid().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        let tokens = TokenManager::new(Client::new(), &test_config(&server));
        let (a, b) = tokio::join!(tokens.ensure_valid(), tokens.ensure_valid());
        assert_eq!(a.unwrap(), "access-1");
        assert_eq!(b.unwrap(), "access-1");
    }

    #[tokio::test]
    async fn test_rejected_exchange_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenManager::new(Client::new(), &test_config(&server));
        match tokens.ensure_valid().await {
            Err(PlaylistError::Auth { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("Expected Auth error, got: {:?}", other),
        }
        assert!(tokens.current().await.is_none());
    }

    #[tokio::test]
    async fn test_success_without_access_token_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "expires_in": 3600 })))
            .mount(&server)
            .await;

        let tokens = TokenManager::new(Client::new(), &test_config(&server));
        let err = tokens.ensure_valid().await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_unrepresentable_expiry_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "a",
                "expires_in": 10_000_000_000_000i64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenManager::new(Client::new(), &test_config(&server));
        let err = tokens.ensure_valid().await.unwrap_err();
        assert!(err.is_auth());
        assert!(tokens.current().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_attempts_are_configurable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(3)
            .mount(&server)
            .await;

        let config = test_config(&server).with_refresh_attempts(3);
        let tokens = TokenManager::new(Client::new(), &config);
        assert!(tokens.refresh().await.unwrap_err().is_auth());
    }
}

// =============================================================================
// Pagination Tests
// =============================================================================

mod pagination {
    use super::*;

    async fn mount_pages(server: &MockServer) {
        let pages = [
            ("/pages/1", json!(["a", "b"]), Some("/pages/2")),
            ("/pages/2", json!(["c"]), Some("/pages/3")),
            ("/pages/3", json!(["d", "e"]), Some("/pages/4")),
            ("/pages/4", json!([]), None),
        ];

        for (page_path, items, next) in pages {
            let next = next.map(|n| format!("{}{}", server.uri(), n));
            Mock::given(method("GET"))
                .and(path(page_path))
                .and(header("authorization", "Bearer access-1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": items,
                    "next": next
                })))
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn test_walks_all_pages_in_order() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;
        mount_pages(&server).await;

        let client = Client::new();
        let tokens = TokenManager::new(client.clone(), &test_config(&server));
        let start = format!("{}/pages/1", server.uri());

        let items: Vec<String> = fetch_all(&client, &tokens, &start, None).await.unwrap();
        assert_eq!(items, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_is_lazy_and_restartable() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;
        mount_pages(&server).await;

        let client = Client::new();
        let tokens = TokenManager::new(client.clone(), &test_config(&server));
        let start = format!("{}/pages/1", server.uri());

        let mut pages: Paginator<String> = Paginator::new(&client, &tokens, start);
        assert_eq!(pages.pages_fetched(), 0);
        assert!(server.received_requests().await.unwrap().is_empty());

        assert_eq!(pages.next_page().await.unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(pages.pages_fetched(), 1);

        pages.restart();
        let items = pages.collect_all().await.unwrap();
        assert_eq!(items, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(pages.pages_fetched(), 4);
        assert_eq!(pages.next_page().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_max_pages_bounds_the_walk() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;
        mount_pages(&server).await;

        let client = Client::new();
        let tokens = TokenManager::new(client.clone(), &test_config(&server));
        let start = format!("{}/pages/1", server.uri());

        let items: Vec<String> = fetch_all(&client, &tokens, &start, Some(2)).await.unwrap();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failed_page_aborts_walk() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        Mock::given(method("GET"))
            .and(path("/pages/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": ["a"],
                "next": format!("{}/pages/2", server.uri())
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pages/2"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let client = Client::new();
        let tokens = TokenManager::new(client.clone(), &test_config(&server));
        let start = format!("{}/pages/1", server.uri());

        let result: Result<Vec<String>, _> = fetch_all(&client, &tokens, &start, None).await;
        match result {
            Err(PlaylistError::Fetch { url, status, body }) => {
                assert!(url.ends_with("/pages/2"));
                assert_eq!(status, 404);
                assert_eq!(body, "Not found");
            }
            other => panic!("Expected Fetch error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_expiring_mid_walk_is_refreshed() {
        let server = MockServer::start().await;
        mount_token(&server, 60, 4).await;
        mount_pages(&server).await;

        let client = Client::new();
        let tokens = TokenManager::new(client.clone(), &test_config(&server));
        let start = format!("{}/pages/1", server.uri());

        let items: Vec<String> = fetch_all(&client, &tokens, &start, None).await.unwrap();
        assert_eq!(items.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_next_ends_walk() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        Mock::given(method("GET"))
            .and(path("/pages/1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "items": [1, 2], "next": "" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let tokens = TokenManager::new(client.clone(), &test_config(&server));
        let start = format!("{}/pages/1", server.uri());

        let items: Vec<u32> = fetch_all(&client, &tokens, &start, None).await.unwrap();
        assert_eq!(items, vec![1, 2]);
    }
}

// =============================================================================
// Playlist Lookup Tests
// =============================================================================

mod lookup {
    use super::*;

    #[tokio::test]
    async fn test_lists_playlists_across_pages() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "p1", "name": "Chill Vibes" }],
                "next": format!("{}/me/playlists/more", server.uri())
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me/playlists/more"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "p2", "name": "Morning Run" }],
                "next": null
            })))
            .mount(&server)
            .await;

        let client = SpotifyClient::new(&test_config(&server));
        let found = playlists::list_playlists(&client).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|p: &PlaylistSummary| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);

        let id = playlists::find_playlist_id_by_name(&client, "morning run")
            .await
            .unwrap();
        assert_eq!(id, "p2");
    }

    #[tokio::test]
    async fn test_no_playlists_is_not_found() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "items": [], "next": null })),
            )
            .mount(&server)
            .await;

        let client = SpotifyClient::new(&test_config(&server));
        match playlists::find_playlist_id_by_name(&client, "Gym").await {
            Err(PlaylistError::NotFound(name)) => assert_eq!(name, "Gym"),
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_track_stubs_skip_missing_tracks() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        Mock::given(method("GET"))
            .and(path("/playlists/p1/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "track": { "id": "t1", "name": "One", "artists": [{ "name": "A" }] } },
                    { "track": null },
                    { "track": { "id": null, "name": "Local", "artists": [] } },
                    { "track": { "id": "t2", "name": "Two", "artists": [{ "name": "B" }] } }
                ],
                "next": null
            })))
            .mount(&server)
            .await;

        let client = SpotifyClient::new(&test_config(&server));
        let stubs = playlists::playlist_track_stubs(&client, "p1").await.unwrap();
        assert_eq!(
            stubs,
            vec![
                TrackStub::new("t1", "One", "A"),
                TrackStub::new("t2", "Two", "B")
            ]
        );
    }
}

// =============================================================================
// Import Tests
// =============================================================================

mod import {
    use super::*;

    #[tokio::test]
    async fn test_failed_enrichment_skips_only_that_track() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        mount_features(&server, "t1", 130.0, 0.8, 0.5).await;
        Mock::given(method("GET"))
            .and(path("/audio-features/t2"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;
        mount_features(&server, "t3", 90.0, 0.3, 0.2).await;
        Mock::given(method("GET"))
            .and(path("/audio-features/t4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tempo": 120.0 })))
            .mount(&server)
            .await;
        mount_features(&server, "t5", 110.0, 0.6, 0.7).await;

        let stubs: Vec<TrackStub> = (1..=5)
            .map(|i| TrackStub::new(format!("t{}", i), format!("Song {}", i), "Artist"))
            .collect();

        let client = SpotifyClient::new(&test_config(&server));
        let mut store = PlaylistStore::new();
        let report = store
            .import_batch(stubs, &client, &client.enricher(), &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(report.imported, 3);
        assert_eq!(store.count(), 3);

        let ids: Vec<&str> = store.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3", "t5"]);

        let moods: Vec<Mood> = store.tracks().iter().map(|t| t.mood).collect();
        assert_eq!(moods, vec![Mood::Energetic, Mood::Relaxed, Mood::Focused]);

        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].track_id, "t2");
        assert!(matches!(
            report.skipped[0].reason,
            EnrichmentFailure::Status { status: 404, .. }
        ));
        assert_eq!(report.skipped[1].track_id, "t4");
        assert!(matches!(
            report.skipped[1].reason,
            EnrichmentFailure::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_auth_failure_during_import_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad client"))
            .mount(&server)
            .await;

        let client = SpotifyClient::new(&test_config(&server));
        let mut store = PlaylistStore::new();
        let result = store
            .import_batch(
                vec![TrackStub::new("t1", "Song", "Artist")],
                &client,
                &client.enricher(),
                &ProgressBar::hidden(),
            )
            .await;

        assert!(result.unwrap_err().is_auth());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_query() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        Mock::given(method("GET"))
            .and(path("/me/playlists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": "p1", "name": "Chill Vibes" },
                    { "id": "p2", "name": "Gym Bangers" }
                ],
                "next": null
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/playlists/p2/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "track": { "id": "t1", "name": "Fast", "artists": [{ "name": "A" }] } },
                    { "track": { "id": "t2", "name": "Slow", "artists": [{ "name": "B" }] } },
                    { "track": { "id": "t3", "name": "Faster", "artists": [{ "name": "C" }] } }
                ],
                "next": null
            })))
            .mount(&server)
            .await;
        mount_features(&server, "t1", 130.0, 0.75, 0.5).await;
        mount_features(&server, "t2", 90.0, 0.3, 0.3).await;
        mount_features(&server, "t3", 145.4, 0.9, 0.8).await;

        let client = SpotifyClient::new(&test_config(&server));
        let (store, report) = import_playlist_by_name(&client, "Gym Banger", &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(report.imported, 3);
        assert!(report.skipped.is_empty());

        let cardio = store.query("Cardio", "energetic");
        let titles: Vec<&str> = cardio.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Fast", "Faster"]);
        assert_eq!(cardio[1].tempo, 145);

        let yoga = store.query("yoga", "relaxed");
        assert_eq!(yoga.len(), 1);
        assert_eq!(yoga[0].artist, "B");
    }
}
