// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Outbound HTTP against a mock server: valuation feed, names, version

use hexapi::feed::FeedSource;
use hexapi::names::{HttpNameLookup, NameLookup};
use hexapi::version::{self, VersionStatus, CURRENT_VERSION};
use hexapi::Error;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote(server: &MockServer, route: &str) -> FeedSource {
    FeedSource::Remote {
        client: reqwest::Client::new(),
        url: format!("{}{}", server.uri(), route),
    }
}

#[tokio::test]
async fn test_remote_feed_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hex/all_prices.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"cards":[{"identity":"a","name":"Lixil","platinum":2},
                         {"identity":"draftpak-0000-0000-0000-000000000000","platinum":100,"kind":"item"}]}"#,
        ))
        .mount(&server)
        .await;

    let feed = remote(&server, "/hex/all_prices.json").fetch_required(100).await.unwrap();
    assert_eq!(feed.entries.len(), 2);
    assert_eq!(feed.entries[0].valuation.gold, 200);
    assert_eq!(feed.pack_cost(), Some(100));
}

#[tokio::test]
async fn test_cold_start_without_prices_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = remote(&server, "/hex/all_prices.json");
    assert!(matches!(source.fetch(100).await, Err(Error::Http(_))));
    assert!(matches!(source.fetch_required(100).await, Err(Error::NoPriceData(_))));
}

#[tokio::test]
async fn test_name_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/names/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name":"Adamanthian Scrivener"}"#))
        .mount(&server)
        .await;

    let lookup = HttpNameLookup::new(reqwest::Client::new(), format!("{}/names/", server.uri()));
    assert_eq!(lookup.lookup("abc").await.unwrap(), "Adamanthian Scrivener");
    assert!(lookup.lookup("unknown").await.is_err());
}

#[tokio::test]
async fn test_version_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{CURRENT_VERSION}\n")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("99.0.0"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let current = version::check(&client, &format!("{}/current.txt", server.uri())).await.unwrap();
    assert_eq!(current, VersionStatus::UpToDate);

    let next = version::check(&client, &format!("{}/next.txt", server.uri())).await.unwrap();
    assert!(matches!(next, VersionStatus::Outdated { latest, .. } if latest == "99.0.0"));
}
