use claims::{assert_err, assert_ok};
use lib_config::config::configuration::CatalogSettings;
use library_service::catalog::{CatalogClient, CatalogError, RawgClient};
use mockito::{Matcher, Server};
use serde_json::json;

fn client_for(server: &Server) -> RawgClient {
    let settings = CatalogSettings {
        base_url: server.url(),
        api_key: "test-key".into(),
        timeout_secs: 5,
    };
    RawgClient::new(&settings).expect("Failed to build client")
}

fn halo_body() -> String {
    json!({
        "id": 343,
        "slug": "halo-3",
        "name": "Halo 3",
        "released": "2007-09-25",
        "rating": 4.4,
        "metacritic": 94,
        "genres": [{ "id": 4, "name": "Action" }],
        "platforms": [{ "platform": { "id": 14, "name": "Xbox 360" } }],
        "esrb_rating": { "id": 4, "name": "Mature" }
    })
    .to_string()
}

#[tokio::test]
async fn a_game_is_fetched_by_id_with_the_api_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/games/343")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(halo_body())
        .create_async()
        .await;

    let game = assert_ok!(client_for(&server).fetch_by_id(343).await);

    mock.assert_async().await;
    assert_eq!(game.slug, "halo-3");
    assert!(game.has_genre("Action"));
    assert!(game.extra.contains_key("esrb_rating"));
}

#[tokio::test]
async fn a_game_is_fetched_by_slug() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/games/halo-3")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(halo_body())
        .create_async()
        .await;

    let game = assert_ok!(client_for(&server).fetch_by_slug("halo-3").await);

    mock.assert_async().await;
    assert_eq!(game.id, 343);
}

#[tokio::test]
async fn a_missing_game_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/games/no-such-game")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"detail":"Not found."}"#)
        .create_async()
        .await;

    let err = assert_err!(client_for(&server).fetch_by_slug("no-such-game").await);
    assert!(matches!(err, CatalogError::NotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn server_errors_carry_the_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/games/343")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let err = assert_err!(client_for(&server).fetch_by_id(343).await);
    match err {
        CatalogError::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("Expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn a_malformed_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/games/343")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = assert_err!(client_for(&server).fetch_by_id(343).await);
    assert!(matches!(err, CatalogError::Decode(_)), "{:?}", err);
}

#[tokio::test]
async fn search_pages_through_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/games")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "test-key".into()),
            Matcher::UrlEncoded("search".into(), "halo".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("page_size".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "count": 21,
                "next": null,
                "previous": "https://api.rawg.io/api/games?page=1",
                "results": [serde_json::from_str::<serde_json::Value>(&halo_body()).unwrap()]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = assert_ok!(client_for(&server).search_games("halo", 2).await);

    mock.assert_async().await;
    assert_eq!(page.count, 21);
    assert_eq!(page.results.len(), 1);
    assert!(page.next.is_none());
}

#[tokio::test]
async fn listings_use_their_ordering() {
    let mut server = Server::new_async().await;
    let empty_page = json!({ "count": 0, "next": null, "previous": null, "results": [] }).to_string();
    let popular = server
        .mock("GET", "/games")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ordering".into(), "-added".into()),
            Matcher::UrlEncoded("page_size".into(), "16".into()),
        ]))
        .with_status(200)
        .with_body(empty_page.clone())
        .create_async()
        .await;
    let top_rated = server
        .mock("GET", "/games")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ordering".into(), "-metacritic".into()),
            Matcher::UrlEncoded("page_size".into(), "16".into()),
        ]))
        .with_status(200)
        .with_body(empty_page)
        .create_async()
        .await;

    let client = client_for(&server);
    assert_ok!(client.popular_games(1).await);
    assert_ok!(client.top_rated_games(1).await);

    popular.assert_async().await;
    top_rated.assert_async().await;
}
