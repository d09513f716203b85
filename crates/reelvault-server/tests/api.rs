//! End-to-end API tests against the in-memory repository.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use assert_json_diff::assert_json_include;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use reelvault_auth::{AccessTokenClaims, AuthState, JwtService};
use reelvault_server::cache::MovieCache;
use reelvault_server::config::AppConfig;
use reelvault_server::state::AppState;
use reelvault_server::build_app;
use reelvault_storage::InMemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const ISSUER: &str = "https://id.reelvault.test";
const AUDIENCE: &str = "https://movies.reelvault.test";
const API_KEY: &str = "integration-test-key";

struct TestApp {
    app: Router,
    jwt: Arc<JwtService>,
    store: Arc<InMemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let jwt = Arc::new(JwtService::new("test-secret", ISSUER, AUDIENCE));
        let auth = AuthState::new(jwt.clone(), Uuid::new_v4()).with_api_key(API_KEY);
        let cache = Arc::new(MovieCache::new(std::time::Duration::from_secs(60), true));
        let state = AppState::new(store.clone(), store.clone(), cache, auth);
        let app = build_app(state, &AppConfig::default());
        Self { app, jwt, store }
    }

    fn token(&self, user_id: Uuid, admin: bool, trusted: bool) -> String {
        let claims = AccessTokenClaims {
            sub: None,
            exp: time::OffsetDateTime::now_utc().unix_timestamp() + 3600,
            iss: Some(ISSUER.into()),
            aud: Some(AUDIENCE.into()),
            userid: Some(user_id),
            admin,
            trusted_member: trusted,
        };
        self.jwt.encode(&claims).unwrap()
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn create_movie(&self, token: &str, title: &str, year: i32) -> Value {
        let response = self
            .request(
                "POST",
                "/api/movies",
                Some(token),
                Some(json!({ "title": title, "yearOfRelease": year, "genres": ["Drama"] })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/_health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_requires_trusted_tier() {
    let app = TestApp::new();
    let body = json!({ "title": "Heat", "yearOfRelease": 1995, "genres": ["Crime"] });

    let anonymous = app
        .request("POST", "/api/movies", None, Some(body.clone()))
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let plain = app.token(Uuid::new_v4(), false, false);
    let forbidden = app
        .request("POST", "/api/movies", Some(&plain), Some(body.clone()))
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let trusted = app.token(Uuid::new_v4(), false, true);
    let created = app
        .request("POST", "/api/movies", Some(&trusted), Some(body))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let location = created
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap();
    let movie = body_json(created).await;
    assert_json_include!(
        actual: &movie,
        expected: json!({
            "title": "Heat",
            "slug": "heat-1995",
            "yearOfRelease": 1995,
            "genres": ["Crime"],
            "rating": null,
            "userRating": null,
        })
    );
    assert_eq!(location, format!("/api/movies/{}", movie["id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_validation_failures_are_all_reported() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);

    let response = app
        .request(
            "POST",
            "/api/movies",
            Some(&trusted),
            Some(json!({ "title": "", "yearOfRelease": 3000, "genres": [] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let failures = body["errors"].as_array().unwrap();
    let properties: Vec<&str> = failures
        .iter()
        .map(|f| f["propertyName"].as_str().unwrap())
        .collect();
    assert_eq!(properties, vec!["Title", "Genres", "YearOfRelease"]);
}

#[tokio::test]
async fn test_duplicate_slug_rejected() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    app.create_movie(&trusted, "Heat", 1995).await;

    let response = app
        .request(
            "POST",
            "/api/movies",
            Some(&trusted),
            Some(json!({ "title": "Heat", "yearOfRelease": 1995, "genres": ["Crime"] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["propertyName"], "Slug");
}

#[tokio::test]
async fn test_get_by_id_and_slug() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    let movie = app.create_movie(&trusted, "Heat", 1995).await;
    let id = movie["id"].as_str().unwrap();

    let by_id = app
        .request("GET", &format!("/api/movies/{id}"), None, None)
        .await;
    assert_eq!(by_id.status(), StatusCode::OK);

    let by_slug = app.request("GET", "/api/movies/heat-1995", None, None).await;
    assert_eq!(by_slug.status(), StatusCode::OK);
    assert_eq!(body_json(by_slug).await["id"], id);

    let missing = app
        .request("GET", "/api/movies/no-such-movie-2000", None, None)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_sorts_and_pages() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    for (title, year) in [("Alpha", 2001), ("Beta", 2003), ("Gamma", 2002)] {
        app.create_movie(&trusted, title, year).await;
    }

    let sorted = app
        .request("GET", "/api/movies?sortBy=-year", None, None)
        .await;
    let body = body_json(sorted).await;
    let years: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["yearOfRelease"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2003, 2002, 2001]);
    assert_eq!(body["total"], 3);

    let filtered = app
        .request("GET", "/api/movies?title=Beta", None, None)
        .await;
    let body = body_json(filtered).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 1);

    let paged = app
        .request("GET", "/api/movies?page=2&pageSize=2&sortBy=title", None, None)
        .await;
    let body = body_json(paged).await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["items"][0]["title"], "Gamma");
}

#[tokio::test]
async fn test_invalid_page_is_bad_request() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/movies?page=0", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_changes_slug_and_misses_unknown_id() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    let movie = app.create_movie(&trusted, "Heat", 1995).await;
    let id = movie["id"].as_str().unwrap();

    let updated = app
        .request(
            "PUT",
            &format!("/api/movies/{id}"),
            Some(&trusted),
            Some(json!({ "title": "Heat Remastered", "yearOfRelease": 1995, "genres": ["Crime"] })),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(body_json(updated).await["slug"], "heat-remastered-1995");

    // Old slug no longer resolves.
    let old = app.request("GET", "/api/movies/heat-1995", None, None).await;
    assert_eq!(old.status(), StatusCode::NOT_FOUND);

    let unknown = app
        .request(
            "PUT",
            &format!("/api/movies/{}", Uuid::new_v4()),
            Some(&trusted),
            Some(json!({ "title": "Ghost", "yearOfRelease": 1990, "genres": ["Drama"] })),
        )
        .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    // Updates address by id only.
    let by_slug = app
        .request(
            "PUT",
            "/api/movies/heat-remastered-1995",
            Some(&trusted),
            Some(json!({ "title": "Heat", "yearOfRelease": 1995, "genres": ["Crime"] })),
        )
        .await;
    assert_eq!(by_slug.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    let movie = app.create_movie(&trusted, "Heat", 1995).await;
    let id = movie["id"].as_str().unwrap();

    let forbidden = app
        .request("DELETE", &format!("/api/movies/{id}"), Some(&trusted), None)
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let admin = app.token(Uuid::new_v4(), true, false);
    let deleted = app
        .request("DELETE", &format!("/api/movies/{id}"), Some(&admin), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = app
        .request("GET", &format!("/api/movies/{id}"), None, None)
        .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_key_grants_admin() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    let movie = app.create_movie(&trusted, "Heat", 1995).await;
    let id = movie["id"].as_str().unwrap().to_owned();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/movies/{id}"))
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let wrong = Request::builder()
        .method("DELETE")
        .uri(format!("/api/movies/{id}"))
        .header("x-api-key", "wrong")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(wrong).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rating_flow() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    let movie = app.create_movie(&trusted, "Heat", 1995).await;
    let id = movie["id"].as_str().unwrap();

    let user_id = Uuid::new_v4();
    let user = app.token(user_id, false, false);

    let anonymous = app
        .request(
            "PUT",
            &format!("/api/movies/{id}/ratings"),
            None,
            Some(json!({ "rating": 4 })),
        )
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let out_of_range = app
        .request(
            "PUT",
            &format!("/api/movies/{id}/ratings"),
            Some(&user),
            Some(json!({ "rating": 6 })),
        )
        .await;
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let rated = app
        .request(
            "PUT",
            &format!("/api/movies/{id}/ratings"),
            Some(&user),
            Some(json!({ "rating": 4 })),
        )
        .await;
    assert_eq!(rated.status(), StatusCode::OK);

    let unknown = app
        .request(
            "PUT",
            &format!("/api/movies/{}/ratings", Uuid::new_v4()),
            Some(&user),
            Some(json!({ "rating": 4 })),
        )
        .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    // The rating shows up on authenticated reads.
    let detail = app
        .request("GET", &format!("/api/movies/{id}"), Some(&user), None)
        .await;
    let body = body_json(detail).await;
    assert_eq!(body["rating"], 4.0);
    assert_eq!(body["userRating"], 4);

    let mine = app.request("GET", "/api/ratings/me", Some(&user), None).await;
    assert_eq!(mine.status(), StatusCode::OK);
    let ratings = body_json(mine).await;
    assert_eq!(ratings[0]["slug"], "heat-1995");
    assert_eq!(ratings[0]["rating"], 4);

    let removed = app
        .request(
            "DELETE",
            &format!("/api/movies/{id}/ratings"),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(removed.status(), StatusCode::OK);

    let removed_again = app
        .request(
            "DELETE",
            &format!("/api/movies/{id}/ratings"),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(removed_again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_list_request_is_served_from_cache() {
    use reelvault_core::Movie;
    use reelvault_storage::MovieRepository;

    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    app.create_movie(&trusted, "Alpha", 2001).await;

    // Prime the anonymous list cache.
    let first = app.request("GET", "/api/movies", None, None).await;
    assert_eq!(body_json(first).await["total"], 1);

    // Write to the store behind the handlers' back: a repeated identical
    // request must come from the cache, not a fresh query.
    let hidden = Movie::new("Hidden", 2002, vec!["Drama".into()]);
    app.store.create(&hidden).await.unwrap();
    let cached = app.request("GET", "/api/movies", None, None).await;
    assert_eq!(body_json(cached).await["total"], 1);

    // A mutation through the API evicts, and the next read sees everything.
    app.create_movie(&trusted, "Beta", 2003).await;
    let fresh = app.request("GET", "/api/movies", None, None).await;
    assert_eq!(body_json(fresh).await["total"], 3);
}

#[tokio::test]
async fn test_anonymous_reads_never_leak_user_ratings() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    let movie = app.create_movie(&trusted, "Heat", 1995).await;
    let id = movie["id"].as_str().unwrap();

    let user = app.token(Uuid::new_v4(), false, false);
    app.request(
        "PUT",
        &format!("/api/movies/{id}/ratings"),
        Some(&user),
        Some(json!({ "rating": 5 })),
    )
    .await;

    // Authenticated read populates the user rating...
    let mine = app
        .request("GET", &format!("/api/movies/{id}"), Some(&user), None)
        .await;
    assert_eq!(body_json(mine).await["userRating"], 5);

    // ...but the anonymous view of the same movie carries none.
    let anonymous = app
        .request("GET", &format!("/api/movies/{id}"), None, None)
        .await;
    let body = body_json(anonymous).await;
    assert_eq!(body["rating"], 5.0);
    assert!(body["userRating"].is_null());

    // And a second anonymous read (now a cache hit) still carries none.
    let cached = app
        .request("GET", &format!("/api/movies/{id}"), None, None)
        .await;
    assert!(body_json(cached).await["userRating"].is_null());
}

#[tokio::test]
async fn test_request_id_reaches_the_trace_span() {
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedBuffer {
        type Writer = SharedBuffer;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    let buffer = SharedBuffer(Arc::new(Mutex::new(Vec::new())));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = TestApp::new();
    let request = Request::builder()
        .method("GET")
        .uri("/_health")
        .header("x-request-id", "req-id-reel-42")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(
        logs.contains("req-id-reel-42"),
        "request id missing from trace output:\n{logs}"
    );
}

#[tokio::test]
async fn test_genre_names_survive_the_listing() {
    let app = TestApp::new();
    let trusted = app.token(Uuid::new_v4(), false, true);
    let response = app
        .request(
            "POST",
            "/api/movies",
            Some(&trusted),
            Some(json!({
                "title": "Heat",
                "yearOfRelease": 1995,
                "genres": ["Crime, Thriller", "Drama"],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let list = app.request("GET", "/api/movies", None, None).await;
    let body = body_json(list).await;
    assert_eq!(
        body["items"][0]["genres"],
        json!(["Crime, Thriller", "Drama"])
    );
}

#[tokio::test]
async fn test_unsupported_api_version_rejected() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("GET")
        .uri("/api/movies")
        .header(header::ACCEPT, "application/json;api-version=3.0")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get("api-supported-versions")
            .and_then(|v| v.to_str().ok()),
        Some("1.0, 2.0")
    );
}

#[tokio::test]
async fn test_supported_api_version_accepted() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("GET")
        .uri("/api/movies")
        .header(header::ACCEPT, "application/json;api-version=1.0")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
