#[allow(dead_code)]
mod common;

use common::{BRICK_BLASTER_CONFIG, BRICK_BLASTER_PAGE, TestServer};
use locket_server::session::SESSION_HEADER;

// --- Health ---

#[tokio::test]
async fn health_reports_catalog_and_sessions() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    server.new_session(&client).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog"]["games"], 2);
    assert_eq!(body["catalog"]["origin"]["kind"], "file");
    assert_eq!(body["sessions"], 1);
}

#[tokio::test]
async fn ready_when_catalog_has_games() {
    let server = TestServer::new().await;
    let resp = reqwest::get(format!("{}/ready", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ready");
}

// --- Catalog ---

#[tokio::test]
async fn list_games_sorted_by_title() {
    let server = TestServer::new().await;
    let resp = reqwest::get(server.api("/games?sort=Title")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("cache-control").unwrap().to_str().unwrap(),
        "no-store"
    );

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["games"][0]["title"], "Brick Blaster");
    assert_eq!(body["games"][1]["title"], "Ludo Blitz");
    assert_eq!(body["games"][0]["estimatedPlayTime"], "5-10 minutes");
}

#[tokio::test]
async fn list_games_filters_by_category() {
    let server = TestServer::new().await;

    let body: serde_json::Value = reqwest::get(server.api("/games?category=board"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["games"][0]["id"], "ludo-blitz");

    let body: serde_json::Value = reqwest::get(server.api("/games?category=puzzle&difficulty=All"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 0);
    assert_eq!(body["games"], serde_json::json!([]));
}

#[tokio::test]
async fn list_games_rejects_unknown_sort() {
    let server = TestServer::new().await;
    let resp = reqwest::get(server.api("/games?sort=popularity")).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("popularity"));
}

#[tokio::test]
async fn facets_start_with_all() {
    let server = TestServer::new().await;
    let body: serde_json::Value = reqwest::get(server.api("/games/facets"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["categories"], serde_json::json!(["All", "arcade", "board"]));
    assert_eq!(body["difficulties"], serde_json::json!(["All", "easy"]));
}

#[tokio::test]
async fn get_game_by_id() {
    let server = TestServer::new().await;

    let resp = reqwest::get(server.api("/games/ludo-blitz")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["category"], "board");

    let resp = reqwest::get(server.api("/games/chess")).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn missing_manifest_falls_back_then_reloads() {
    let server = TestServer::with_missing_manifest().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = reqwest::get(server.api("/games"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 10);

    server
        .games
        .write("manifest.json", locket_core::test_helpers::example_manifest_json());
    let resp = client
        .post(server.api("/manifest/reload"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["origin"]["kind"], "file");

    let body: serde_json::Value = reqwest::get(server.api("/games"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 2);
}

// --- Sessions and selection ---

#[tokio::test]
async fn session_limit_returns_503() {
    let server = TestServer::with_session_limit(1).await;
    let client = reqwest::Client::new();
    server.new_session(&client).await;

    let resp = client.post(server.api("/sessions")).send().await.unwrap();
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn selection_starts_empty() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.new_session(&client).await;

    let body: serde_json::Value = client
        .get(server.api("/session/selection"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!({"status": "none"}));
}

#[tokio::test]
async fn select_game_and_read_back() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "ludo-blitz").await;

    let body: serde_json::Value = client
        .get(server.api("/session/selection"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "selected");
    assert_eq!(body["game"]["title"], "Ludo Blitz");
}

#[tokio::test]
async fn selection_errors() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(server.api("/session/selection"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(server.api("/session/selection"))
        .header(SESSION_HEADER, "no-such-session")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let session = server.new_session(&client).await;
    let resp = client
        .put(server.api("/session/selection"))
        .header(SESSION_HEADER, &session)
        .json(&serde_json::json!({"game_id": "chess"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn selection_survives_reload_as_not_found() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "ludo-blitz").await;

    server.games.write(
        "manifest.json",
        r#"{"games": [{"id": "brick-blaster", "title": "Brick Blaster",
            "slug": "brick-blaster", "category": "arcade", "difficulty": "easy"}]}"#,
    );
    client
        .post(server.api("/manifest/reload"))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = client
        .get(server.api("/session/selection"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "not_found");
    assert_eq!(body["game_id"], "ludo-blitz");
}

// --- Embedding ---

#[tokio::test]
async fn embed_requires_selection() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.new_session(&client).await;

    let resp = client
        .get(server.api("/session/embed"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn embed_local_returns_page_verbatim() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "brick-blaster").await;

    let resp = client
        .get(server.api("/session/embed?mode=local"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert_eq!(resp.text().await.unwrap(), BRICK_BLASTER_PAGE);
}

#[tokio::test]
async fn embed_local_missing_page_is_under_development() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "ludo-blitz").await;

    let resp = client
        .get(server.api("/session/embed"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "under_development");
    assert_eq!(body["message"], "Game under development!");
    assert!(
        body["path"]
            .as_str()
            .unwrap()
            .ends_with("index.html")
    );
}

#[tokio::test]
async fn embed_remote_builds_pages_url() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "brick-blaster").await;

    let body: serde_json::Value = client
        .get(server.api("/session/embed?mode=remote&host=alice"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["url"],
        "https://alice.github.io/RetroPocketLocket/games/brick-blaster/"
    );
    assert_eq!(body["height"], 600);

    let resp = client
        .get(server.api("/session/embed?mode=remote&host=your-username"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn embed_placeholder_card() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "ludo-blitz").await;

    let body: serde_json::Value = client
        .get(server.api("/session/embed?mode=placeholder"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["mode"], "placeholder");
    assert_eq!(body["card"]["title"], "Ludo Blitz");
    assert_eq!(body["card"]["category"], "Board");
    assert_eq!(body["card"]["difficulty"], "Easy");
    assert_eq!(body["card"]["notice"], "Game under development!");
}

// --- Tuning ---

#[tokio::test]
async fn tuning_controls_follow_config() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "brick-blaster").await;

    let body: serde_json::Value = client
        .get(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["tuned"], false);

    let controls = body["controls"].as_array().unwrap();
    assert_eq!(controls.len(), 3);
    assert_eq!(controls[0]["key"], "paddleWidth");
    assert_eq!(controls[0]["kind"], "integer");
    assert_eq!(controls[0]["min"], 10);
    assert_eq!(controls[0]["max"], 300);
    assert_eq!(controls[1]["key"], "ballSpeed");
    assert_eq!(controls[1]["kind"], "real");
    assert!((controls[1]["max"].as_f64().unwrap() - 15.0).abs() < 1e-9);
    assert_eq!(controls[2]["kind"], "read_only");
    assert_eq!(controls[2]["value"], "neon");
}

#[tokio::test]
async fn tuning_game_without_config_is_empty() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "ludo-blitz").await;

    let body: serde_json::Value = client
        .get(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["controls"], serde_json::json!([]));
    assert_eq!(body["config"], serde_json::json!({}));
}

#[tokio::test]
async fn tuning_edits_clamp_and_stay_in_session() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "brick-blaster").await;

    let resp = client
        .post(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .json(&serde_json::json!({
            "edits": {"paddleWidth": 400.0, "ballSpeed": 2.5, "theme": 1.0, "gravity": 9.8}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["tuned"], true);
    assert_eq!(body["config"]["paddleWidth"], 300);
    assert_eq!(body["config"]["ballSpeed"], 2.5);
    assert_eq!(body["config"]["theme"], "neon");
    assert!(body["config"].get("gravity").is_none());

    // A later edit keeps earlier ones.
    let body: serde_json::Value = client
        .post(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .json(&serde_json::json!({"edits": {"ballSpeed": 7.0}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["config"]["paddleWidth"], 300);
    assert_eq!(body["config"]["ballSpeed"], 7.0);

    // Tuned values reach the embedded page.
    let page = client
        .get(server.api("/session/embed?inject_config=true"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("window.REMOTE_CONFIG"));
    assert!(page.contains("\"paddleWidth\":300"));

    // The config file on disk is untouched.
    let config_path = server.games.path().join("brick-blaster/game-config.json");
    let on_disk = std::fs::read_to_string(config_path).unwrap();
    assert_eq!(on_disk, BRICK_BLASTER_CONFIG);

    // Another session still sees the stored parameters.
    let other = server.session_with(&client, "brick-blaster").await;
    let body: serde_json::Value = client
        .get(server.api("/session/tuning"))
        .header(SESSION_HEADER, &other)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["config"]["paddleWidth"], 100);
}

#[tokio::test]
async fn tuning_reset_restores_stored_values() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "brick-blaster").await;

    client
        .post(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .json(&serde_json::json!({"edits": {"paddleWidth": 50.0}}))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = client
        .delete(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["tuned"], false);
    assert_eq!(body["config"]["paddleWidth"], 100);
}

#[tokio::test]
async fn tuned_values_follow_reloaded_config() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.session_with(&client, "brick-blaster").await;

    client
        .post(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .json(&serde_json::json!({"edits": {"paddleWidth": 150.0}}))
        .send()
        .await
        .unwrap();

    server
        .games
        .write("brick-blaster/game-config.json", r#"{"lives": 3, "paddleWidth": 100}"#);
    client
        .post(server.api("/manifest/reload"))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = client
        .get(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let config_keys: Vec<&str> = body["config"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let control_keys: Vec<&str> = body["controls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert_eq!(config_keys, vec!["lives", "paddleWidth"]);
    assert_eq!(config_keys, control_keys);
    assert_eq!(body["config"]["paddleWidth"], 150);
    assert_eq!(body["config"]["lives"], 3);

    let page = client
        .get(server.api("/session/embed?inject_config=true"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(r#"{"lives":3,"paddleWidth":150}"#));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tuning_edits_all_land() {
    let server = TestServer::new().await;
    let keys: Vec<String> = (0..16).map(|i| format!("p{i}")).collect();
    let config: serde_json::Map<String, serde_json::Value> = keys
        .iter()
        .map(|k| (k.clone(), serde_json::Value::from(100)))
        .collect();
    server.games.write(
        "brick-blaster/game-config.json",
        &serde_json::Value::Object(config).to_string(),
    );

    let client = reqwest::Client::new();
    let session = server.session_with(&client, "brick-blaster").await;

    let mut handles = Vec::new();
    for key in &keys {
        let client = client.clone();
        let url = server.api("/session/tuning");
        let session = session.clone();
        let edits = serde_json::json!({"edits": {(key.as_str()): 200.0}});
        handles.push(tokio::spawn(async move {
            let resp = client
                .post(url)
                .header(SESSION_HEADER, &session)
                .json(&edits)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 200);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let body: serde_json::Value = client
        .get(server.api("/session/tuning"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for key in &keys {
        assert_eq!(body["config"][key.as_str()], 200, "edit to {key} was lost");
    }
}

// --- Scores ---

#[tokio::test]
async fn scores_keep_best_per_game() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let session = server.new_session(&client).await;

    let post = |game: &'static str, score: u64| {
        client
            .post(server.api("/session/scores"))
            .header(SESSION_HEADER, &session)
            .json(&serde_json::json!({"game_id": game, "score": score}))
            .send()
    };

    let body: serde_json::Value = post("brick-blaster", 50).await.unwrap().json().await.unwrap();
    assert_eq!(body, serde_json::json!({"new_best": true, "best": 50}));

    let body: serde_json::Value = post("brick-blaster", 30).await.unwrap().json().await.unwrap();
    assert_eq!(body, serde_json::json!({"new_best": false, "best": 50}));

    let resp = post("chess", 10).await.unwrap();
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = client
        .get(server.api("/session/scores"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["scores"],
        serde_json::json!([{"game_id": "brick-blaster", "score": 50}])
    );
}

// --- Static files ---

#[tokio::test]
async fn games_directory_is_served() {
    let server = TestServer::new().await;
    let resp = reqwest::get(format!(
        "{}/games/brick-blaster/index.html",
        server.base_url()
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), BRICK_BLASTER_PAGE);
}
