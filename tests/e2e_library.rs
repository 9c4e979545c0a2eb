//! E2E tests for likes, listening history, and recommendations

mod common;

use common::TestServer;

#[tokio::test]
async fn test_like_twice_appears_once() {
    let server = TestServer::new().await;
    let (_u_id, token) = server.register_and_login("liker").await;
    let track = server.upload_track(&token, "Catchy", "Artist").await;
    let track_id = track["id"].as_str().unwrap();

    for _ in 0..2 {
        let response = server
            .client
            .post(server.url(&format!("/tracks/{}/like", track_id)))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["liked"], true);
    }

    // The user appears once in the liked-by set
    let response = server
        .client
        .get(server.url("/likes"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let liked: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0]["id"].as_str().unwrap(), track_id);
}

#[tokio::test]
async fn test_like_unknown_track_is_404() {
    let server = TestServer::new().await;
    let (_u_id, token) = server.register_and_login("liker").await;

    let response = server
        .client
        .post(server.url("/tracks/01NOSUCHTRACK0000000000000/like"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_history_records_repeated_plays_most_recent_first() {
    let server = TestServer::new().await;
    let (_u_id, token) = server.register_and_login("listener").await;
    let first = server.upload_track(&token, "First Played", "A").await;
    let second = server.upload_track(&token, "Second Played", "A").await;

    for track in [&first, &first, &second] {
        let response = server
            .client
            .post(server.url(&format!(
                "/tracks/{}/history",
                track["id"].as_str().unwrap()
            )))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    let response = server
        .client
        .get(server.url("/history"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let history: Vec<serde_json::Value> = response.json().await.unwrap();

    // Repeated plays are repeated rows; most recent first
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["track"]["title"], "Second Played");
    assert_eq!(history[1]["track"]["title"], "First Played");
    assert_eq!(history[2]["track"]["title"], "First Played");
}

#[tokio::test]
async fn test_recommendations_exclude_played_tracks() {
    let server = TestServer::new().await;
    let (_u_id, token) = server.register_and_login("target").await;
    let (_crowd_id, crowd_token) = server.register_and_login("crowd").await;

    let played = server.upload_track(&token, "Known", "A").await;
    let fresh = server.upload_track(&token, "Fresh", "A").await;

    // Target has played "Known"; the crowd has played "Fresh" twice
    let response = server
        .client
        .post(server.url(&format!(
            "/tracks/{}/history",
            played["id"].as_str().unwrap()
        )))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    for _ in 0..2 {
        let response = server
            .client
            .post(server.url(&format!(
                "/tracks/{}/history",
                fresh["id"].as_str().unwrap()
            )))
            .bearer_auth(&crowd_token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
    }

    let response = server
        .client
        .get(server.url("/recommendations"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let recs: Vec<serde_json::Value> = response.json().await.unwrap();

    let titles: Vec<&str> = recs.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Fresh"]);
}
