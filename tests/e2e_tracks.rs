//! E2E tests for track CRUD and audio upload

mod common;

use common::TestServer;

#[tokio::test]
async fn test_track_upload_and_open_reads() {
    let server = TestServer::new().await;
    let (user_id, token) = server.register_and_login("uploader").await;

    let track = server.upload_track(&token, "First Song", "The Band").await;
    assert_eq!(track["title"], "First Song");
    assert_eq!(track["artist"], "The Band");
    assert_eq!(track["owner_id"].as_str().unwrap(), user_id);
    let track_id = track["id"].as_str().unwrap();
    let audio_url = track["audio_url"].as_str().unwrap();
    assert!(audio_url.starts_with("/media/tracks/"));

    // Reads are open: no token needed
    let response = server.client.get(server.url("/tracks")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let tracks: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(tracks.len(), 1);

    let response = server
        .client
        .get(server.url(&format!("/tracks/{}", track_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The uploaded audio is served under /media
    let response = server.client.get(server.url(audio_url)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"fake-audio-bytes");
}

#[tokio::test]
async fn test_track_mutation_requires_auth() {
    let server = TestServer::new().await;
    let (_user_id, token) = server.register_and_login("owner").await;
    let track = server.upload_track(&token, "Guarded", "Artist").await;
    let track_id = track["id"].as_str().unwrap();

    let form = reqwest::multipart::Form::new()
        .text("title", "Nope")
        .text("artist", "Nope")
        .part(
            "audio",
            reqwest::multipart::Part::bytes(b"x".to_vec()).file_name("x.mp3"),
        );
    let response = server
        .client
        .post(server.url("/tracks"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = server
        .client
        .delete(server.url(&format!("/tracks/{}", track_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_track_upload_requires_audio_and_metadata() {
    let server = TestServer::new().await;
    let (_user_id, token) = server.register_and_login("strict").await;

    // Missing audio part
    let form = reqwest::multipart::Form::new()
        .text("title", "No Audio")
        .text("artist", "Artist");
    let response = server
        .client
        .post(server.url("/tracks"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Missing title
    let form = reqwest::multipart::Form::new().text("artist", "Artist").part(
        "audio",
        reqwest::multipart::Part::bytes(b"bytes".to_vec()).file_name("a.mp3"),
    );
    let response = server
        .client
        .post(server.url("/tracks"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_track_update_and_delete() {
    let server = TestServer::new().await;
    let (user_id, token) = server.register_and_login("editor").await;
    let track = server.upload_track(&token, "Old Title", "Old Artist").await;
    let track_id = track["id"].as_str().unwrap();

    let response = server
        .client
        .put(server.url(&format!("/tracks/{}", track_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "New Title",
            "artist": "New Artist",
            "album": "New Album",
            "genre": null
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["title"], "New Title");
    assert_eq!(body["album"], "New Album");
    // Owner is immutable
    assert_eq!(body["owner_id"].as_str().unwrap(), user_id);

    let response = server
        .client
        .delete(server.url(&format!("/tracks/{}", track_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    // Gone now, as a clean 404
    let response = server
        .client
        .get(server.url(&format!("/tracks/{}", track_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unknown_track_is_404_not_500() {
    let server = TestServer::new().await;
    let (_user_id, token) = server.register_and_login("prober").await;

    let response = server
        .client
        .get(server.url("/tracks/01NOSUCHTRACK0000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = server
        .client
        .put(server.url("/tracks/01NOSUCHTRACK0000000000000"))
        .bearer_auth(&token)
        .json(&serde_json::json!({"title": "X", "artist": "Y"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
