//! Integration tests for RestClient using wiremock.
//!
//! These tests verify the PostgREST query shapes, headers and storage calls
//! against a mock server.

#![allow(clippy::unwrap_used, clippy::panic)]

use famhub_calendar::{DateKey, TimeOfDay};
use famhub_services::{
    CardBenefit, FamilyClient, NewPost, Notice, PostUpdate, RepoError, RestClient, ScheduleUpdate,
};
use wiremock::matchers::{
    body_json, body_string, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "anon-test-key";

fn client(server: &MockServer) -> RestClient {
    RestClient::new(&server.uri(), KEY, "board-files").unwrap()
}

fn post_json(id: &str, title: &str, created_at: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "content": format!("{} body", title),
        "author_id": "m1",
        "is_notice": false,
        "created_at": created_at
    })
}

#[tokio::test]
async fn test_list_posts_sends_keys_and_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/board_posts"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", KEY))
        .and(header("authorization", format!("Bearer {}", KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            post_json("p2", "Newer", "2026-10-19T09:00:00+00:00"),
            post_json("p1", "Older", "2026-10-18T09:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let posts = client(&server).list_posts().await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, "p2");
    assert!(posts[0].created_at > posts[1].created_at);
}

#[tokio::test]
async fn test_recent_posts_applies_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/board_posts"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            post_json("p1", "Only", "2026-10-18T09:00:00Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let posts = client(&server).recent_posts(3).await.unwrap();
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn test_get_post_missing_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/board_posts"))
        .and(query_param("id", "eq.nope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    assert!(client(&server).get_post("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_post_requests_representation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/board_posts"))
        .and(header("prefer", "return=representation"))
        .and(body_json(serde_json::json!({
            "title": "Trip",
            "content": "Trip body",
            "author_id": "m1",
            "is_notice": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            post_json("new-id", "Trip", "2026-10-19T09:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let post = client(&server)
        .create_post(&NewPost {
            title: "Trip".into(),
            content: "Trip body".into(),
            author_id: "m1".into(),
            is_notice: true,
        })
        .await
        .unwrap();

    assert_eq!(post.id, "new-id");
}

#[tokio::test]
async fn test_create_post_validation_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server)
        .create_post(&NewPost {
            title: String::new(),
            content: "body".into(),
            author_id: "m1".into(),
            is_notice: false,
        })
        .await;

    assert!(matches!(result, Err(RepoError::Validation(_))));
}

#[tokio::test]
async fn test_update_post_missing_row_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/board_posts"))
        .and(query_param("id", "eq.gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = client(&server)
        .update_post(
            "gone",
            &PostUpdate {
                title: "t".into(),
                content: "c".into(),
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/board_comments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).delete_comment("c1").await.unwrap_err();
    match err {
        RepoError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_comment_counts_group_by_post() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/board_comments"))
        .and(query_param("select", "post_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"post_id": "p1"},
            {"post_id": "p2"},
            {"post_id": "p1"}
        ])))
        .mount(&server)
        .await;

    let counts = client(&server).comment_counts().await.unwrap();
    assert_eq!(counts.get("p1"), Some(&2));
    assert_eq!(counts.get("p2"), Some(&1));
    assert_eq!(counts.get("p3"), None);
}

#[tokio::test]
async fn test_list_schedules_filters_range_and_reads_all_day() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/family_schedules"))
        .and(query_param("schedule_date", "gte.2026-10-01"))
        .and(query_param("schedule_date", "lte.2026-10-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "s1", "title": "Timed", "schedule_date": "2026-10-19", "schedule_time": "09:00:00", "author_id": "m1"},
            {"id": "s2", "title": "Sentinel", "schedule_date": "2026-10-19", "schedule_time": "ALL_DAY", "author_id": "m1"},
            {"id": "s3", "title": "Null", "schedule_date": "2026-10-20", "schedule_time": null, "author_id": "m2"}
        ])))
        .mount(&server)
        .await;

    let rows = client(&server)
        .list_schedules(
            DateKey::parse("2026-10-01").unwrap(),
            DateKey::parse("2026-10-31").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].time, TimeOfDay::at(9, 0).unwrap());
    assert!(rows[1].time.is_all_day());
    assert!(rows[2].time.is_all_day());
}

#[tokio::test]
async fn test_update_schedule_sends_title_and_time_only() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/family_schedules"))
        .and(query_param("id", "eq.s1"))
        .and(body_json(serde_json::json!({
            "title": "Swim lesson",
            "schedule_time": "16:30"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "s1", "title": "Swim lesson", "schedule_date": "2026-10-21", "schedule_time": "16:30", "author_id": "kid"}
        ])))
        .mount(&server)
        .await;

    let entry = client(&server)
        .update_schedule(
            "s1",
            &ScheduleUpdate {
                title: "Swim lesson".into(),
                schedule_time: TimeOfDay::at(16, 30).unwrap(),
            },
        )
        .await
        .unwrap();

    assert_eq!(entry.title, "Swim lesson");
}

#[tokio::test]
async fn test_upsert_notice_merges_on_author() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/home_notices"))
        .and(query_param("on_conflict", "author_id"))
        .and(header_regex("prefer", "merge-duplicates"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            {"author_id": "m1", "content": "Dinner at 7"}
        ])))
        .mount(&server)
        .await;

    let notice = client(&server)
        .upsert_notice(&Notice {
            author_id: "m1".into(),
            content: "Dinner at 7".into(),
        })
        .await
        .unwrap();

    assert_eq!(notice.content, "Dinner at 7");
}

#[tokio::test]
async fn test_benefits_by_category_embeds_card() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/card_benefits"))
        .and(query_param("category", "eq.주유"))
        .and(query_param(
            "select",
            "card_id,category,benefit_description,cards(card_name,owner_id,monthly_requirement)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "card_id": "c1",
                "category": "주유",
                "benefit_description": "60 won/L",
                "cards": {"card_name": "Oil Card", "owner_id": "m1", "monthly_requirement": "300k"}
            }
        ])))
        .mount(&server)
        .await;

    let rows = client(&server).benefits_by_category("주유").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cards.as_ref().unwrap().card_name, "Oil Card");
}

#[tokio::test]
async fn test_insert_card_benefits_skips_empty_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/card_benefits"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.insert_card_benefits(&[]).await.unwrap();
    client
        .insert_card_benefits(&[CardBenefit {
            card_id: "c1".into(),
            category: "쇼핑".into(),
            benefit_description: "5%".into(),
        }])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_and_remove_blob() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/board-files/p1/1700000000000_notes.txt"))
        .and(header("content-type", "text/plain"))
        .and(body_string("hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "board-files/p1/1700000000000_notes.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/board-files"))
        .and(body_json(serde_json::json!({
            "prefixes": ["p1/1700000000000_notes.txt"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client
        .upload_blob(
            "p1/1700000000000_notes.txt",
            b"hello".to_vec(),
            "text/plain",
        )
        .await
        .unwrap();
    client
        .remove_blobs(&["p1/1700000000000_notes.txt".to_string()])
        .await
        .unwrap();

    assert_eq!(
        client.public_url("p1/1700000000000_notes.txt"),
        format!(
            "{}/storage/v1/object/public/board-files/p1/1700000000000_notes.txt",
            server.uri()
        )
    );
}

#[tokio::test]
async fn test_family_client_dispatches_to_rest() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/family_members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "m1", "name": "Mom"},
            {"id": "m2", "name": "Dad"}
        ])))
        .mount(&server)
        .await;

    let family = FamilyClient::rest(client(&server));
    let members = family.list_members().await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[1].name, "Dad");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = RestClient::new("http://127.0.0.1:9", KEY, "board-files").unwrap();
    let err = client.list_members().await.unwrap_err();
    assert!(matches!(err, RepoError::Network(_)));
}
