//! End-to-end HTTP tests.

mod common;

use serde_json::json;
use tokio_test::assert_ok;

use common::harness::{TestServerConfig, spawn_test_server};
use common::http_client::TestClient;

fn question(text: &str, answer: &str) -> serde_json::Value {
    json!({
        "text": text,
        "correctAnswer": answer,
        "difficulty": "Easy",
        "pointValue": 5,
        "tags": ["biology"],
        "timeLimit": 20
    })
}

#[tokio::test]
async fn test_health_and_root() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let (status, body) = assert_ok!(client.get("/").await);
    assert_eq!(status, 200);
    assert_eq!(body, "Backend is running!");

    let (status, body) = assert_ok!(client.get("/healthz").await);
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");

    let (status, body) = assert_ok!(client.get("/ready").await);
    assert_eq!(status, 200);
    assert_eq!(body["components"]["embedder_mode"], "stub");

    server.shutdown().await;
}

#[tokio::test]
async fn test_teacher_and_student_flow() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let (status, created) = assert_ok!(
        client
            .post_json(
                "/questions",
                &question(
                    "What is the role of mitochondria?",
                    "The mitochondria is the powerhouse of the cell"
                )
            )
            .await
    );
    assert_eq!(status, 200);
    assert_eq!(created["id"], "Q001");
    assert_eq!(created["timeLimit"], 20);
    assert_eq!(created["submissionCount"], 0);

    let (status, _) = assert_ok!(
        client
            .post_form(
                "/upload_assignment",
                &[
                    ("student_id", "11"),
                    ("question_id", "Q001"),
                    ("text_answer", "The mitochondria is the powerhouse of the cell"),
                ],
                None,
            )
            .await
    );
    assert_eq!(status, 200);

    let (status, graded) = assert_ok!(
        client
            .post_form(
                "/upload_assignment",
                &[("student_id", "12"), ("question_id", "Q001")],
                Some(("answer.jpg", b"jpeg bytes".to_vec())),
            )
            .await
    );
    assert_eq!(status, 200);
    assert_eq!(graded["message"], "Assignment submitted successfully!");
    assert!(graded["score"].as_f64().unwrap() >= 99.99);
    assert_eq!(graded["feedback"], "Excellent answer! Very well done.");
    assert_eq!(server.ocr.calls(), vec!["answer.jpg".to_string()]);

    let (_, questions) = assert_ok!(client.get("/questions").await);
    assert_eq!(questions[0]["submissionCount"], 2);

    let (status, student) = assert_ok!(client.get("/get_results/12/student").await);
    assert_eq!(status, 200);
    let student = student.as_array().unwrap();
    assert_eq!(student.len(), 1);
    assert_eq!(student[0]["id"], "S002");
    assert_eq!(student[0]["file_path"], "answer.jpg");

    let (_, teacher) = assert_ok!(client.get("/get_results/1/teacher").await);
    assert_eq!(teacher.as_array().unwrap().len(), 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_question_update_semantics() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    assert_ok!(client.post_json("/questions", &question("q", "a")).await);

    let (status, kept) = assert_ok!(
        client
            .put_json(
                "/questions/Q001",
                &json!({"text": "q2", "correctAnswer": "a2", "difficulty": "Hard", "pointValue": 8}),
            )
            .await
    );
    assert_eq!(status, 200);
    assert_eq!(kept["timeLimit"], 20);
    assert_eq!(kept["tags"], json!(["biology"]));
    assert_eq!(kept["difficulty"], "Hard");

    let (_, cleared) = assert_ok!(
        client
            .put_json(
                "/questions/Q001",
                &json!({
                    "text": "q2", "correctAnswer": "a2", "difficulty": "Hard",
                    "pointValue": 8, "timeLimit": null
                }),
            )
            .await
    );
    assert!(cleared["timeLimit"].is_null());

    let (status, body) = assert_ok!(client.delete("/questions/Q777").await);
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Question not found");
    assert_eq!(body["code"], 404);

    let (status, _) = assert_ok!(client.delete("/questions/Q001").await);
    assert_eq!(status, 200);
    let (_, questions) = assert_ok!(client.get("/questions").await);
    assert!(questions.as_array().unwrap().is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = TestServerConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..TestServerConfig::default()
    };

    let first = spawn_test_server(config.clone()).await.unwrap();
    let client = TestClient::new(first.url());
    assert_ok!(client.post_json("/questions", &question("q", "a")).await);
    assert_ok!(
        client
            .post_json("/api/evaluate", &json!({"answer": "short"}))
            .await
    );
    first.shutdown().await;

    let second = spawn_test_server(config).await.unwrap();
    let client = TestClient::new(second.url());
    let (_, created) = assert_ok!(client.post_json("/questions", &question("q2", "b")).await);
    assert_eq!(created["id"], "Q002");

    let answers: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("answers.json")).unwrap()).unwrap();
    assert_eq!(answers[0]["id"], 1);
    assert_eq!(answers[0]["text"], "short");

    second.shutdown().await;
}

#[tokio::test]
async fn test_evaluate_scores_stay_in_range() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let pairs = [
        ("Water boils at 100 degrees Celsius", "Water boils at 100 degrees Celsius"),
        ("Water boils at 100 degrees Celsius", "At sea level water boils at 100C"),
        ("Water boils at 100 degrees Celsius", "The French revolution began in 1789"),
        ("", "anything at all"),
    ];

    for (model, student) in pairs {
        let (status, body) = assert_ok!(
            client
                .post_json(
                    "/evaluate",
                    &json!({"question": "q", "model_answer": model, "student_answer": student}),
                )
                .await
        );
        assert_eq!(status, 200);
        let score = body["score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score), "{} out of range", score);
        assert_eq!(score, (score * 100.0).round() / 100.0);
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_teacher_guide_upload_is_logged() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let (status, body) = assert_ok!(
        client
            .post_form(
                "/upload_teacher_guide",
                &[],
                Some(("marking-guide.pdf", b"%PDF-1.5".to_vec())),
            )
            .await
    );
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Teacher guide uploaded successfully!");
    assert!(
        server
            .data_dir
            .join("uploads/teacher_guides/marking-guide.pdf")
            .exists()
    );

    let (status, body) = assert_ok!(client.post_form("/upload_teacher_guide", &[], None).await);
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No file uploaded");

    server.shutdown().await;
}

#[tokio::test]
async fn test_upload_limit_is_enforced() {
    let server = spawn_test_server(TestServerConfig {
        max_upload_bytes: Some(1024),
        ..TestServerConfig::default()
    })
    .await
    .expect("Server should start");
    let client = TestClient::new(server.url());

    let (status, _) = assert_ok!(
        client
            .post_form(
                "/extract_text_from_file",
                &[],
                Some(("big.png", vec![0u8; 4096])),
            )
            .await
    );
    assert_eq!(status, 413);

    let (status, body) = assert_ok!(
        client
            .post_form(
                "/extract_text_from_file",
                &[],
                Some(("small.png", vec![1u8; 16])),
            )
            .await
    );
    assert_eq!(status, 200);
    assert_eq!(
        body["extracted_text"],
        "The mitochondria is the powerhouse of the cell"
    );

    server.shutdown().await;
}
