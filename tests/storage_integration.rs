//! Store behavior through the public API.

use std::sync::Arc;

use grader::storage::{
    Difficulty, NewSubmission, QUESTIONS_FILE, QuestionDraft, QuestionStore, SubmissionStore,
};
use grader::{Feedback, SimilarityScorer};
use tempfile::TempDir;

fn draft(answer: &str) -> QuestionDraft {
    QuestionDraft {
        text: Some("Explain diffusion".to_string()),
        correct_answer: Some(answer.to_string()),
        difficulty: Some(Difficulty::Easy),
        point_value: Some(4),
        ..Default::default()
    }
}

#[test]
fn test_questions_file_format_is_camel_case() {
    let dir = TempDir::new().unwrap();
    let store = QuestionStore::in_dir(dir.path());
    store.create(draft("Particles spread from high to low concentration")).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(QUESTIONS_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let q = &json[0];
    assert_eq!(q["id"], "Q001");
    assert_eq!(q["correctAnswer"], "Particles spread from high to low concentration");
    assert_eq!(q["pointValue"], 4);
    assert_eq!(q["allowFileUpload"], true);
    assert!(q.get("correct_answer").is_none());
}

#[test]
fn test_grade_and_record_submission() {
    let dir = TempDir::new().unwrap();
    let questions = QuestionStore::in_dir(dir.path());
    let submissions = SubmissionStore::in_dir(dir.path());
    let scorer = SimilarityScorer::stub().unwrap();

    let question = questions
        .create(draft("Particles spread from high to low concentration"))
        .unwrap();
    let grade = scorer
        .grade(&question.correct_answer, "Particles spread from high to low concentration")
        .unwrap();
    assert_eq!(grade.feedback, Feedback::Excellent);

    let saved = submissions
        .append(NewSubmission {
            student_id: "3".to_string(),
            question_id: question.id.clone(),
            text_answer: Some("Particles spread from high to low concentration".to_string()),
            file_path: None,
            score: grade.score,
            feedback: grade.feedback.message().to_string(),
        })
        .unwrap();
    assert_eq!(saved.id, "S001");

    let raw = std::fs::read_to_string(dir.path().join("submissions.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["question_id"], "Q001");
    assert_eq!(json[0]["feedback"], "Excellent answer! Very well done.");
}

#[test]
fn test_concurrent_submissions_get_unique_ids() {
    let dir = TempDir::new().unwrap();
    let submissions = Arc::new(SubmissionStore::in_dir(dir.path()));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let submissions = submissions.clone();
            std::thread::spawn(move || {
                submissions
                    .append(NewSubmission {
                        student_id: i.to_string(),
                        question_id: "Q001".to_string(),
                        text_answer: Some("x".to_string()),
                        file_path: None,
                        score: 0.0,
                        feedback: Feedback::NeedsImprovement.message().to_string(),
                    })
                    .unwrap()
            })
        })
        .collect();

    let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
    assert_eq!(submissions.list().unwrap().len(), 10);
}
