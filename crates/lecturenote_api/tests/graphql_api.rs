use async_graphql::{Request, Variables};
use async_trait::async_trait;
use lecturenote_api::{build_schema, NotesSchema};
use lecturenote_core::{
    Database, Difficulty, EnrichError, Enricher, Enrichment, NoteService, PracticeQuestion,
    SqliteNoteRepository,
};
use serde_json::{json, Value};
use std::sync::Arc;

struct StubEnricher(Result<Enrichment, EnrichError>);

#[async_trait]
impl Enricher for StubEnricher {
    async fn enrich(&self, _note_title: &str, _content: &str) -> Result<Enrichment, EnrichError> {
        self.0.clone()
    }
}

fn schema_with(result: Result<Enrichment, EnrichError>) -> NotesSchema {
    let repo = SqliteNoteRepository::new(Arc::new(Database::in_memory().unwrap()));
    build_schema(NoteService::new(
        Arc::new(repo),
        Arc::new(StubEnricher(result)),
    ))
}

fn schema() -> NotesSchema {
    schema_with(Ok(Enrichment {
        summary: "Short summary".to_string(),
        practice_questions: vec![PracticeQuestion {
            question: "Which service stores objects?".to_string(),
            options: vec![
                "EC2".to_string(),
                "S3".to_string(),
                "VPC".to_string(),
                "SQS".to_string(),
            ],
            correct_answer: "S3".to_string(),
            difficulty: Difficulty::Difficult,
            explanation: "S3 is object storage".to_string(),
        }],
    }))
}

async fn run(schema: &NotesSchema, query: &str, variables: Value) -> Value {
    let request = Request::new(query).variables(Variables::from_json(variables));
    serde_json::to_value(schema.execute(request).await).unwrap()
}

fn error_code(response: &Value) -> Option<&str> {
    response["errors"][0]["extensions"]["code"].as_str()
}

const CREATE: &str = r#"
    mutation Create($input: CreateNoteInput!) {
        createNote(input: $input) {
            id lectureTitle noteTitle content sequence summary
            practiceQuestions { question }
            createdAt updatedAt
        }
    }
"#;

async fn create(schema: &NotesSchema, lecture: &str, title: &str, sequence: i32) -> String {
    let response = run(
        schema,
        CREATE,
        json!({"input": {
            "lectureTitle": lecture,
            "noteTitle": title,
            "content": "Cloud basics",
            "sequence": sequence,
        }}),
    )
    .await;
    assert!(response.get("errors").is_none(), "{response}");
    response["data"]["createNote"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn create_note_returns_unenriched_note() {
    let schema = schema();
    let response = run(
        &schema,
        CREATE,
        json!({"input": {
            "lectureTitle": " Lecture 1 ",
            "noteTitle": "Intro",
            "content": "Cloud basics",
            "sequence": 1,
        }}),
    )
    .await;

    let note = &response["data"]["createNote"];
    assert_eq!(note["lectureTitle"], "Lecture 1");
    assert_eq!(note["sequence"], 1);
    assert!(note["summary"].is_null());
    assert!(note["practiceQuestions"].is_null());
    assert_eq!(note["createdAt"], note["updatedAt"]);
    assert!(note["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn create_note_rejects_blank_content() {
    let schema = schema();
    let response = run(
        &schema,
        CREATE,
        json!({"input": {
            "lectureTitle": "Lecture 1",
            "noteTitle": "Intro",
            "content": "   ",
            "sequence": 1,
        }}),
    )
    .await;

    assert_eq!(error_code(&response), Some("VALIDATION_ERROR"));
    assert_eq!(response["errors"][0]["message"], "Content is required");
}

#[tokio::test]
async fn create_note_rejects_unknown_difficulty() {
    let schema = schema();
    let response = run(
        &schema,
        CREATE,
        json!({"input": {
            "lectureTitle": "Lecture 1",
            "noteTitle": "Intro",
            "content": "Cloud basics",
            "sequence": 1,
            "practiceQuestions": [{
                "question": "Q?",
                "options": ["a", "b", "c", "d"],
                "correctAnswer": "a",
                "difficulty": "Easy",
                "explanation": "because",
            }],
        }}),
    )
    .await;

    assert_eq!(error_code(&response), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn notes_are_listed_in_lecture_then_sequence_order() {
    let schema = schema();
    create(&schema, "Lecture 2", "B1", 1).await;
    create(&schema, "Lecture 1", "A2", 2).await;
    create(&schema, "Lecture 1", "A1", 1).await;

    let response = run(&schema, "{ getAllNotes { noteTitle } }", json!({})).await;
    let titles: Vec<&str> = response["data"]["getAllNotes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["noteTitle"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A1", "A2", "B1"]);

    let response = run(&schema, "{ getLectureTitles }", json!({})).await;
    assert_eq!(
        response["data"]["getLectureTitles"],
        json!(["Lecture 1", "Lecture 2"])
    );

    let response = run(
        &schema,
        "query($t: String!) { getNotesByLecture(lectureTitle: $t) { noteTitle } }",
        json!({"t": "Lecture 1"}),
    )
    .await;
    assert_eq!(
        response["data"]["getNotesByLecture"],
        json!([{"noteTitle": "A1"}, {"noteTitle": "A2"}])
    );
}

#[tokio::test]
async fn missing_note_is_null_for_reads_and_not_found_for_updates() {
    let schema = schema();
    let missing = "00000000-0000-4000-8000-000000000000";

    let response = run(
        &schema,
        "query($id: ID!) { getNoteById(id: $id) { id } }",
        json!({"id": missing}),
    )
    .await;
    assert!(response.get("errors").is_none());
    assert!(response["data"]["getNoteById"].is_null());

    let response = run(
        &schema,
        "mutation($id: ID!) { updateNote(id: $id, input: {content: \"x\"}) { id } }",
        json!({"id": missing}),
    )
    .await;
    assert_eq!(error_code(&response), Some("NOT_FOUND"));
    assert_eq!(response["errors"][0]["message"], "Note not found");
}

#[tokio::test]
async fn update_note_changes_only_supplied_fields() {
    let schema = schema();
    let id = create(&schema, "Lecture 1", "Intro", 1).await;

    let response = run(
        &schema,
        "mutation($id: ID!) { updateNote(id: $id, input: {summary: \"Manual\"}) { \
            noteTitle content summary } }",
        json!({"id": id}),
    )
    .await;
    assert_eq!(
        response["data"]["updateNote"],
        json!({"noteTitle": "Intro", "content": "Cloud basics", "summary": "Manual"})
    );
}

#[tokio::test]
async fn delete_note_reports_whether_a_note_was_removed() {
    let schema = schema();
    let id = create(&schema, "Lecture 1", "Intro", 1).await;
    let query = "mutation($id: ID!) { deleteNote(id: $id) }";

    let response = run(&schema, query, json!({"id": id})).await;
    assert_eq!(response["data"]["deleteNote"], true);
    let response = run(&schema, query, json!({"id": id})).await;
    assert_eq!(response["data"]["deleteNote"], false);
}

#[tokio::test]
async fn generate_ai_content_stores_enrichment() {
    let schema = schema();
    let id = create(&schema, "Lecture 1", "Intro", 1).await;

    let response = run(
        &schema,
        "mutation($id: ID!) { generateAIContent(id: $id) { summary \
            practiceQuestions { correctAnswer difficulty } } }",
        json!({"id": id}),
    )
    .await;
    assert_eq!(
        response["data"]["generateAIContent"],
        json!({
            "summary": "Short summary",
            "practiceQuestions": [{"correctAnswer": "S3", "difficulty": "Difficult (imp)"}],
        })
    );

    let response = run(
        &schema,
        "{ getEnrichedNotes { noteTitle } }",
        json!({}),
    )
    .await;
    assert_eq!(
        response["data"]["getEnrichedNotes"],
        json!([{"noteTitle": "Intro"}])
    );
}

#[tokio::test]
async fn failed_enrichment_is_reported_and_leaves_note_untouched() {
    let schema = schema_with(Err(EnrichError::Unauthorized));
    let id = create(&schema, "Lecture 1", "Intro", 1).await;

    let response = run(
        &schema,
        "mutation($id: ID!) { generateAIContent(id: $id) { id } }",
        json!({"id": id}),
    )
    .await;
    assert_eq!(error_code(&response), Some("ENRICHMENT_FAILED"));
    assert!(response["errors"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate AI content"));

    let response = run(
        &schema,
        "query($id: ID!) { getNoteById(id: $id) { summary } }",
        json!({"id": id}),
    )
    .await;
    assert!(response["data"]["getNoteById"]["summary"].is_null());
}
