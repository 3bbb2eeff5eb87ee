use serial_test::serial;
use tokio::net::TcpListener;
use utoipa_axum::router::OpenApiRouter;

use notes_api::NotesConfig;
use notes_api::models::envelope::{Data, ErrorBody};
use notes_api::models::notes::{NewNoteRequest, Note, NoteUpdates};

mod utils;

#[tokio::test]
#[serial]
async fn notes_routes() -> Result<(), Box<dyn std::error::Error>> {
    // Make sure the configured database is a test database before wiping it.
    let config = NotesConfig::from_env()?;
    utils::reset_database(&config.database_url)?;

    // Initialize the server state.
    let (config, pool) = notes_api::init().await?;
    let openapi_router =
        OpenApiRouter::new().nest("/notes", notes_api::routes::notes::router(pool));
    let (router, _) = openapi_router.split_for_parts();
    let listener = TcpListener::bind(&config.bind_addr).await?;

    // Spawn server and create a client for all test requests.
    let _ = tokio::spawn(async move { axum::serve(listener, router).await });
    let client = reqwest::Client::new();
    let notes_url = format!("http://{}/notes", config.bind_addr);

    // Make a note. Surrounding whitespace is trimmed on the way in.
    let body = NewNoteRequest::builder()
        .title("  Grocery List  ".to_string())
        .content("  eggs and flour  ".to_string())
        .build();
    let response = client.post(&notes_url).json(&body).send().await?;
    assert_eq!(response.status().as_u16(), 201);
    let note1 = response.json::<Data<Note>>().await?.data;
    assert_eq!(note1.title, "Grocery List");
    assert_eq!(note1.content, "eggs and flour");

    // A title differing only by case is a conflict.
    let body = NewNoteRequest::builder()
        .title("grocery list".to_string())
        .content("rice".to_string())
        .build();
    let response = client.post(&notes_url).json(&body).send().await?;
    assert_eq!(response.status().as_u16(), 409);
    let error = response.json::<ErrorBody>().await?;
    assert_eq!(error.error, "Note with this title already exists");

    // Whitespace-only titles never reach storage.
    let body = NewNoteRequest::builder()
        .title("   ".to_string())
        .content("rice".to_string())
        .build();
    let response = client.post(&notes_url).json(&body).send().await?;
    assert_eq!(response.status().as_u16(), 400);
    let error = response.json::<ErrorBody>().await?;
    assert_eq!(error.error, "Invalid request payload");
    assert!(error.detail.is_some());

    // So do bodies missing a required field.
    let body = serde_json::json!({"title": "No content"});
    let response = client.post(&notes_url).json(&body).send().await?;
    assert_eq!(response.status().as_u16(), 400);

    // Updating an unknown ID is a 404.
    let body = NoteUpdates::builder().content("new text".to_string()).build();
    let response = client
        .put(format!("{notes_url}/999999"))
        .json(&body)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 404);
    let error = response.json::<ErrorBody>().await?;
    assert_eq!(error.error, "Note not found");

    // Updating only the content leaves the title untouched.
    let update_url = format!("{notes_url}/{}", note1.id);
    let body = NoteUpdates::builder().content("new text".to_string()).build();
    let response = client.put(&update_url).json(&body).send().await?;
    let response = utils::assert_ok_response(response).await?;
    let note2 = response.json::<Data<Note>>().await?.data;
    assert_eq!(note2.title, note1.title);
    assert_eq!(note2.content, "new text");
    assert!(note2.updated_at >= note1.updated_at);

    // Submitting the same update again lands on the same stored fields.
    let body = NoteUpdates::builder().content("new text".to_string()).build();
    let response = client.put(&update_url).json(&body).send().await?;
    let response = utils::assert_ok_response(response).await?;
    let note3 = response.json::<Data<Note>>().await?.data;
    assert_eq!(note3.title, note2.title);
    assert_eq!(note3.content, note2.content);

    // A whitespace-only title counts as "no value supplied".
    let body = NoteUpdates::builder().title("   ".to_string()).build();
    let response = client.put(&update_url).json(&body).send().await?;
    let response = utils::assert_ok_response(response).await?;
    let note4 = response.json::<Data<Note>>().await?.data;
    assert_eq!(note4.title, note1.title);
    assert_eq!(note4.content, "new text");

    // Malformed JSON bodies are rejected.
    let response = client
        .put(&update_url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    // Listing returns every note with its latest contents.
    let body = NewNoteRequest::builder()
        .title("Reading List".to_string())
        .content("The Rust Book".to_string())
        .build();
    let response = client.post(&notes_url).json(&body).send().await?;
    assert_eq!(response.status().as_u16(), 201);

    let response = client.get(&notes_url).send().await?;
    let response = utils::assert_ok_response(response).await?;
    let notes = response.json::<Data<Vec<Note>>>().await?.data;
    assert_eq!(notes.len(), 2);
    let listed = notes
        .iter()
        .find(|note| note.id == note1.id)
        .ok_or("note missing from listing")?;
    assert_eq!(listed.content, "new text");
    Ok(())
}
