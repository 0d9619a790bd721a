//! End-to-end runs of the pipeline against a scripted model.

use std::sync::Arc;

use recipesnap_core::ai::prompts::{
    EXPAND_RECIPE_PROMPT_NAME, EXTRACT_INGREDIENTS_PROMPT_NAME, PROPOSE_RECIPES_PROMPT_NAME,
};
use recipesnap_core::ai::FakeAiClient;
use recipesnap_core::{
    execute, fallback_recipe, slugify, AiGateway, Event, ImageInput, InferenceError,
    MemoryRecipeStore, NoticeLevel, PipelineError, PipelineState, RecipeStore, Session, Stage,
};

const TOMATO_SOUP_IDEAS: &str =
    r#"{"recipes": [{"name": "Tomato Soup", "description": "A simple warm soup."}]}"#;

fn photo(bytes: &[u8]) -> ImageInput {
    ImageInput::new(bytes.to_vec(), "image/jpeg").unwrap()
}

fn setup(client: FakeAiClient) -> (Session, Arc<FakeAiClient>) {
    let client = Arc::new(client);
    let gateway = Arc::new(AiGateway::new(client.clone()));
    (Session::new(gateway), client)
}

fn ingredients(session: &Session) -> Vec<String> {
    session.state().visible_ingredients().unwrap().to_vec()
}

/// Photo in, ingredient list out.
#[tokio::test]
async fn test_scenario_extract_ingredients() {
    let (mut session, _client) = setup(FakeAiClient::new().with_response(
        EXTRACT_INGREDIENTS_PROMPT_NAME,
        r#"{"ingredients": ["tomato", "onion"]}"#,
    ));

    let image = photo(b"tomatoes and onions");
    session.capture(image.clone());
    session.analyze().await.unwrap();

    assert_eq!(session.stage(), Stage::Refine);
    assert_eq!(ingredients(&session), vec!["tomato", "onion"]);
    assert_eq!(session.state().image(), Some(&image));
}

/// Adding an existing ingredient with different casing changes nothing.
#[tokio::test]
async fn test_scenario_duplicate_ingredient() {
    let (mut session, _client) = setup(FakeAiClient::new().with_response(
        EXTRACT_INGREDIENTS_PROMPT_NAME,
        r#"{"ingredients": ["tomato", "onion"]}"#,
    ));
    session.capture(photo(b"a"));
    session.analyze().await.unwrap();

    session.add_ingredient("Tomato").unwrap();

    assert_eq!(ingredients(&session), vec!["tomato", "onion"]);
    let notice = session.notice().unwrap();
    assert_eq!(notice.message, "tomato is already in the list.");
    assert_eq!(notice.level, NoticeLevel::Info);
}

/// Ideas for the list, then the chosen idea expanded with the list as context.
#[tokio::test]
async fn test_scenario_ideas_then_recipe() {
    let (mut session, client) = setup(
        FakeAiClient::new()
            .with_response(
                EXTRACT_INGREDIENTS_PROMPT_NAME,
                r#"{"ingredients": ["tomato", "onion"]}"#,
            )
            .with_response(PROPOSE_RECIPES_PROMPT_NAME, TOMATO_SOUP_IDEAS)
            .with_response(
                EXPAND_RECIPE_PROMPT_NAME,
                r#"{
                    "id": "whatever-the-model-says",
                    "name": "Tomato Soup",
                    "description": "A simple warm soup.",
                    "ingredients": [{"name": "tomato", "quantity": "4", "unit": "pieces"}],
                    "instructions": ["Cut the tomatoes.", "Cook for 20 minutes."],
                    "prep_time": "10 minutes",
                    "cook_time": "20 minutes",
                    "servings": "2"
                }"#,
            ),
    );
    let image = photo(b"a");
    session.capture(image.clone());
    session.analyze().await.unwrap();
    session.request_ideas().await.unwrap();

    assert_eq!(session.stage(), Stage::Results);
    let ideas = session.state().visible_ideas().unwrap();
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].name, "Tomato Soup");

    let resolved = session.open_recipe(&ideas[0].name).await.unwrap();
    assert!(resolved.notice.is_none());
    assert_eq!(resolved.detail.id, "tomato-soup");
    assert_eq!(resolved.detail.source_image, Some(image));

    let expand = client
        .requests()
        .into_iter()
        .find(|r| r.prompt_name == EXPAND_RECIPE_PROMPT_NAME)
        .unwrap();
    let prompt = expand.request.prompt_text();
    assert!(prompt.contains("Tomato Soup"));
    assert!(prompt.contains("- tomato"));
    assert!(prompt.contains("- onion"));
    // The photo is not sent again.
    assert!(expand.request.messages.iter().all(|m| m.content.image_count() == 0));
}

/// A failing expansion still yields a recipe, plus a notice.
#[tokio::test]
async fn test_scenario_recipe_fallback() {
    let (session, _client) = setup(FakeAiClient::new().with_error(
        EXPAND_RECIPE_PROMPT_NAME,
        InferenceError::Api {
            status: 503,
            message: "overloaded".to_string(),
        },
    ));

    let resolved = session.open_recipe("Tomato Soup").await.unwrap();

    assert_eq!(resolved.detail.id, slugify("Tomato Soup"));
    assert_eq!(resolved.detail, fallback_recipe("Tomato Soup"));
    let notice = resolved.notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("overloaded"));
}

#[tokio::test]
async fn test_empty_ideas_is_a_result() {
    let (mut session, _client) = setup(
        FakeAiClient::new()
            .with_response(EXTRACT_INGREDIENTS_PROMPT_NAME, r#"{"ingredients": ["salt"]}"#)
            .with_response(PROPOSE_RECIPES_PROMPT_NAME, r#"{"recipes": []}"#),
    );
    session.capture(photo(b"a"));
    session.analyze().await.unwrap();
    session.request_ideas().await.unwrap();

    assert_eq!(session.stage(), Stage::Results);
    assert_eq!(session.state().visible_ideas(), Some(&[][..]));
    let notice = session.notice().unwrap();
    assert!(!notice.is_error());
    assert!(notice.message.starts_with("No recipe ideas found"));
}

/// A slow answer for the first photo arrives after a second photo was taken.
#[tokio::test]
async fn test_late_extraction_for_replaced_photo_is_discarded() {
    let client = Arc::new(
        FakeAiClient::new()
            .with_response(EXTRACT_INGREDIENTS_PROMPT_NAME, r#"{"ingredients": ["apple"]}"#),
    );
    let gateway = AiGateway::new(client);
    let mut state = PipelineState::new();

    state.handle(Event::ImageCaptured(photo(b"a"))).unwrap();
    let first = state.handle(Event::AnalyzeRequested).unwrap().unwrap();

    state.handle(Event::ImageCaptured(photo(b"b"))).unwrap();
    let second = state.handle(Event::AnalyzeRequested).unwrap().unwrap();

    let late = execute(&gateway, first).await;
    let err = state.handle(late).unwrap_err();
    assert!(matches!(err, PipelineError::Stale(_)));
    assert_eq!(state.stage(), Stage::Capture);
    assert!(state.visible_ingredients().is_none());

    let current = execute(&gateway, second).await;
    state.handle(current).unwrap();
    assert_eq!(state.stage(), Stage::Refine);
    assert_eq!(state.visible_ingredients().unwrap().to_vec(), vec!["apple"]);
}

/// Returning to an earlier view after changing the photo never shows old data.
#[tokio::test]
async fn test_back_navigation_after_photo_change() {
    let (mut session, _client) = setup(
        FakeAiClient::new()
            .with_response(EXTRACT_INGREDIENTS_PROMPT_NAME, r#"{"ingredients": ["tomato"]}"#)
            .with_response(PROPOSE_RECIPES_PROMPT_NAME, TOMATO_SOUP_IDEAS),
    );
    session.capture(photo(b"a"));
    session.analyze().await.unwrap();
    session.request_ideas().await.unwrap();
    assert_eq!(session.stage(), Stage::Results);

    session.capture(photo(b"b"));
    assert_eq!(session.navigate(Stage::Results), Stage::Capture);
    assert!(session.state().visible_ideas().is_none());
    assert!(session.notice().is_none());

    session.analyze().await.unwrap();
    assert_eq!(session.navigate(Stage::Results), Stage::Refine);
}

#[tokio::test]
async fn test_failed_analysis_can_be_retried() {
    let (mut session, client) = setup(
        FakeAiClient::new()
            .with_error(
                EXTRACT_INGREDIENTS_PROMPT_NAME,
                InferenceError::Transport("timed out".to_string()),
            )
            .with_response(EXTRACT_INGREDIENTS_PROMPT_NAME, r#"{"ingredients": ["egg"]}"#),
    );
    session.capture(photo(b"a"));

    session.analyze().await.unwrap();
    assert_eq!(session.stage(), Stage::Capture);
    assert_eq!(session.notice().unwrap().level, NoticeLevel::Error);

    session.analyze().await.unwrap();
    assert_eq!(session.stage(), Stage::Refine);
    assert_eq!(ingredients(&session), vec!["egg"]);
    assert_eq!(client.call_count(EXTRACT_INGREDIENTS_PROMPT_NAME), 2);
}

#[tokio::test]
async fn test_manual_list_to_saved_recipe() {
    let (mut session, _client) = setup(
        FakeAiClient::new()
            .with_response(PROPOSE_RECIPES_PROMPT_NAME, TOMATO_SOUP_IDEAS)
            .with_error(
                EXPAND_RECIPE_PROMPT_NAME,
                InferenceError::Transport("offline".to_string()),
            ),
    );
    session.start_manual();
    session.add_ingredient("tomato").unwrap();
    session.add_ingredient("basil").unwrap();
    session.remove_ingredient("BASIL").unwrap();
    session.request_ideas().await.unwrap();

    let name = session.state().visible_ideas().unwrap()[0].name.clone();
    let resolved = session.open_recipe(&name).await.unwrap();

    let mut store = MemoryRecipeStore::new();
    assert!(session.save_recipe(&mut store, &resolved.detail).unwrap());
    assert!(!session.save_recipe(&mut store, &resolved.detail).unwrap());
    assert!(store.contains("tomato-soup"));
}
