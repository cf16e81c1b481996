//! Integration tests for the full per-page analysis pipeline.
//!
//! These tests verify the whole chain against a mock fetcher and an
//! in-memory store:
//! 1. Fetch markup
//! 2. Normalize and segment
//! 3. Fingerprint each block
//! 4. Fold blocks into the shared pattern library

use uuid::Uuid;

use mining::{
    analyze_page,
    testing::{MockFailure, MockFetcher},
    AnalysisError, CanonicalType, FetchError, MemoryStore, PatternStore,
};

const HOME: &str = r#"
    <html>
    <head>
        <title>Acme Corp</title>
        <script>analytics.track("home");</script>
    </head>
    <body>
        <nav class="main-menu">menu</nav>
        <main>
            <div class="hero"><h1>Welcome</h1><p>We make anvils</p></div>
            <div class="content"><p>Intro paragraph</p><p>Second paragraph</p></div>
        </main>
        <footer>footer</footer>
    </body>
    </html>
"#;

const ABOUT: &str = r#"
    <html>
    <head><title>About Acme</title></head>
    <body>
        <main>
            <!-- same hero markup shape, different copy -->
            <div class="hero"><h1>Our Story</h1><p>Founded 1887</p></div>
            <ul class="team"><li>Jo</li><li>Sam</li></ul>
        </main>
    </body>
    </html>
"#;

#[tokio::test]
async fn test_shared_block_shape_collapses_to_one_pattern() {
    let project_id = Uuid::new_v4();
    let store = MemoryStore::new();
    let fetcher = MockFetcher::new()
        .with_page("https://acme.test/", HOME)
        .with_page("https://acme.test/about", ABOUT);

    let home = analyze_page(project_id, "https://acme.test/", &fetcher, &store)
        .await
        .unwrap();
    let about = analyze_page(project_id, "https://acme.test/about", &fetcher, &store)
        .await
        .unwrap();

    assert_eq!(home.blocks_folded, 2);
    assert_eq!(home.title.as_deref(), Some("Acme Corp"));
    assert_eq!(about.blocks_folded, 2);

    let patterns = store.list_patterns(project_id).await.unwrap();

    // hero (x2), content div (x1), team list (x1)
    assert_eq!(patterns.len(), 3);

    let hero = patterns
        .iter()
        .find(|p| p.signature == "DIV > [H1, P]")
        .expect("hero pattern");
    assert_eq!(hero.frequency, 2);
    assert_eq!(hero.canonical_type, CanonicalType::Unknown);

    // Frequency-descending order puts the shared shape first
    assert_eq!(patterns[0].id, hero.id);
}

#[tokio::test]
async fn test_first_seen_example_survives_later_pages() {
    let project_id = Uuid::new_v4();
    let store = MemoryStore::new();
    let fetcher = MockFetcher::new()
        .with_page("https://acme.test/", HOME)
        .with_page("https://acme.test/about", ABOUT);

    analyze_page(project_id, "https://acme.test/", &fetcher, &store)
        .await
        .unwrap();
    analyze_page(project_id, "https://acme.test/about", &fetcher, &store)
        .await
        .unwrap();

    let patterns = store.list_patterns(project_id).await.unwrap();
    let hero = patterns
        .iter()
        .find(|p| p.signature == "DIV > [H1, P]")
        .unwrap();

    // The example comes from the first page, not the most recent fold
    assert!(hero.example_html.contains("Welcome"));
    assert!(!hero.example_html.contains("Our Story"));
}

#[tokio::test]
async fn test_fetch_failure_folds_nothing() {
    let project_id = Uuid::new_v4();
    let store = MemoryStore::new();
    let fetcher =
        MockFetcher::new().with_failure("https://acme.test/broken", MockFailure::Timeout);

    let err = analyze_page(project_id, "https://acme.test/broken", &fetcher, &store)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::Fetch(FetchError::Timeout { .. })
    ));
    assert_eq!(store.pattern_count(), 0);
}

#[tokio::test]
async fn test_failed_then_successful_page_counts_once() {
    let project_id = Uuid::new_v4();
    let store = MemoryStore::new();
    let fetcher = MockFetcher::new()
        .with_page("https://acme.test/", HOME)
        .with_failure("https://acme.test/", MockFailure::Status(503));

    assert!(
        analyze_page(project_id, "https://acme.test/", &fetcher, &store)
            .await
            .is_err()
    );

    // Recovery: the block list is computed before any store write, so
    // the retry starts from zero rather than double-counting.
    fetcher.clear_failure("https://acme.test/");
    analyze_page(project_id, "https://acme.test/", &fetcher, &store)
        .await
        .unwrap();

    let patterns = store.list_patterns(project_id).await.unwrap();
    assert!(patterns.iter().all(|p| p.frequency == 1));
}

#[tokio::test]
async fn test_page_without_content_blocks_is_not_an_error() {
    let project_id = Uuid::new_v4();
    let store = MemoryStore::new();
    let fetcher = MockFetcher::new().with_page(
        "https://acme.test/empty",
        "<html><head><title>Empty</title></head><body><main></main></body></html>",
    );

    let analysis = analyze_page(project_id, "https://acme.test/empty", &fetcher, &store)
        .await
        .unwrap();

    assert_eq!(analysis.blocks_folded, 0);
    assert_eq!(store.pattern_count(), 0);
}

#[tokio::test]
async fn test_projects_are_isolated() {
    let store = MemoryStore::new();
    let fetcher = MockFetcher::new().with_page("https://acme.test/", HOME);

    let project_a = Uuid::new_v4();
    let project_b = Uuid::new_v4();

    analyze_page(project_a, "https://acme.test/", &fetcher, &store)
        .await
        .unwrap();
    analyze_page(project_b, "https://acme.test/", &fetcher, &store)
        .await
        .unwrap();

    let a = store.list_patterns(project_a).await.unwrap();
    let b = store.list_patterns(project_b).await.unwrap();

    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 2);
    assert!(a.iter().all(|p| p.frequency == 1));
    assert!(b.iter().all(|p| p.frequency == 1));
}
