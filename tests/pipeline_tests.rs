//! Integration tests for the pipeline
//!
//! These tests use wiremock to create mock documentation sites and run
//! the full fetch -> extract -> convert -> assemble cycle end-to-end.

use docstitch::config::{Config, FetchConfig, OutputConfig, PageEntry, SiteConfig};
use docstitch::pipeline::{Coordinator, RunState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, pages: Vec<(&str, &str)>, output_dir: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            index_path: None,
            content_selector: "article.md-content__inner".to_string(),
            nav_selector: "nav.md-nav--primary".to_string(),
        },
        fetch: FetchConfig::default(),
        output: OutputConfig {
            directory: output_dir.to_string(),
            filename: "reference.md".to_string(),
            title: "Test Reference".to_string(),
        },
        pages: pages
            .into_iter()
            .map(|(title, url)| PageEntry {
                title: title.to_string(),
                url: url.to_string(),
            })
            .collect(),
    }
}

/// Mounts a documentation page with the given content inside the
/// standard content container
async fn mount_page(server: &MockServer, url_path: &str, content: &str) {
    let body = format!(
        r#"<html><body>
        <nav class="md-nav--primary"><a href="/other">Other</a></nav>
        <article class="md-content__inner">{}</article>
        <footer>footer boilerplate</footer>
        </body></html>"#,
        content
    );

    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn run_pipeline(config: Config) -> (docstitch::pipeline::RunReport, String) {
    let mut coordinator =
        Coordinator::new(config, "2026-08-27".to_string()).expect("failed to create coordinator");
    let report = coordinator.run().await.expect("run failed");
    assert_eq!(coordinator.state(), RunState::Completed);
    let document = std::fs::read_to_string(&report.output_path).expect("output file missing");
    (report, document)
}

#[tokio::test]
async fn test_single_page_document_layout() {
    let server = MockServer::start().await;
    mount_page(&server, "/reference/border/", "<h2>Styles</h2><p>Text</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![("Border", "/reference/border/")],
        dir.path().to_str().unwrap(),
    );

    let (report, document) = run_pipeline(config).await;

    assert_eq!(report.appended(), 1);
    assert_eq!(report.skipped(), 0);

    // Frontmatter with injected date
    assert!(document.starts_with("---\ntitle: Test Reference\ndate: 2026-08-27\n---\n"));

    // Document title and TOC
    assert!(document.contains("# Test Reference\n"));
    assert!(document.contains("## Table of Contents\n"));

    // Lead heading with anchor, TOC entry pointing at it
    assert!(document.contains("## Border {#border}"));
    assert!(document.contains("- [Border](#border)\n"));

    // Content heading nests under the lead heading
    assert!(document.contains("### Styles {#styles}"));
    assert!(document.contains("  - [Styles](#styles)\n"));
    assert!(document.contains("Text"));
}

#[tokio::test]
async fn test_duplicate_headings_get_suffixed_anchors() {
    let server = MockServer::start().await;
    mount_page(&server, "/reference/background/", "<h2>Color</h2><p>One</p>").await;
    mount_page(&server, "/reference/foreground/", "<h2>Color</h2><p>Two</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![
            ("Background", "/reference/background/"),
            ("Foreground", "/reference/foreground/"),
        ],
        dir.path().to_str().unwrap(),
    );

    let (_, document) = run_pipeline(config).await;

    // First occurrence keeps the bare slug, second gets -2
    assert!(document.contains("### Color {#color}"));
    assert!(document.contains("### Color {#color-2}"));

    // Both appear distinctly in the TOC
    assert!(document.contains("- [Color](#color)\n"));
    assert!(document.contains("- [Color](#color-2)\n"));
}

#[tokio::test]
async fn test_duplicate_page_titles_get_suffixed_section_anchors() {
    let server = MockServer::start().await;
    mount_page(&server, "/reference/border/", "<p>Widget borders.</p>").await;
    mount_page(&server, "/styles/border/", "<p>CSS borders.</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![
            ("Border", "/reference/border/"),
            ("Border", "/styles/border/"),
        ],
        dir.path().to_str().unwrap(),
    );

    let (_, document) = run_pipeline(config).await;

    assert!(document.contains("## Border {#border}"));
    assert!(document.contains("## Border {#border-2}"));
    assert!(document.contains("- [Border](#border)\n"));
    assert!(document.contains("- [Border](#border-2)\n"));
}

#[tokio::test]
async fn test_toc_order_matches_page_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/a/", "<h2>Alpha Topic</h2>").await;
    mount_page(&server, "/b/", "<h2>Beta Topic</h2>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![("Alpha", "/a/"), ("Beta", "/b/")],
        dir.path().to_str().unwrap(),
    );

    let (_, document) = run_pipeline(config).await;

    let alpha = document.find("- [Alpha](#alpha)").unwrap();
    let beta = document.find("- [Beta](#beta)").unwrap();
    assert!(alpha < beta);

    let alpha_body = document.find("## Alpha {#alpha}").unwrap();
    let beta_body = document.find("## Beta {#beta}").unwrap();
    assert!(alpha_body < beta_body);
}

#[tokio::test]
async fn test_failing_page_is_skipped_without_reordering() {
    let server = MockServer::start().await;
    mount_page(&server, "/first/", "<h2>First Topic</h2><p>first body</p>").await;
    // /missing/ is not mounted: 404
    mount_page(&server, "/third/", "<h2>Third Topic</h2><p>third body</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![
            ("First", "/first/"),
            ("Missing", "/missing/"),
            ("Third", "/third/"),
        ],
        dir.path().to_str().unwrap(),
    );

    let (report, document) = run_pipeline(config).await;

    assert_eq!(report.appended(), 2);
    assert_eq!(report.skipped(), 1);
    assert!(report.pages[1].1.is_skipped());

    // Remaining sections keep their order and content
    let first = document.find("first body").unwrap();
    let third = document.find("third body").unwrap();
    assert!(first < third);
    assert!(!document.contains("## Missing"));
    assert!(!document.contains("[Missing]"));
}

#[tokio::test]
async fn test_link_to_skipped_page_stays_absolute() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/reference/border/",
        r#"<p>See <a href="/reference/missing/">missing page</a>.</p>"#,
    )
    .await;
    // /reference/missing/ is not mounted: 404

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![
            ("Border", "/reference/border/"),
            ("Missing", "/reference/missing/"),
        ],
        dir.path().to_str().unwrap(),
    );

    let (report, document) = run_pipeline(config).await;

    assert_eq!(report.appended(), 1);
    assert_eq!(report.skipped(), 1);

    // The skipped page has no section, so its anchor must not exist and
    // the link keeps pointing at the absolute URL
    assert!(document.contains(&format!(
        "[missing page]({}/reference/missing/)",
        server.uri()
    )));
    assert!(!document.contains("(#missing)"));
    assert!(!document.contains("{#missing}"));
}

#[tokio::test]
async fn test_heading_reuses_skipped_page_title_slug() {
    let server = MockServer::start().await;
    mount_page(&server, "/reference/layout/", "<h2>Widgets</h2><p>Body</p>").await;
    // /reference/widgets/ is not mounted: 404

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![
            ("Widgets", "/reference/widgets/"),
            ("Layout", "/reference/layout/"),
        ],
        dir.path().to_str().unwrap(),
    );

    let (report, document) = run_pipeline(config).await;

    assert_eq!(report.skipped(), 1);

    // The skipped page never claimed "widgets", so the body heading keeps
    // the bare slug instead of a numeric suffix
    assert!(document.contains("### Widgets {#widgets}"));
    assert!(!document.contains("widgets-2"));
}

#[tokio::test]
async fn test_table_column_count_preserved() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/table/",
        "<h2>Values</h2>\
         <table>\
         <tr><th>Name</th><th>Type</th><th>Default</th></tr>\
         <tr><td>border</td><td>Border</td><td>none</td></tr>\
         <tr><td>color | tint</td><td>Color</td><td>white</td></tr>\
         </table>",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![("Tables", "/table/")],
        dir.path().to_str().unwrap(),
    );

    let (_, document) = run_pipeline(config).await;

    // Every table row, separator included, has exactly three columns
    for line in document.lines().filter(|l| l.starts_with('|')) {
        assert_eq!(line.matches(" | ").count(), 2, "bad row: {}", line);
    }
    assert!(document.contains("color \\| tint"));
}

#[tokio::test]
async fn test_relative_links_rewritten_to_anchors() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/reference/border/",
        r#"<h2>Usage</h2><p>See <a href="../color/">the color page</a> and <a href="/guide/">the guide</a>.</p>"#,
    )
    .await;
    mount_page(&server, "/reference/color/", "<p>Colors.</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![
            ("Border", "/reference/border/"),
            ("Color", "/reference/color/"),
        ],
        dir.path().to_str().unwrap(),
    );

    let (_, document) = run_pipeline(config).await;

    // Link to a collected page becomes an in-document anchor
    assert!(document.contains("[the color page](#color)"));
    // Link outside the run stays an absolute URL
    assert!(document.contains(&format!("[the guide]({}/guide/)", server.uri())));
}

#[tokio::test]
async fn test_pipeline_output_is_deterministic() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/page/",
        "<h2>Topic</h2><p>Body</p><ul><li>one</li><li>two</li></ul>",
    )
    .await;

    let make_config = |dir: &str| create_test_config(&server.uri(), vec![("Page", "/page/")], dir);

    let dir1 = tempfile::tempdir().unwrap();
    let dir2 = tempfile::tempdir().unwrap();
    let (_, doc1) = run_pipeline(make_config(dir1.path().to_str().unwrap())).await;
    let (_, doc2) = run_pipeline(make_config(dir2.path().to_str().unwrap())).await;

    assert_eq!(doc1, doc2);
}

#[tokio::test]
async fn test_discovery_from_index_nav() {
    let server = MockServer::start().await;

    let index_body = r##"<html><body>
        <nav class="md-nav--primary">
            <ul>
                <li><a href="/reference/border/">Border</a></li>
                <li><a href="/reference/color/">Color</a></li>
                <li><a href="#skip">Skip me</a></li>
            </ul>
        </nav>
        <article class="md-content__inner"><p>index</p></article>
        </body></html>"##;

    Mock::given(method("GET"))
        .and(path("/reference/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(index_body, "text/html"))
        .mount(&server)
        .await;

    mount_page(&server, "/reference/border/", "<p>border content</p>").await;
    mount_page(&server, "/reference/color/", "<p>color content</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&server.uri(), vec![], dir.path().to_str().unwrap());
    config.site.index_path = Some("/reference/".to_string());

    let (report, document) = run_pipeline(config).await;

    assert_eq!(report.appended(), 2);
    assert!(document.contains("## Border {#border}"));
    assert!(document.contains("## Color {#color}"));
    assert!(document.contains("border content"));
    assert!(document.contains("color content"));
}

#[tokio::test]
async fn test_page_without_container_is_skipped() {
    let server = MockServer::start().await;

    // Error page without the content container
    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><h1>Oops</h1></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    mount_page(&server, "/good/", "<p>good content</p>").await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![("Broken", "/broken/"), ("Good", "/good/")],
        dir.path().to_str().unwrap(),
    );

    let (report, document) = run_pipeline(config).await;

    assert_eq!(report.appended(), 1);
    assert_eq!(report.skipped(), 1);
    assert!(document.contains("good content"));
    assert!(!document.contains("Oops"));
}

#[tokio::test]
async fn test_all_pages_skipped_still_writes_document() {
    let server = MockServer::start().await;
    // Nothing mounted: every fetch is a 404

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(
        &server.uri(),
        vec![("Gone", "/gone/")],
        dir.path().to_str().unwrap(),
    );

    let (report, document) = run_pipeline(config).await;

    assert_eq!(report.appended(), 0);
    assert_eq!(report.skipped(), 1);
    assert!(document.contains("# Test Reference"));
    assert!(document.contains("## Table of Contents"));
}
