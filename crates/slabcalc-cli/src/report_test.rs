use std::path::PathBuf;

use rust_decimal_macros::dec;
use slabcalc_core::{Environment, ProfitabilityModel};
use slabcalc_scraper::PageClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn card_page(rows: &str) -> String {
    format!(
        "<html><body><div id=\"full-prices\"><table>{rows}</table></div></body></html>"
    )
}

fn complete_card() -> String {
    card_page(
        "<tr><td>Ungraded</td><td>$10.00</td></tr>
         <tr><td>Grade 8</td><td>$20.00</td></tr>
         <tr><td>Grade 9</td><td>$40.00</td></tr>
         <tr><td>PSA 10</td><td>$100.00</td></tr>",
    )
}

fn listing(hrefs: &[&str]) -> String {
    let rows: String = hrefs
        .iter()
        .map(|href| format!("<tr><td class=\"title\"><a href=\"{href}\">card</a></td></tr>\n"))
        .collect();
    format!("<table id=\"games_table\">\n{rows}</table>")
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn plain_source() -> PageSource {
    PageSource::Plain(PageClient::new(5, "slabcalc-test/0.1").expect("client"))
}

fn test_config(server: &MockServer, output_dir: PathBuf) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        base_origin: server.uri(),
        set_url_prefix: format!("{}/console/", server.uri()),
        fetch_mode: FetchMode::Plain,
        webdriver_url: "http://localhost:9515".to_string(),
        scroll_delay_ms: 0,
        max_scroll_iterations: 5,
        request_timeout_secs: 5,
        user_agent: "slabcalc-test/0.1".to_string(),
        output_dir,
        profitability: ProfitabilityModel::default(),
    }
}

fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("slabcalc-{label}-{}", std::process::id()))
}

#[tokio::test]
async fn card_missing_a_grade_is_left_out_of_report() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/console/test-set",
        200,
        listing(&["/game/test-set/card-a", "/game/test-set/card-b"]),
    )
    .await;
    mount_page(&server, "/game/test-set/card-a", 200, complete_card()).await;
    mount_page(
        &server,
        "/game/test-set/card-b",
        200,
        card_page(
            "<tr><td>Ungraded</td><td>$10.00</td></tr>
             <tr><td>Grade 8</td><td>$20.00</td></tr>
             <tr><td>Grade 9</td><td>$40.00</td></tr>
             <tr><td>PSA 10</td><td>-</td></tr>",
        ),
    )
    .await;

    let base = Url::parse(&server.uri()).unwrap();
    let (report, totals) = build_report(
        &plain_source(),
        &format!("{}/console/test-set", server.uri()),
        &base,
        &ProfitabilityModel::default(),
        "Test-Set",
    )
    .await
    .expect("report should build");

    assert_eq!(report.len(), 1);
    let row = &report.rows[0];
    assert_eq!(
        row.record.identifier,
        format!("{}/game/test-set/card-a", server.uri())
    );
    assert_eq!(row.expected_profit, dec!(75));
    assert_eq!(
        totals,
        ReportTotals {
            discovered: 2,
            included: 1,
            skipped: 1,
        }
    );
}

#[tokio::test]
async fn failing_cards_are_skipped_without_aborting() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/console/test-set",
        200,
        listing(&[
            "/game/test-set/gone",
            "/game/test-set/no-prices",
            "/game/test-set/broken",
            "/game/test-set/good",
        ]),
    )
    .await;
    mount_page(&server, "/game/test-set/gone", 404, String::new()).await;
    mount_page(
        &server,
        "/game/test-set/no-prices",
        200,
        "<html><body>Nothing here</body></html>".to_string(),
    )
    .await;
    mount_page(&server, "/game/test-set/broken", 500, String::new()).await;
    mount_page(&server, "/game/test-set/good", 200, complete_card()).await;

    let base = Url::parse(&server.uri()).unwrap();
    let (report, totals) = build_report(
        &plain_source(),
        &format!("{}/console/test-set", server.uri()),
        &base,
        &ProfitabilityModel::default(),
        "Test-Set",
    )
    .await
    .unwrap();

    assert_eq!(report.len(), 1);
    assert!(report.rows[0].record.identifier.ends_with("/game/test-set/good"));
    assert_eq!(totals.skipped, 3);
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, "/console/missing-set", 404, String::new()).await;

    let base = Url::parse(&server.uri()).unwrap();
    let err = build_report(
        &plain_source(),
        &format!("{}/console/missing-set", server.uri()),
        &base,
        &ProfitabilityModel::default(),
        "Missing-Set",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }));
}

#[tokio::test]
async fn empty_listing_yields_empty_report() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/console/empty-set",
        200,
        "<html><body>No cards</body></html>".to_string(),
    )
    .await;

    let base = Url::parse(&server.uri()).unwrap();
    let (report, totals) = build_report(
        &plain_source(),
        &format!("{}/console/empty-set", server.uri()),
        &base,
        &ProfitabilityModel::default(),
        "Empty-Set",
    )
    .await
    .unwrap();
    assert!(report.is_empty());
    assert_eq!(totals, ReportTotals::default());
}

#[tokio::test]
async fn run_report_writes_titled_csv() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/console/pokemon-test-set",
        200,
        listing(&["/game/pokemon-test-set/card-a"]),
    )
    .await;
    mount_page(&server, "/game/pokemon-test-set/card-a", 200, complete_card()).await;

    let dir = scratch_dir("run-report");
    let config = test_config(&server, dir.clone());

    let written = run_report(&config, "pokemon-test-set", FetchMode::Plain, &dir)
        .await
        .expect("report should be written");

    assert_eq!(written, dir.join("Pokemon-Test-Set.csv"));
    let csv = std::fs::read_to_string(&written).unwrap();
    let expected = format!(
        "Card URL,Raw Price,PSA 8 Price,PSA 9 Price,PSA 10 Price,Expected Profit\r\n\
         {}/game/pokemon-test-set/card-a,10,20,40,100,75.00\r\n",
        server.uri()
    );
    assert_eq!(csv, expected);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn run_report_fails_when_listing_unreachable() {
    let server = MockServer::start().await;
    mount_page(&server, "/console/down", 503, String::new()).await;

    let dir = scratch_dir("run-report-down");
    let config = test_config(&server, dir.clone());

    let err = run_report(&config, "down", FetchMode::Plain, &dir)
        .await
        .unwrap_err();
    assert!(
        format!("{err:#}").contains("failed to load set listing"),
        "unexpected error: {err:#}"
    );
    assert!(!dir.join("Down.csv").exists());
}
