//! End-to-end tests of the console routes over a fake data API.
//!
//! Run with: cargo test --package srb-web --test console_routes

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use srb_engine::testing::{sample_dataset, FakeDataApi, Failure};
use srb_engine::{Console, ConsoleSettings};
use srb_web::router::build_router;
use srb_web::state::AppState;

async fn serve() -> (Arc<FakeDataApi>, SocketAddr) {
    let api = Arc::new(FakeDataApi::new(sample_dataset()));
    let console = Console::load(api.clone(), ConsoleSettings::default()).await.unwrap();
    let app = build_router(AppState::new(console));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (api, addr)
}

async fn get_text(addr: SocketAddr, path: &str) -> (u16, String) {
    let resp = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.text().await.unwrap())
}

async fn post_form(addr: SocketAddr, path: &str, form: &[(&str, &str)]) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{}{}", addr, path))
        .form(form)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_region_query_without_region_is_rejected_before_any_call() {
    let (api, addr) = serve().await;
    let before = api.calls();

    let (status, body) = get_text(addr, "/query/region?region_id=&year=2020").await;
    assert_eq!(status, 400);
    let notice: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(notice["ok"], false);
    assert_eq!(notice["message"], "Please select a region.");
    assert_eq!(api.calls(), before);
}

#[tokio::test]
async fn test_empty_result_renders_placeholder_row() {
    let (_api, addr) = serve().await;

    let (status, html) = get_text(addr, "/query/subregion?sub_region_id=99").await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"<tbody><tr><td colspan="3">No data found</td></tr></tbody>"#), "{}", html);

    let (_, html) = get_text(addr, "/query/search?keyword=zzz").await;
    assert!(html.contains("Not found"));
}

#[tokio::test]
async fn test_region_query_rows() {
    let (_api, addr) = serve().await;
    let (status, html) = get_text(addr, "/query/region?region_id=1&year=2019").await;
    assert_eq!(status, 200);
    assert!(html.contains("<tr><td>Eastern Asia</td><td>1.11</td></tr>"), "{}", html);
    assert!(html.contains("<tr><td>Southern Asia</td><td>1.02</td></tr>"), "{}", html);
}

#[tokio::test]
async fn test_add_then_query_country_series() {
    let (_api, addr) = serve().await;

    let (status, notice) = post_form(addr, "/manage/add", &[("country_id", "7"), ("value", "1.05")]).await;
    assert_eq!(status, 200);
    assert_eq!(notice["message"], "Added successfully: Westmark - 2022");

    let (_, html) = get_text(addr, "/query/country?country_id=7").await;
    assert!(html.ends_with("<tr><td>2022</td><td>1.05</td></tr></tbody></table>"), "{}", html);

    let (_, body) = get_text(addr, "/manage/latest-year?country_id=7").await;
    let latest: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(latest["label"], "2022");
}

#[tokio::test]
async fn test_add_with_missing_value_is_validation_error() {
    let (api, addr) = serve().await;
    let (status, notice) = post_form(addr, "/manage/add", &[("country_id", "7"), ("value", "")]).await;
    assert_eq!(status, 400);
    assert_eq!(notice["message"], "Please fill in all fields.");
    assert_eq!(api.calls().add, 0);
}

#[tokio::test]
async fn test_update_then_query() {
    let (_api, addr) = serve().await;

    let (status, notice) = post_form(
        addr,
        "/manage/update",
        &[("country_id", "3"), ("year", "2019"), ("value", "1.10")],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(notice["message"], "Updated successfully");

    let (_, html) = get_text(addr, "/query/country?country_id=3").await;
    assert!(html.contains("<tr><td>2018</td><td>1.03</td></tr><tr><td>2019</td><td>1.1</td></tr>"), "{}", html);

    let (_, body) = get_text(addr, "/manage/years?country_id=3").await;
    let options: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(options[1]["label"], "2019 (Val: 1.1)");
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let (_api, addr) = serve().await;
    let (status, notice) = post_form(
        addr,
        "/manage/update",
        &[("country_id", "3"), ("year", "1990"), ("value", "1.0")],
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(notice["message"], "Record not found.");
}

#[tokio::test]
async fn test_delete_range_then_query() {
    let (_api, addr) = serve().await;

    let (status, notice) = post_form(
        addr,
        "/manage/delete",
        &[("country_id", "5"), ("start_year", "2019"), ("end_year", "2020")],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(notice["message"], "Deleted 2 record(s).");

    let (_, html) = get_text(addr, "/query/country?country_id=5").await;
    assert!(html.contains("<tbody><tr><td>2018</td><td>1.1</td></tr><tr><td>2021</td><td>1.13</td></tr><tr><td>2022</td><td>1.14</td></tr></tbody>"), "{}", html);
}

#[tokio::test]
async fn test_remote_failure_is_reported_and_mirror_kept() {
    let (api, addr) = serve().await;
    api.fail_next(Failure::Delete);

    let (status, notice) = post_form(
        addr,
        "/manage/delete",
        &[("country_id", "5"), ("start_year", "2018"), ("end_year", "2022")],
    )
    .await;
    assert_eq!(status, 502);
    assert_eq!(notice["message"], "Failed to delete records.");

    let (_, body) = get_text(addr, "/health").await;
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["observations"], 9);
}

#[tokio::test]
async fn test_dashboard_and_health() {
    let (_api, addr) = serve().await;

    let (status, html) = get_text(addr, "/").await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"<option value="5">Eastland</option>"#));

    let (_, body) = get_text(addr, "/health").await;
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["countries"], 4);
    assert_eq!(health["regions"], 2);
}

#[tokio::test]
async fn test_reload_picks_up_remote_rows() {
    let (api, addr) = serve().await;
    api.insert_remote(9, 2020, 1.01);

    let (_, body) = get_text(addr, "/manage/latest-year?country_id=9").await;
    let latest: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(latest["label"], "--");

    let (status, notice) = post_form(addr, "/manage/reload", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(notice["message"], "Data reloaded.");

    let (_, body) = get_text(addr, "/manage/latest-year?country_id=9").await;
    let latest: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(latest["latest_year"], 2020);
}

#[tokio::test]
async fn test_failed_reload_reports_load_error() {
    let (api, addr) = serve().await;
    api.fail_next(Failure::ListCountries);

    let (status, notice) = post_form(addr, "/manage/reload", &[]).await;
    assert_eq!(status, 502);
    assert_eq!(notice["message"], "Error loading data from database. Check console for details.");
}
