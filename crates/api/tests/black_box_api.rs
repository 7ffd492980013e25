use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use carestock_api::app::services::AppServices;
use carestock_auth::{JwtClaims, PrincipalId, SchoolRole};
use carestock_core::{ItemId, TenantId};
use carestock_forecast::ForecastPolicy;
use carestock_infra::read_model::InMemoryInventoryStore;
use carestock_inventory::{Category, ConsumptionRecord, InventoryItem, School};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;

const JWT_SECRET: &str = "test-secret";

struct Fixture {
    school_a: TenantId,
    school_b: TenantId,
    diapers_a: ItemId,
    paper_a: ItemId,
    diapers_b: ItemId,
}

/// School A: diapers with 15 days of deliveries (10/day) and paper with no
/// history. School B: diapers with no history.
fn seed(store: &InMemoryInventoryStore) -> Fixture {
    let now = Utc::now();
    let a = School::new("Creche Pelicano");
    let b = School::new("Creche Rouxinol");
    store.upsert_school(a.clone());
    store.upsert_school(b.clone());

    let diapers_a = InventoryItem::new(a.id, "Diapers", Category::DignityCritical, 10, "unit");
    let paper_a = InventoryItem::new(a.id, "Printer Paper", Category::Pedagogical, 100, "ream");
    let diapers_b = InventoryItem::new(b.id, "Diapers", Category::DignityCritical, 10, "unit");
    for item in [&diapers_a, &paper_a, &diapers_b] {
        store.upsert_item(item.clone()).unwrap();
    }
    for day in 1..=15 {
        store
            .append_record(ConsumptionRecord::delivered(a.id, diapers_a.id, 10, now - ChronoDuration::days(day)))
            .unwrap();
    }

    Fixture {
        school_a: a.id,
        school_b: b.id,
        diapers_a: diapers_a.id,
        paper_a: paper_a.id,
        diapers_b: diapers_b.id,
    }
}

struct TestServer {
    base_url: String,
    fixture: Fixture,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let store = Arc::new(InMemoryInventoryStore::new());
        let fixture = seed(&store);
        let services = Arc::new(AppServices::in_memory(store, ForecastPolicy::canonical()).unwrap());

        // Same router as prod, bound to an ephemeral port, no scheduled runner.
        let app = carestock_api::app::build_app(JWT_SECRET.to_string(), services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            fixture,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(role: SchoolRole, school_id: Option<TenantId>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        school_id,
        role,
        issued_at: now - ChronoDuration::seconds(5),
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn post(client: &reqwest::Client, url: String, token: &str) -> reqwest::Response {
    client.post(url).bearer_auth(token).send().await.unwrap()
}

async fn get(client: &reqwest::Client, url: String, token: &str) -> reqwest::Response {
    client.get(url).bearer_auth(token).send().await.unwrap()
}

#[tokio::test]
async fn health_is_public_and_whoami_requires_auth() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_reflects_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(SchoolRole::UnitDirector, Some(srv.fixture.school_a));

    let res = get(&client, srv.url("/whoami"), &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["role"], "UNIT_DIRECTOR");
    assert_eq!(body["school_id"].as_str().unwrap(), srv.fixture.school_a.to_string());
    assert_eq!(body["network"], false);
}

#[tokio::test]
async fn recompute_returns_prediction_and_persists_it() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let f = &srv.fixture;
    let token = mint_jwt(SchoolRole::UnitSecretary, Some(f.school_a));

    let res = post(
        &client,
        srv.url(&format!("/schools/{}/stock/items/{}/recompute", f.school_a, f.diapers_a)),
        &token,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let prediction: serde_json::Value = res.json().await.unwrap();
    assert_eq!(prediction["avg_daily_consumption"], 10.0);
    assert_eq!(prediction["days_remaining"], serde_json::json!({ "days": 1 }));
    assert_eq!(prediction["urgency"], "CRITICAL");
    assert_eq!(prediction["recommended_order"], 350);

    // Dashboard reads the persisted snapshot; paper was never computed.
    let res = get(&client, srv.url(&format!("/schools/{}/stock/dashboard", f.school_a)), &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let view: serde_json::Value = res.json().await.unwrap();
    assert_eq!(view["counts"]["critical"], 1);
    let stale: Vec<String> = view["stale_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(stale, vec![f.paper_a.to_string()]);

    let res = get(&client, srv.url(&format!("/schools/{}/stock/alerts", f.school_a)), &token).await;
    assert_eq!(res.status(), StatusCode::OK);
    let batch: serde_json::Value = res.json().await.unwrap();
    assert_eq!(batch["critical"].as_array().unwrap().len(), 1);
    assert_eq!(batch["critical"][0]["item_name"], "Diapers");
    assert!(batch["emergency"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn teacher_cannot_recompute() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let f = &srv.fixture;
    let token = mint_jwt(SchoolRole::Teacher, Some(f.school_a));

    let res = post(
        &client,
        srv.url(&format!("/schools/{}/stock/items/{}/recompute", f.school_a, f.diapers_a)),
        &token,
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Reads are fine for a teacher of the school.
    let res = get(&client, srv.url(&format!("/schools/{}/stock/dashboard", f.school_a)), &token).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn tenant_isolation_blocks_cross_school_access() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let f = &srv.fixture;
    let director_b = mint_jwt(SchoolRole::UnitDirector, Some(f.school_b));
    let secretary_a = mint_jwt(SchoolRole::UnitSecretary, Some(f.school_a));

    // Another school's dashboard is forbidden before the engine is reached.
    let res = get(&client, srv.url(&format!("/schools/{}/stock/dashboard", f.school_a)), &director_b).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");

    // B's item addressed under A does not exist.
    let res = post(
        &client,
        srv.url(&format!("/schools/{}/stock/items/{}/recompute", f.school_a, f.diapers_b)),
        &secretary_a,
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(SchoolRole::NetworkAdmin, None);

    let res = get(&client, srv.url("/schools/not-a-uuid/stock/alerts"), &token).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn network_summary_needs_a_network_role() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let f = &srv.fixture;

    let director = mint_jwt(SchoolRole::UnitDirector, Some(f.school_a));
    let res = get(&client, srv.url("/network/stock/summary"), &director).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let nutritionist = mint_jwt(SchoolRole::NetworkNutritionist, None);
    let res = get(&client, srv.url("/network/stock/summary"), &nutritionist).await;
    assert_eq!(res.status(), StatusCode::OK);
    let summary: serde_json::Value = res.json().await.unwrap();
    assert_eq!(summary["schools"].as_array().unwrap().len(), 2);
    assert_eq!(summary["totals"]["ok"], 3);
}

#[tokio::test]
async fn admin_refresh_runs_every_school() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let f = &srv.fixture;

    let psychologist = mint_jwt(SchoolRole::NetworkPsychologist, None);
    let res = post(&client, srv.url("/admin/stock/refresh?wait=true"), &psychologist).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin = mint_jwt(SchoolRole::NetworkAdmin, None);
    let res = post(&client, srv.url("/admin/stock/refresh?wait=true"), &admin).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "finished");
    assert_eq!(body["report"]["outcome"], "completed");
    assert_eq!(body["report"]["tenants"].as_array().unwrap().len(), 2);

    // B's diapers fell back to the category default and ran out.
    let res = get(&client, srv.url(&format!("/schools/{}/stock/alerts", f.school_b)), &admin).await;
    let batch: serde_json::Value = res.json().await.unwrap();
    assert_eq!(batch["emergency"].as_array().unwrap().len(), 1);
    assert_eq!(batch["emergency"][0]["item_id"].as_str().unwrap(), f.diapers_b.to_string());

    // No runner in this server: nothing to report from a scheduled pass.
    let res = get(&client, srv.url("/admin/stock/refresh"), &admin).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn single_school_refresh_leaves_others_untouched() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let f = &srv.fixture;
    let admin = mint_jwt(SchoolRole::NetworkAdmin, None);

    let res = post(
        &client,
        srv.url(&format!("/admin/stock/refresh?school_id={}", f.school_a)),
        &admin,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = get(&client, srv.url(&format!("/schools/{}/stock/dashboard", f.school_b)), &admin).await;
    let view: serde_json::Value = res.json().await.unwrap();
    assert_eq!(view["stale_items"].as_array().unwrap().len(), 1);
}
