use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DayRecord {
    demandas: u64,
    acessos: u64,
}

#[derive(Debug, Deserialize)]
struct DayRow {
    data: String,
    demandas: u64,
    acessos: u64,
}

#[derive(Debug, Deserialize)]
struct WeekTotals {
    demandas: u64,
    acessos: u64,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    today: String,
    week_start: String,
    week_starts_on: u8,
    today_record: DayRecord,
    week_rows: Vec<DayRow>,
    week_totals: WeekTotals,
}

struct TestServer {
    base_url: String,
    child: Child,
    data_dir: tempfile::TempDir,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        PIDS.lock().unwrap().push(pid as i32);
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(seed: Option<&str>) -> TestServer {
    let port = pick_free_port();
    let data_dir = tempfile::tempdir().expect("temp data dir");
    if let Some(raw) = seed {
        std::fs::write(data_dir.path().join("detran_counter_v1.json"), raw).unwrap();
    }

    let child = Command::new(env!("CARGO_BIN_EXE_detran_counter"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir.path())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        child,
        data_dir,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(None).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_state(client: &Client, server: &TestServer) -> StateResponse {
    client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_update(client: &Client, server: &TestServer, field: &str, delta: i64) -> reqwest::Response {
    client
        .post(format!("{}/api/update", server.base_url))
        .json(&serde_json::json!({ "field": field, "delta": delta }))
        .send()
        .await
        .unwrap()
}

fn stored_document(server: &TestServer) -> serde_json::Value {
    let path = server.data_dir.path().join("detran_counter_v1.json");
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn http_update_adds_to_today_and_week() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_state(&client, &server).await;

    let response = post_update(&client, &server, "demandas", 5).await;
    assert!(response.status().is_success());
    let after: StateResponse = response.json().await.unwrap();

    assert_eq!(after.today_record.demandas, before.today_record.demandas + 5);
    assert_eq!(after.today_record.acessos, before.today_record.acessos);
    assert_eq!(after.week_totals.demandas, before.week_totals.demandas + 5);
    assert_eq!(after.week_rows.last().unwrap().data, after.today);
    assert!(after.week_start <= after.today);

    let stored = stored_document(&server);
    assert_eq!(
        stored["history"][&after.today]["demandas"],
        after.today_record.demandas
    );
}

#[tokio::test]
async fn http_decrement_never_goes_negative() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let reset: StateResponse = client
        .post(format!("{}/api/reset/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset.today_record.demandas, 0);
    assert_eq!(reset.today_record.acessos, 0);

    let after: StateResponse = post_update(&client, &server, "acessos", -1)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(after.today_record.acessos, 0);
}

#[tokio::test]
async fn http_rejects_unknown_field_and_zero_delta() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = post_update(&client, &server, "cliques", 1).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let response = post_update(&client, &server, "demandas", 0).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_toggle_week_start_flips_setting() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_state(&client, &server).await;
    let toggled: StateResponse = client
        .post(format!("{}/api/settings/toggle-week-start", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled.week_starts_on, 1 - before.week_starts_on);
    assert_eq!(stored_document(&server)["settings"]["weekStartsOn"], toggled.week_starts_on);

    let restored: StateResponse = client
        .post(format!("{}/api/settings/toggle-week-start", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(restored.week_starts_on, before.week_starts_on);
    assert_eq!(restored.week_start, before.week_start);
}

#[tokio::test]
async fn http_reset_week_zeroes_totals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post_update(&client, &server, "acessos", 10).await;
    let state: StateResponse = client
        .post(format!("{}/api/reset/week", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(state.week_totals.demandas, 0);
    assert_eq!(state.week_totals.acessos, 0);
    assert!(state.week_rows.iter().all(|row| row.demandas == 0 && row.acessos == 0));
}

#[tokio::test]
async fn http_exports_csv_downloads() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let state = get_state(&client, &server).await;

    let response = client
        .get(format!("{}/export/week.csv", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert_eq!(
        disposition,
        format!(
            "attachment; filename=\"contador_detransp_semana_{}_a_{}.csv\"",
            state.week_start, state.today
        )
    );
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/csv"));
    let body = response.text().await.unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("data,demandas,acessos"));
    assert_eq!(lines.count(), state.week_rows.len());

    let response = client
        .get(format!("{}/export/all.csv", server.base_url))
        .send()
        .await
        .unwrap();
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.contains(&format!("contador_detransp_todos_{}.csv", state.today)));
    let body = response.text().await.unwrap();
    assert!(body.starts_with("data,demandas,acessos\n"));
    assert!(body.contains(&state.today));
}

#[tokio::test]
async fn http_index_renders_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Contador DETRAN-SP"));
    assert!(!body.contains("{{"));
}

#[tokio::test]
async fn http_malformed_storage_starts_with_defaults() {
    let server = spawn_server(Some("{this is not json")).await;
    let client = Client::new();

    let state = get_state(&client, &server).await;
    assert_eq!(state.week_starts_on, 1);
    assert_eq!(state.today_record.demandas, 0);
    assert_eq!(state.week_totals.acessos, 0);

    let stored = stored_document(&server);
    let history = stored["history"].as_object().unwrap();
    assert_eq!(history.len(), 1);
    assert!(history.contains_key(&state.today));
}

#[tokio::test]
async fn http_existing_storage_is_kept() {
    let seed = r#"{"settings":{"weekStartsOn":0},"history":{"2020-01-01":{"demandas":4,"acessos":2}},"note":"kept"}"#;
    let server = spawn_server(Some(seed)).await;
    let client = Client::new();

    let state = get_state(&client, &server).await;
    assert_eq!(state.week_starts_on, 0);

    let body = client
        .get(format!("{}/export/all.csv", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let mut lines = body.lines().skip(1);
    assert_eq!(lines.next(), Some("2020-01-01,4,2"));

    assert_eq!(stored_document(&server)["note"], "kept");
}
