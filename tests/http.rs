use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct StatusBody {
    label: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct ReadingBody {
    id: u64,
    value: i64,
    context: String,
    status: StatusBody,
}

#[derive(Debug, Deserialize)]
struct LogItemBody {
    id: u64,
    value: i64,
    current: StatusBody,
}

#[derive(Debug, Deserialize)]
struct ReadingsBody {
    readings: Vec<LogItemBody>,
}

#[derive(Debug, Deserialize)]
struct SeriesBody {
    labels: Vec<String>,
    data: Vec<i64>,
    enough_data: bool,
}

#[derive(Debug, Deserialize)]
struct PremiumBody {
    premium: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
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
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("glyco_log_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/readings")).send().await {
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

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_glyco_log"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("GLUCOSE_SCHEME", "meal_aware")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn list_readings(client: &Client, base_url: &str) -> ReadingsBody {
    client
        .get(format!("{base_url}/api/readings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

/// The list follows the store asynchronously, so poll until `id` shows up.
async fn wait_for_reading(client: &Client, base_url: &str, id: u64) -> ReadingsBody {
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        let body = list_readings(client, base_url).await;
        if body.readings.iter().any(|item| item.id == id) {
            return body;
        }
        if Instant::now() > deadline {
            panic!("reading {id} never appeared in the list");
        }
        sleep(Duration::from_millis(50)).await;
    }
}

async fn post_reading(client: &Client, base_url: &str, body: serde_json::Value) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/readings"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn set_premium(client: &Client, base_url: &str, enabled: bool) -> PremiumBody {
    client
        .post(format!("{base_url}/api/premium"))
        .json(&serde_json::json!({ "enabled": enabled }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_save_reading_is_classified_and_listed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = post_reading(
        &client,
        &server.base_url,
        serde_json::json!({ "value": "181", "context": "afterMeal" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved: ReadingBody = response.json().await.unwrap();
    assert_eq!(saved.value, 181);
    assert_eq!(saved.context, "afterMeal");
    assert_eq!(saved.status.label, "High");
    assert_eq!(saved.status.color, "red");

    let list = wait_for_reading(&client, &server.base_url, saved.id).await;
    let item = list.readings.iter().find(|item| item.id == saved.id).unwrap();
    assert_eq!(item.value, 181);
    assert_eq!(item.current.label, "High");
}

#[tokio::test]
async fn http_invalid_value_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for raw in ["", "abc", "12.5"] {
        let response = post_reading(
            &client,
            &server.base_url,
            serde_json::json!({ "value": raw, "context": "fasting" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "value {raw:?}");
    }

    let response = post_reading(
        &client,
        &server.base_url,
        serde_json::json!({ "value": "100", "recorded_at": "not a date" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_series_requires_premium_and_keeps_five_points() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    assert!(!set_premium(&client, &server.base_url, false).await.premium);
    let locked = client
        .get(format!("{}/api/series", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(locked.status(), StatusCode::PAYMENT_REQUIRED);

    let mut last_id = 0;
    for (minutes, value) in [(1, 101), (2, 102), (3, 103), (4, 104), (5, 105), (6, 106), (7, 107)] {
        let recorded_at = format!("2030-01-01T08:{minutes:02}:00Z");
        let response = post_reading(
            &client,
            &server.base_url,
            serde_json::json!({ "value": value.to_string(), "context": "fasting", "recorded_at": recorded_at }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        last_id = response.json::<ReadingBody>().await.unwrap().id;
    }
    wait_for_reading(&client, &server.base_url, last_id).await;

    assert!(set_premium(&client, &server.base_url, true).await.premium);
    let series: SeriesBody = client
        .get(format!("{}/api/series", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(series.enough_data);
    assert_eq!(series.data, vec![103, 104, 105, 106, 107]);
    assert_eq!(series.labels.len(), 5);

    set_premium(&client, &server.base_url, false).await;
}

#[tokio::test]
async fn http_classify_uses_meal_context() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let body: serde_json::Value = client
        .get(format!("{}/api/classify?value=95&context=fasting", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["label"], "Target");
    assert_eq!(body["color"], "green");

    let body: serde_json::Value = client
        .get(format!("{}/api/classify?value=180&context=afterMeal", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["label"], "Target");

    let response = client
        .get(format!("{}/api/classify?value=abc", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_form_submission_redirects_home() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .post(format!("{}/readings", server.base_url))
        .form(&[
            ("value", "64"),
            ("context", "fasting"),
            ("recorded_at", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"].to_str().unwrap(), "/");

    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        let list = list_readings(&client, &server.base_url).await;
        if let Some(item) = list.readings.iter().find(|item| item.value == 64) {
            assert_eq!(item.current.label, "Low");
            assert_eq!(item.current.color, "blue");
            break;
        }
        if Instant::now() > deadline {
            panic!("form reading never appeared in the list");
        }
        sleep(Duration::from_millis(50)).await;
    }

    let rejected = client
        .post(format!("{}/readings", server.base_url))
        .form(&[("value", "sixty"), ("context", "fasting"), ("recorded_at", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
}
