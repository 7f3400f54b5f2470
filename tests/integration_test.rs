// Integration tests for user-dashboard

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;
use user_dashboard::{HttpUserService, ListController, MutationError, NewUser, ServiceError, UserService};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> HttpUserService {
    HttpUserService::new(&server.uri(), Duration::from_secs(5)).expect("valid mock url")
}

fn leanne() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    })
}

fn ervin() -> serde_json::Value {
    json!({ "id": 2, "name": "Ervin Howell", "username": "Antonette", "email": "Shanna@melissa.tv" })
}

fn temp_path(tag: &str) -> String {
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("user_dashboard_{}_{}_{}.conf", tag, std::process::id(), nonce));
    p.to_string_lossy().to_string()
}

// 1) HTTP user service against a mock server
mod http_service {
    use super::*;

    #[tokio::test]
    async fn lists_users_with_nested_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([leanne(), ervin()])))
            .expect(1)
            .mount(&server)
            .await;

        let users = service(&server).list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].address.city, "Gwenborough");
        assert_eq!(users[0].company.catch_phrase, "Multi-layered client-server neural-net");
        assert_eq!(users[1].phone, "");
    }

    #[tokio::test]
    async fn gets_one_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(leanne()))
            .mount(&server)
            .await;

        let user = service(&server).get_user(1).await.unwrap();
        assert_eq!(user.username, "Bret");
    }

    #[tokio::test]
    async fn create_posts_camel_case_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_partial_json(json!({
                "name": "Ada Lovelace",
                "company": { "name": "Analytical Engines", "catchPhrase": "", "bs": "" },
                "address": { "street": "", "city": "" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 11,
                "name": "Ada Lovelace",
                "username": "ada",
                "email": "ada@example.com",
                "phone": "555-0100",
                "website": "ada.dev",
                "company": { "name": "Analytical Engines" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = NewUser::from_form("Ada Lovelace", "ada", "ada@example.com", "555-0100", "ada.dev", "Analytical Engines");
        let created = service(&server).create_user(&payload).await.unwrap();
        assert_eq!(created.id, 11);
        assert_eq!(created.company.name, "Analytical Engines");
    }

    #[tokio::test]
    async fn delete_checks_the_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/8"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let svc = service(&server);
        svc.delete_user(7).await.unwrap();
        let err = svc.delete_user(8).await.unwrap_err();
        assert!(matches!(err, ServiceError::Http { status: 500 }));
    }

    #[tokio::test]
    async fn not_found_is_an_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = service(&server).get_user(99).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = service(&server).list_users().await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let svc = HttpUserService::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = svc.list_users().await.unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
    }
}

// 2) Controller driving the HTTP service end to end
mod controller_over_http {
    use super::*;

    #[tokio::test]
    async fn load_create_delete_round() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([leanne(), ervin()])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 11, "name": "Ada Lovelace" })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut c = ListController::new(Arc::new(service(&server)));
        c.load().await.unwrap();
        assert_eq!(c.len(), 2);

        let payload = NewUser::from_form("Ada Lovelace", "ada", "ada@example.com", "555-0100", "ada.dev", "Engines");
        c.create(payload).await.unwrap();
        let order: Vec<u64> = c.users().iter().map(|u| u.id).collect();
        assert_eq!(order, vec![11, 1, 2]);

        c.delete(2).await.unwrap();
        let order: Vec<u64> = c.users().iter().map(|u| u.id).collect();
        assert_eq!(order, vec![11, 1]);
    }

    #[tokio::test]
    async fn server_errors_leave_the_set_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let existing: Vec<user_dashboard::User> = serde_json::from_value(json!([leanne()])).unwrap();
        let mut c = ListController::with_users(Arc::new(service(&server)), existing);

        let err = c.load().await.unwrap_err();
        assert!(matches!(err, MutationError::LoadFailed(ServiceError::Http { status: 503 })));

        let payload = NewUser::from_form("Ada Lovelace", "ada", "ada@example.com", "555-0100", "ada.dev", "Engines");
        let err = c.create(payload).await.unwrap_err();
        assert!(matches!(err, MutationError::CreateFailed(_)));

        assert_eq!(c.len(), 1);
        assert_eq!(c.users()[0].name, "Leanne Graham");
    }
}

// 3) Config files: theme, keymap and settings roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use user_dashboard::app::Theme;

    let path = temp_path("theme");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(t.text, t2.text);
    assert_eq!(t.title, t2.title);
    assert_eq!(t.error, t2.error);

    let init = temp_path("theme_init");
    let _ = std::fs::remove_file(&init);
    let _created = Theme::load_or_init(&init);
    assert!(std::path::Path::new(&init).exists());

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&init);
}

#[test]
fn keymap_roundtrip_keeps_custom_bindings() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use user_dashboard::app::keymap::{KeyAction, Keymap};

    let path = temp_path("keys");
    std::fs::write(&path, "NewUser = a\nReload = F5\n").unwrap();
    let km = Keymap::from_file(&path).expect("read keymap");
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
        Some(KeyAction::NewUser)
    );
    assert_eq!(km.resolve(&KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)), Some(KeyAction::Reload));

    km.write_file(&path).expect("write keymap");
    let again = Keymap::from_file(&path).expect("reread keymap");
    assert_eq!(
        again.resolve(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
        Some(KeyAction::NewUser)
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn settings_file_then_flags() {
    use user_dashboard::app::settings::Settings;

    let path = temp_path("settings");
    std::fs::write(&path, "api_url = http://localhost:3000\npage_size = 8\n").unwrap();
    let mut s = Settings::load_or_init(&path);
    assert_eq!(s.api_url, "http://localhost:3000");
    assert_eq!(s.page_size().unwrap().get(), 8);

    s.apply_overrides(None, Some(0), Some(3));
    assert!(s.page_size().is_err());
    assert_eq!(s.timeout(), Duration::from_secs(3));

    s.apply_overrides(Some("https://example.com".into()), Some(4), None);
    s.write_file(&path).unwrap();
    let reread = Settings::from_file(&path).unwrap();
    assert_eq!(reread, s);
    let _ = std::fs::remove_file(&path);
}
