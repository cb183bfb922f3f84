//! Browser tests for the level page progress tracker.
//!
//! Run with: `cargo test --test browser_progress -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

struct Server {
    child: Child,
    port: u16,
    _tmp: TempDir,
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn start_server() -> Server {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("course-site.toml");
    std::fs::write(
        &config,
        format!("content_root = {:?}\n", tmp.path().display().to_string()),
    )
    .unwrap();

    let port = free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_course-site"))
        .args(["--config", config.to_str().unwrap(), "serve"])
        .args(["--port", &port.to_string()])
        .spawn()
        .expect("failed to run course-site");

    for _ in 0..100 {
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return Server {
                child,
                port,
                _tmp: tmp,
            };
        }
        thread::sleep(Duration::from_millis(50));
    }
    panic!("server did not start on port {port}");
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn open_level(server: &Server, level: u32) -> Arc<Tab> {
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&format!("http://127.0.0.1:{}/level/{level}", server.port))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval_str(tab: &Tab, js: &str) -> String {
    tab.evaluate(js, false)
        .unwrap()
        .value
        .unwrap()
        .as_str()
        .unwrap()
        .to_string()
}

fn active(tab: &Tab) -> String {
    eval_str(
        tab,
        r#"document.querySelector('.progress-tracker').getAttribute('data-active')"#,
    )
}

fn scroll_to(tab: &Tab, section: &str) {
    tab.evaluate(
        &format!(
            "document.getElementById('{section}').scrollIntoView({{block: 'start'}}); \
             window.scrollBy(0, -200);"
        ),
        false,
    )
    .unwrap();
    thread::sleep(Duration::from_millis(400));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn tracker_starts_at_first_topic() {
    let server = start_server();
    let tab = open_level(&server, 1);
    assert_eq!(active(&tab), "0");
    let class = eval_str(
        &tab,
        r#"document.querySelector('.progress-tracker a.dot').className"#,
    );
    assert_eq!(class, "dot active");
}

#[test]
#[ignore]
fn scrolling_moves_the_active_dot() {
    let server = start_server();
    let tab = open_level(&server, 1);

    scroll_to(&tab, "topic-1-3");
    assert_eq!(active(&tab), "2");
    let passed = eval_str(
        &tab,
        r#"String(document.querySelectorAll('.progress-tracker a.dot.passed').length)"#,
    );
    assert_eq!(passed, "2");
    let filled = eval_str(
        &tab,
        r#"String(document.querySelectorAll('.progress-tracker .line.filled').length)"#,
    );
    assert_eq!(filled, "2");

    scroll_to(&tab, "topic-1-1");
    assert_eq!(active(&tab), "0");
}

#[test]
#[ignore]
fn new_level_starts_from_the_top() {
    let server = start_server();
    let tab = open_level(&server, 1);
    scroll_to(&tab, "topic-1-4");

    tab.navigate_to(&format!("http://127.0.0.1:{}/level/2", server.port))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    assert_eq!(active(&tab), "0");
}
