//! End-to-end tests of the `bookgraph` binary
//!
//! The chat API is served by wiremock and embeddings use the offline hashing
//! provider, so these tests need no network access.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOOKS: &str = "\
book_id,book_name,book_summary
1,First,Alice meets Bob in the harbour
2,Second,Bob sails with Carol
3,Third,Dave stays alone in the mountains
";

fn bookgraph() -> Command {
    let mut cmd = Command::cargo_bin("bookgraph").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("BOOKGRAPH_PERSIST_DIR")
        .env_remove("BOOKGRAPH_CHAT_ENDPOINT")
        .env_remove("BOOKGRAPH_CHAT_MODEL")
        .env_remove("BOOKGRAPH_EMBEDDING_MODEL")
        .env_remove("BOOKGRAPH_EMBEDDING_ENDPOINT");
    cmd
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    }))
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(chat_endpoint: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("books.csv"), BOOKS).unwrap();
        let config = format!(
            r#"
[chat]
provider = "openai"
endpoint = "{endpoint}"
api_key = "test-key"

[embedding]
provider = "mock"
dimensions = 64

[retry]
max_attempts = 1
base_delay_ms = 1
max_delay_ms = 1

[storage]
data_file = "{data}"
persist_dir = "{index}"
"#,
            endpoint = chat_endpoint,
            data = toml_path(&dir.path().join("books.csv")),
            index = toml_path(&dir.path().join("index")),
        );
        std::fs::write(dir.path().join("bookgraph.toml"), config).unwrap();
        Self { dir }
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("bookgraph.toml")
    }

    fn index(&self) -> PathBuf {
        self.dir.path().join("index")
    }

    fn run(&self, args: &[&str]) -> Command {
        let mut cmd = bookgraph();
        cmd.current_dir(self.dir.path())
            .arg("-C")
            .arg(self.config())
            .args(args);
        cmd
    }
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

async fn mount_build_responses(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("SOURCE ID: 1"))
        .respond_with(completion("(Alice, MEETS, Bob)\n(Alice, LIVES_IN, harbour)"))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("SOURCE ID: 2"))
        .respond_with(completion("(Bob, SAILS_WITH, Carol)"))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("SOURCE ID: 3"))
        .respond_with(completion("(Dave, STAYS_IN, mountains)"))
        .mount(server)
        .await;
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_help_lists_commands() {
    bookgraph()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_missing_subcommand_fails() {
    bookgraph().assert().failure();
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf").join("bookgraph.toml");

    bookgraph()
        .current_dir(dir.path())
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    assert!(path.exists());

    bookgraph()
        .current_dir(dir.path())
        .arg("-C")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[chat]"))
        .stdout(predicate::str::contains("deepseek-chat"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookgraph.toml");
    std::fs::write(&path, "[chat]\nmodel = \"mine\"\n").unwrap();

    bookgraph()
        .current_dir(dir.path())
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert!(std::fs::read_to_string(&path).unwrap().contains("mine"));

    bookgraph()
        .current_dir(dir.path())
        .args(["config", "init", "--force"])
        .arg(&path)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&path).unwrap().contains("deepseek-chat"));
}

#[test]
fn test_config_show_masks_inline_key() {
    let workspace = Workspace::new("http://127.0.0.1:9");
    workspace
        .run(&["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test-key").not())
        .stdout(predicate::str::contains("********"));
}

#[test]
fn test_build_with_missing_csv_fails() {
    let workspace = Workspace::new("http://127.0.0.1:9");
    workspace
        .run(&["build", "--input", "no-such-file.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read records"));
}

#[test]
fn test_query_without_index_fails() {
    let workspace = Workspace::new("http://127.0.0.1:9");
    workspace
        .run(&["query", "--query", "sailing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load index"));
}

// ============================================================================
// Build and query
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_build_stats_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("---User Query---"))
        .respond_with(completion("Title: 《Second》\nReason: sailing with Carol."))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_build_responses(&server).await;

    let workspace = Workspace::new(&server.uri());

    workspace
        .run(&["build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Records with triplets"))
        .stdout(predicate::str::contains("Index written to"));
    assert!(workspace.index().join("records.json").exists());
    assert!(workspace.index().join("index_manifest.json").exists());

    workspace
        .run(&["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Triplets"))
        .stdout(predicate::str::contains("Bob"))
        .stdout(predicate::str::contains("feature-hashing-64"));

    workspace
        .run(&["query", "--query", "Bob sails with Carol", "-k", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("《Second》"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_build_reports_failing_record_and_continues() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("SOURCE ID: 2"))
        .respond_with(ResponseTemplate::new(503))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_build_responses(&server).await;

    let workspace = Workspace::new(&server.uri());

    workspace
        .run(&["build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("record 2 skipped"));

    workspace
        .run(&["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Carol").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repl_over_stdin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("---User Query---"))
        .respond_with(completion("Title: 《Third》"))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_build_responses(&server).await;

    let workspace = Workspace::new(&server.uri());
    workspace.run(&["build"]).assert().success();

    workspace
        .run(&["query"])
        .write_stdin("\nmountains\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("《Third》"))
        .stdout(predicate::str::contains("Goodbye."));
}
