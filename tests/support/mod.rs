#![allow(dead_code)]

use message_board::{BoardConfig, BoundServers};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestBoard {
    pub root: TempDir,
    pub http_addr: SocketAddr,
    pub ws_addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<message_board::Result<()>>,
}

fn copy_dir(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).unwrap();
    for entry in std::fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), to.join(entry.file_name())).unwrap();
    }
}

pub fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn test_config(root: &Path) -> BoardConfig {
    let mut config = BoardConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.http_port = 0;
    config.server.ws_port = 0;
    config.server.shutdown_drain_ms = 500;
    config.paths.root_dir = root.to_path_buf();
    config
}

pub async fn start_board() -> TestBoard {
    let root = TempDir::new().unwrap();
    copy_dir(&manifest_dir().join("templates"), &root.path().join("templates"));
    copy_dir(&manifest_dir().join("static"), &root.path().join("static"));
    start_board_with(root, |_| {}).await
}

pub async fn start_board_with(root: TempDir, tweak: impl FnOnce(&mut BoardConfig)) -> TestBoard {
    let mut config = test_config(root.path());
    tweak(&mut config);

    let servers = BoundServers::bind(&config).await.unwrap();
    let http_addr = servers.http_addr();
    let ws_addr = servers.ws_addr();

    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(servers.serve_until(async move {
        let _ = stopped.await;
    }));

    TestBoard {
        root,
        http_addr,
        ws_addr,
        stop,
        handle,
    }
}

impl TestBoard {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.http_addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.ws_addr)
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.path().join("storage/data.json")
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    pub async fn shutdown(self) -> message_board::Result<()> {
        let _ = self.stop.send(());
        self.handle.await.unwrap()
    }
}
