mod support;

use message_board::config::toml_config::{DEFAULT_HTTP_PORT, DEFAULT_WS_PORT};
use message_board::BoardConfig;
use std::collections::BTreeSet;
use support::manifest_dir;

fn dockerfile() -> String {
    std::fs::read_to_string(manifest_dir().join("Dockerfile")).expect("read Dockerfile")
}

fn instructions<'a>(dockerfile: &'a str, keyword: &str) -> Vec<&'a str> {
    dockerfile
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let (head, rest) = line.split_once(char::is_whitespace)?;
            head.eq_ignore_ascii_case(keyword).then(|| rest.trim())
        })
        .collect()
}

#[test]
fn test_image_exposes_exactly_the_two_service_ports() {
    let dockerfile = dockerfile();
    let ports: BTreeSet<u16> = instructions(&dockerfile, "EXPOSE")
        .into_iter()
        .flat_map(|rest| rest.split_whitespace())
        .map(|port| port.trim_end_matches("/tcp").parse().expect("numeric port"))
        .collect();

    assert_eq!(ports, BTreeSet::from([3000, 6000]));
    assert_eq!(DEFAULT_HTTP_PORT, 3000);
    assert_eq!(DEFAULT_WS_PORT, 6000);
}

#[test]
fn test_single_canonical_working_directory() {
    let dockerfile = dockerfile();
    let workdirs: BTreeSet<&str> = instructions(&dockerfile, "WORKDIR").into_iter().collect();
    assert_eq!(workdirs, BTreeSet::from(["/app"]));

    // 執行階段的檔案都放在工作目錄下（相對路徑）
    let runtime_stage = dockerfile
        .rsplit_once("\nFROM ")
        .map(|(_, stage)| stage)
        .expect("runtime stage");
    for copy in instructions(runtime_stage, "COPY") {
        if copy.starts_with("--from") {
            continue;
        }
        let target = copy.split_whitespace().last().unwrap();
        assert!(target.starts_with("./"), "COPY target outside WORKDIR: {}", copy);
    }
}

#[test]
fn test_entry_process_is_the_board_binary() {
    let dockerfile = dockerfile();
    let cmd = instructions(&dockerfile, "CMD");
    assert_eq!(cmd.last().copied(), Some(r#"["message-board"]"#));

    let cargo = std::fs::read_to_string(manifest_dir().join("Cargo.toml")).unwrap();
    assert!(cargo.contains(r#"name = "message-board""#));
}

#[test]
fn test_build_uses_locked_dependency_set() {
    let dockerfile = dockerfile();
    let build_stage = dockerfile
        .split_once("\nFROM ")
        .map(|(build, _)| build)
        .expect("build stage");

    let copies_lockfile = instructions(build_stage, "COPY")
        .iter()
        .any(|copy| copy.split_whitespace().any(|src| src == "Cargo.lock"));
    assert!(copies_lockfile, "build stage must copy Cargo.lock");

    let builds_locked = instructions(build_stage, "RUN")
        .iter()
        .any(|run| run.contains("cargo build") && run.contains("--locked"));
    assert!(builds_locked, "cargo build must run with --locked");

    // 建置映像的工具鏈不得低於套件宣告的最低 Rust 版本
    let cargo = std::fs::read_to_string(manifest_dir().join("Cargo.toml")).unwrap();
    let rust_version = cargo
        .lines()
        .find_map(|line| line.trim().strip_prefix("rust-version = "))
        .map(|v| v.trim_matches('"').to_string())
        .expect("rust-version in Cargo.toml");
    let image = instructions(build_stage, "FROM")[0];
    let toolchain = image
        .strip_prefix("rust:")
        .and_then(|tag| tag.split(['-', ' ']).next())
        .expect("rust toolchain image");
    let parse = |v: &str| -> Vec<u32> { v.split('.').map(|p| p.parse().unwrap()).collect() };
    assert!(parse(toolchain) >= parse(&rust_version), "{} < {}", toolchain, rust_version);
}

#[test]
fn test_shipped_config_matches_image() {
    let config = BoardConfig::from_file(manifest_dir().join("board.toml")).unwrap();
    assert_eq!(config.server.http_port, 3000);
    assert_eq!(config.server.ws_port, 6000);
    assert_eq!(config.paths.root_dir, std::path::PathBuf::from("/app"));
    assert!(message_board::utils::validation::Validate::validate(&config).is_ok());
}
