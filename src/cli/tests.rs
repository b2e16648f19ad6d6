//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands};
use clap::Parser;
use std::fs;

fn route_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("users/[id]")).unwrap();
    fs::write(dir.path().join("users/get.ts"), "").unwrap();
    fs::write(dir.path().join("users/post.ts"), "").unwrap();
    fs::write(dir.path().join("users/[id]/get.ts"), "").unwrap();
    dir
}

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["fsrouter", "routes", "--dir", "routes", "--prefix", "api", "--json"]).unwrap();
    match cli.command {
        Commands::Routes {
            dir, prefix, config, json,
        } => {
            assert_eq!(dir.unwrap().to_string_lossy(), "routes");
            assert_eq!(prefix.as_deref(), Some("api"));
            assert!(config.is_none());
            assert!(json);
        }
    }
}

#[test]
fn test_routes_table_output() {
    let tree = route_tree();
    let dir = tree.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["fsrouter", "routes", "--dir", dir.as_str()]).unwrap();

    let mut out = Vec::new();
    run(&cli, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("GET     /users/[id]"));
    assert!(text.contains("users/post.ts"));
    assert!(text.ends_with("3 route(s)\n"));
}

#[test]
fn test_routes_json_output_with_prefix() {
    let tree = route_tree();
    let dir = tree.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["fsrouter", "routes", "--dir", dir.as_str(), "--prefix", "api", "--json"]).unwrap();

    let mut out = Vec::new();
    run(&cli, &mut out).unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let paths: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"/api/users"));
    assert!(paths.contains(&"/api/users/[id]"));
}

#[test]
fn test_duplicate_routes_fail() {
    let tree = route_tree();
    fs::write(tree.path().join("users/GET.js"), "").unwrap();
    let dir = tree.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["fsrouter", "routes", "--dir", dir.as_str()]).unwrap();

    let err = run(&cli, &mut Vec::new()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("users/GET.js"));
    assert!(message.contains("users/get.ts"));
}
