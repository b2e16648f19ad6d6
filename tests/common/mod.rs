#![allow(dead_code)]

pub mod route_tree {
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Create a temporary route tree holding an empty file at every relative path.
    pub fn with_files(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        add_files(dir.path(), files);
        dir
    }

    pub fn add_files(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, "export default {};\n").unwrap();
        }
    }
}

pub mod responses {
    use fsrouter::error::FieldError;
    use fsrouter::server::HandlerResponse;

    /// Decode the JSON-encoded `fields` string of an error body. Empty when absent.
    pub fn fields(res: &HandlerResponse) -> Vec<FieldError> {
        res.body
            .get("fields")
            .and_then(|f| f.as_str())
            .map(|f| serde_json::from_str(f).unwrap())
            .unwrap_or_default()
    }

    pub fn message(res: &HandlerResponse) -> &str {
        res.body["message"].as_str().unwrap()
    }
}

pub mod tokens {
    use base64::{engine::general_purpose, Engine as _};
    use serde_json::Value;

    pub fn bearer(payload: &Value, signature: &str) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("Bearer {header}.{body}.{signature}")
    }
}
