//! Security invariant tests for the telegram-login workspace.
//!
//! These scan production sources for patterns that would weaken login
//! verification: non-constant-time signature comparison, secrets reaching
//! logs or error messages, and signature checks being reordered behind field
//! validation.

use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// Read all .rs source files from production crates (excluding tests and this crate).
fn production_source_files() -> Vec<(String, String)> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap();

    let crates_dir = root.join("crates");
    let mut files = Vec::new();

    for entry in WalkDir::new(&crates_dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }

        if path
            .to_str()
            .map(|s| s.contains("security-audit"))
            .unwrap_or(false)
        {
            continue;
        }

        let path_str = path.to_str().unwrap_or("");
        if path_str.contains("tests/") || path_str.contains("\\tests\\") {
            continue;
        }

        if let Ok(content) = std::fs::read_to_string(path) {
            files.push((path_str.to_string(), content));
        }
    }

    files
}

/// Drop everything from the first `#[cfg(test)]` / `mod tests` onwards.
fn production_lines(content: &str) -> String {
    let mut result = Vec::new();

    for line in content.lines() {
        if line.contains("#[cfg(test)]") || line.trim().starts_with("mod tests") {
            break;
        }
        result.push(line);
    }

    result.join("\n")
}

/// Body of `fn name` up to the next top-level item.
fn function_body<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let start = content.find(&format!("fn {name}"))?;
    let rest = &content[start..];
    let end = rest[1..]
        .find("\nfn ")
        .or_else(|| rest[1..].find("\npub fn "))
        .map(|i| i + 1)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

#[test]
fn sources_are_found() {
    let files = production_source_files();
    assert!(
        files.iter().any(|(p, _)| p.ends_with("hmac.rs")),
        "audit did not find the signature module; check the crate layout"
    );
}

#[test]
fn no_hardcoded_bot_tokens_in_production_code() {
    // Telegram bot tokens look like `<digits>:<35 url-safe chars>`.
    let token_re = Regex::new(r"\d{6,}:[A-Za-z0-9_-]{30,}").unwrap();

    for (path, content) in &production_source_files() {
        let prod_content = production_lines(content);
        if let Some(mat) = token_re.find(&prod_content) {
            let line_num = prod_content[..mat.start()].lines().count() + 1;
            panic!("Potential hardcoded bot token found at {}:{}", path, line_num);
        }
    }
}

#[test]
fn signature_comparison_is_constant_time() {
    for (path, content) in &production_source_files() {
        if !path.ends_with("hmac.rs") {
            continue;
        }
        let prod_content = production_lines(content);

        let body = function_body(&prod_content, "verify_hash")
            .unwrap_or_else(|| panic!("{} has no verify_hash function", path));

        assert!(
            body.contains("constant_time_eq(") || body.contains("verify_slice("),
            "verify_hash at {} must compare signatures with constant_time_eq or Mac::verify_slice",
            path
        );

        let eq_re = Regex::new(r"(computed|claimed|expected)\s*[!=]=").unwrap();
        assert!(
            !eq_re.is_match(body),
            "verify_hash at {} compares signature bytes with ==/!=",
            path
        );
    }
}

#[test]
fn constant_time_uses_subtle_crate() {
    for (path, content) in &production_source_files() {
        let prod_content = production_lines(content);

        if prod_content.contains("fn constant_time_eq") {
            assert!(
                prod_content.contains("subtle::") || prod_content.contains("use subtle"),
                "File {} defines constant_time_eq without the subtle crate.",
                path
            );
        }
    }
}

#[test]
fn signature_checked_before_field_validation() {
    for (path, content) in &production_source_files() {
        if !path.ends_with("verify.rs") {
            continue;
        }
        let prod_content = production_lines(content);

        let hash_check = prod_content
            .find("verify_hash(")
            .unwrap_or_else(|| panic!("{} does not call verify_hash", path));
        for later in ["FIELD_ID)", "FIELD_AUTH_DATE)", "check_freshness("] {
            let pos = prod_content
                .find(later)
                .unwrap_or_else(|| panic!("{} does not reference {}", path, later));
            assert!(
                hash_check < pos,
                "{}: {} is evaluated before the signature check",
                path,
                later
            );
        }
    }
}

#[test]
fn secrets_not_logged() {
    let log_re = Regex::new(r"tracing::(trace|debug|info|warn|error)!\(").unwrap();
    let secret_words = ["bot_token", "secret_key", "key =", "hash ="];

    for (path, content) in &production_source_files() {
        let prod_content = production_lines(content);

        for mat in log_re.find_iter(&prod_content) {
            let end = prod_content[mat.end()..]
                .find(");")
                .map(|i| mat.end() + i)
                .unwrap_or(prod_content.len());
            let call = &prod_content[mat.start()..end];
            for word in &secret_words {
                assert!(
                    !call.contains(word),
                    "Log call at {} mentions '{}': {}",
                    path,
                    word,
                    call
                );
            }
        }
    }
}

#[test]
fn error_messages_do_not_interpolate_secrets() {
    for (path, content) in &production_source_files() {
        if !path.ends_with("error.rs") {
            continue;
        }
        let prod_content = production_lines(content);

        for (i, line) in prod_content.lines().enumerate() {
            if line.contains("#[error(") {
                for word in ["token}", "key}", "hash}", "secret}"] {
                    assert!(
                        !line.contains(word),
                        "Error message at {}:{} interpolates a secret: {}",
                        path,
                        i + 1,
                        line.trim()
                    );
                }
            }
        }
    }
}
