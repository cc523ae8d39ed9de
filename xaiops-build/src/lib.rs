//! Build identification for the service binaries
//!
//! Called from each binary crate's `build.rs`. Exposes to the crate being
//! built:
//! - `GIT_HASH`: short commit hash, or `unknown` outside a checkout
//! - `BUILD_TIMESTAMP`: local time, RFC 3339 with offset
//! - `BUILD_PROFILE`: Cargo profile (`debug` / `release`)

use std::process::Command;

pub fn emit_build_info() {
    println!("cargo:rustc-env=GIT_HASH={}", git_hash());
    println!(
        "cargo:rustc-env=BUILD_TIMESTAMP={}",
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
    );
    println!(
        "cargo:rustc-env=BUILD_PROFILE={}",
        std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string())
    );

    // No rerun-if-changed lines: Cargo then reruns the script on every
    // build, keeping hash and timestamp current.
}

fn git_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_hash_is_never_empty() {
        let hash = git_hash();
        assert!(!hash.is_empty());
        assert!(hash == "unknown" || hash.len() <= 8);
    }
}
