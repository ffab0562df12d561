use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
}

fn long_version(pkg_version: &str) -> String {
    // Tagged releases report the bare package version
    let is_release = git(&["tag", "--points-at", "HEAD"])
        .map(|tags| {
            tags.lines()
                .any(|t| t.trim().trim_start_matches('v') == pkg_version)
        })
        .unwrap_or(false);
    if is_release {
        return pkg_version.to_string();
    }

    let commit = git(&["rev-parse", "--short", "HEAD"])
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if commit.is_empty() {
        return pkg_version.to_string();
    }

    let dirty = git(&["status", "--porcelain"])
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    if dirty {
        format!("{pkg_version}-{commit}-dirty")
    } else {
        format!("{pkg_version}-{commit}")
    }
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let version = long_version(env!("CARGO_PKG_VERSION"));
    println!("cargo:rustc-env=WORKER_ADVISOR_LONG_VERSION={version}");
}
