use std::process::Command;

fn main() {
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|hash| format!("_{}", hash.trim()))
        .unwrap_or_default();

    #[cfg(feature = "bin")]
    let build_date = format!("_{}", chrono::Utc::now().format("%Y-%m-%d"));
    #[cfg(not(feature = "bin"))]
    let build_date = String::new();

    let full_version = format!("{}{}{}", env!("CARGO_PKG_VERSION"), build_date, git_hash);
    println!("cargo:rustc-env=FULL_VERSION={full_version}");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
