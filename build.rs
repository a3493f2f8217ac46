fn main() {
    // git の状態が変わったらバージョン文字列を作り直す
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let output = std::process::Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output();

    let pkg_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let version = match output {
        Ok(o) if o.status.success() => {
            let describe = String::from_utf8_lossy(&o.stdout).trim().to_string();
            format!("{} ({})", pkg_version, describe)
        }
        _ => pkg_version,
    };

    println!("cargo:rustc-env=GIT_VERSION={}", version);
}
