fn main() {
    // Short commit hash for the report header, when built from a checkout
    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
            println!("cargo:rustc-env=REVIEWLENS_GIT_HASH={hash}");
        }
    }
    println!("cargo:rerun-if-changed=build.rs");
}
