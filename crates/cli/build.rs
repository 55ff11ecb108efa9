use std::process::Command;

/// Short commit hash of the checkout, or "unknown" outside a git tree.
fn commit_hash() -> String {
    let output = match Command::new("git").args(["rev-parse", "--short=7", "HEAD"]).output() {
        Ok(output) if output.status.success() => output,
        _ => return "unknown".into(),
    };
    String::from_utf8(output.stdout)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "unknown".into())
}

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    // Shown by `saprecon --version`
    println!("cargo:rustc-env=SAPRECON_COMMIT={}", commit_hash());
    println!(
        "cargo:rustc-env=SAPRECON_TARGET={}",
        std::env::var("TARGET").unwrap_or_else(|_| "unknown".into())
    );
}
