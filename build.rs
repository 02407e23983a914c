use std::process::Command;

/// Run a command and return its trimmed stdout, if it succeeded.
fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    let git_hash = capture("git", &["describe", "--always", "--dirty"])
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=PAGEKIT_GIT_HASH={}", git_hash);

    // Honour SOURCE_DATE_EPOCH so packaged builds are reproducible.
    let build_date = match std::env::var("SOURCE_DATE_EPOCH") {
        Ok(epoch) => capture("date", &["-u", "-d", &format!("@{}", epoch), "+%Y-%m-%d"]),
        Err(_) => capture("date", &["-u", "+%Y-%m-%d"]),
    }
    .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=PAGEKIT_BUILD_DATE={}", build_date);

    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
