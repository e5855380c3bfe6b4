use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let hash = short_commit().unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=RASTERLAYER_GIT_HASH={hash}");

    // Rebuild when HEAD moves so `--version` stays accurate.
    if let Some(git_dir) = git_dir() {
        for watched in ["HEAD", "refs", "packed-refs"] {
            let path = git_dir.join(watched);
            if path.exists() {
                rerun_if_changed(&path);
            }
        }
    }
}

fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

fn git_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("GIT_DIR") {
        return Some(PathBuf::from(dir));
    }

    let dot_git = PathBuf::from(".git");
    if dot_git.is_dir() {
        return Some(dot_git);
    }

    // Worktrees and submodules use a `.git` file pointing elsewhere.
    let contents = fs::read_to_string(&dot_git).ok()?;
    let target = PathBuf::from(contents.strip_prefix("gitdir:")?.trim());
    if target.is_relative() {
        Some(Path::new(".").join(target))
    } else {
        Some(target)
    }
}

fn rerun_if_changed(path: &Path) {
    if let Some(display) = path.to_str() {
        println!("cargo:rerun-if-changed={display}");
    }
}
