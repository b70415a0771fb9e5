#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use momentum_ops::defaults::ReleaseConfig;
use tempfile::TempDir;

/// A throwaway work tree wired to a bare `origin` in a sibling temp dir.
pub struct TestRepo {
    work: TempDir,
    remote: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let work = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();

        git_in(remote.path(), &["init", "--bare", "-q"]);
        git_in(remote.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

        let repo = Self { work, remote };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        configure_identity(repo.path());
        let remote_path = repo.remote.path().to_string_lossy().to_string();
        repo.git(&["remote", "add", "origin", &remote_path]);

        repo.commit_file("src/indicator.py", "def momentum(prices):\n    pass\n", "Initial commit");
        repo.git(&["push", "-q", "origin", "main"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.work.path()
    }

    pub fn git(&self, args: &[&str]) -> String {
        git_in(self.work.path(), args)
    }

    pub fn commit_file(&self, rel: &str, content: &str, message: &str) {
        let file = self.work.path().join(rel);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file, content).unwrap();
        self.git(&["add", "--", rel]);
        self.git(&["commit", "-q", "-m", message]);
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.work.path().join(rel)).unwrap()
    }

    pub fn tags(&self) -> Vec<String> {
        lines(&self.git(&["tag", "--list", "v*", "--sort=v:refname"]))
    }

    pub fn tags_at_head(&self) -> Vec<String> {
        lines(&self.git(&["tag", "--points-at", "HEAD"]))
    }

    pub fn remote_tags(&self) -> Vec<String> {
        lines(&git_in(
            self.remote.path(),
            &["tag", "--list", "v*", "--sort=v:refname"],
        ))
    }

    /// Clone `origin` with `--depth 1`, the way CI checkouts usually arrive.
    pub fn shallow_clone(&self) -> TempDir {
        let clone = TempDir::new().unwrap();
        let url = format!("file://{}", self.remote.path().display());
        git_in(clone.path(), &["clone", "-q", "--depth", "1", &url, "."]);
        configure_identity(clone.path());
        clone
    }

    pub fn commit_count(&self) -> usize {
        self.git(&["rev-list", "--count", "HEAD"]).parse().unwrap()
    }
}

/// Release settings with the token pointed at a variable no environment sets.
pub fn release_config() -> ReleaseConfig {
    ReleaseConfig {
        token_env: "MOMENTUM_OPS_TEST_TOKEN_UNSET".to_string(),
        ..ReleaseConfig::default()
    }
}

pub fn git_in(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    git_in(dir, &["config", "user.name", "Tester"]);
    git_in(dir, &["config", "user.email", "tester@example.com"]);
    git_in(dir, &["config", "commit.gpgsign", "false"]);
    git_in(dir, &["config", "tag.gpgSign", "false"]);
}

fn lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
