mod common;

use common::{git_in, release_config, TestRepo};
use momentum_ops::release::{
    self, ReleaseOptions, ReleasePlanStatus, ReleaseRunStatus, ReleaseStepStatus,
};

fn step_status(run: &release::ReleaseRun, id: &str) -> ReleaseStepStatus {
    run.steps
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.status.clone())
        .unwrap_or_else(|| panic!("step {} not recorded", id))
}

#[test]
fn first_run_bootstraps_initial_tag_then_releases_patch() {
    let repo = TestRepo::new();
    let config = release_config();

    let run = release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    assert_eq!(run.status, ReleaseRunStatus::Released);
    assert_eq!(run.bootstrap_tag.as_deref(), Some("v0.1.0"));
    assert_eq!(run.new_tag.as_deref(), Some("v0.1.1"));
    assert_eq!(repo.tags(), vec!["v0.1.0", "v0.1.1"]);
    assert_eq!(repo.remote_tags(), vec!["v0.1.0", "v0.1.1"]);
    assert_eq!(repo.read("VERSION"), "0.1.1\n");
    // The bootstrap tag sits on HEAD, so there is nothing to list yet.
    assert_eq!(repo.read("CHANGELOG.md"), "");
}

#[test]
fn bootstrap_happens_only_once() {
    let repo = TestRepo::new();
    let config = release_config();

    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();
    let second = release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    assert_eq!(second.bootstrap_tag, None);
    assert_eq!(step_status(&second, "git.bootstrap_tag"), ReleaseStepStatus::Skipped);
    assert_eq!(
        repo.tags().iter().filter(|t| t.as_str() == "v0.1.0").count(),
        1
    );
}

#[test]
fn heartbeat_runs_keep_bumping_the_patch() {
    let repo = TestRepo::new();
    let config = release_config();

    let mut released = Vec::new();
    for _ in 0..3 {
        let run = release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();
        released.push(run.new_tag.unwrap());
    }

    assert_eq!(released, vec!["v0.1.1", "v0.1.2", "v0.1.3"]);
    assert_eq!(repo.read("VERSION"), "0.1.3\n");
}

#[test]
fn heartbeat_without_version_file_tolerates_empty_commit() {
    let repo = TestRepo::new();
    let mut config = release_config();
    config.version_file = None;
    let options = ReleaseOptions {
        push: false,
        ..ReleaseOptions::default()
    };

    release::run(repo.path(), &config, &options).unwrap();
    let commits_after_first = repo.commit_count();

    let second = release::run(repo.path(), &config, &options).unwrap();
    let third = release::run(repo.path(), &config, &options).unwrap();

    assert_eq!(step_status(&second, "git.commit"), ReleaseStepStatus::Skipped);
    assert_eq!(repo.commit_count(), commits_after_first);
    assert_eq!(second.new_tag.as_deref(), Some("v0.1.2"));
    assert_eq!(third.new_tag.as_deref(), Some("v0.1.3"));
    assert!(repo.tags_at_head().contains(&"v0.1.3".to_string()));
}

#[test]
fn changelog_lists_commits_since_last_tag_newest_first() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    repo.commit_file(
        "src/indicator.py",
        "def momentum(prices, window=14):\n    pass\n",
        "Add window parameter",
    );
    repo.commit_file("src/signals.py", "BUY = 1\n", "Add signal constants");

    let run = release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    assert_eq!(run.previous_tag.as_deref(), Some("v0.1.1"));
    assert_eq!(run.changelog.unwrap().entries, 2);
    assert_eq!(
        repo.read("CHANGELOG.md"),
        "- Add signal constants (Tester)\n- Add window parameter (Tester)\n"
    );
}

#[test]
fn changelog_is_regenerated_not_appended() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    repo.commit_file("src/a.py", "a = 1\n", "First change");
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    repo.commit_file("src/b.py", "b = 1\n", "Second change");
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    assert_eq!(repo.read("CHANGELOG.md"), "- Second change (Tester)\n");
}

#[test]
fn release_commit_carries_configured_message() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    assert_eq!(
        repo.git(&["log", "-1", "--format=%s"]),
        "chore(release): update changelog and bump version"
    );
    assert_eq!(
        repo.git(&["tag", "-l", "--format=%(contents:subject)", "v0.1.1"]),
        "Release v0.1.1"
    );
}

#[test]
fn ignored_only_changes_skip_when_requested() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    repo.commit_file("docs/guide.md", "# Guide\n", "Document the indicator");
    let options = ReleaseOptions {
        skip_ignored: true,
        ..ReleaseOptions::default()
    };

    let skipped = release::run(repo.path(), &config, &options).unwrap();
    assert_eq!(skipped.status, ReleaseRunStatus::Skipped);
    assert_eq!(skipped.new_tag, None);
    assert_eq!(repo.tags(), vec!["v0.1.0", "v0.1.1"]);

    repo.commit_file("src/indicator.py", "def momentum(prices):\n    return 0\n", "Return a value");
    let released = release::run(repo.path(), &config, &options).unwrap();
    assert_eq!(released.status, ReleaseRunStatus::Released);
    assert_eq!(released.new_tag.as_deref(), Some("v0.1.2"));
}

#[test]
fn skip_ignored_never_skips_a_heartbeat() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    let options = ReleaseOptions {
        skip_ignored: true,
        ..ReleaseOptions::default()
    };
    let run = release::run(repo.path(), &config, &options).unwrap();

    assert_eq!(run.status, ReleaseRunStatus::Released);
}

#[test]
fn no_push_leaves_remote_untouched() {
    let repo = TestRepo::new();
    let config = release_config();
    let options = ReleaseOptions {
        push: false,
        ..ReleaseOptions::default()
    };

    let run = release::run(repo.path(), &config, &options).unwrap();

    assert_eq!(step_status(&run, "git.push"), ReleaseStepStatus::Skipped);
    assert!(repo.remote_tags().is_empty());
    assert_eq!(repo.tags(), vec!["v0.1.0", "v0.1.1"]);
}

#[test]
fn non_repository_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = release::run(dir.path(), &release_config(), &ReleaseOptions::default()).unwrap_err();
    assert_eq!(err.code.as_str(), "validation.invalid_argument");
}

#[test]
fn failed_push_aborts_after_local_tag() {
    let repo = TestRepo::new();
    let mut config = release_config();
    config.remote = "nowhere".to_string();
    let options = ReleaseOptions {
        fetch: false,
        ..ReleaseOptions::default()
    };

    let err = release::run(repo.path(), &config, &options).unwrap_err();

    assert_eq!(err.code.as_str(), "git.command_failed");
    // Bootstrap pushes its tag before anything else, so nothing past it ran.
    assert_eq!(repo.tags(), vec!["v0.1.0"]);
}

#[test]
fn bootstrap_tag_reaches_remote_after_earlier_push_failure() {
    let repo = TestRepo::new();
    let mut unreachable = release_config();
    unreachable.remote = "nowhere".to_string();
    let offline = ReleaseOptions {
        fetch: false,
        ..ReleaseOptions::default()
    };
    release::run(repo.path(), &unreachable, &offline).unwrap_err();
    assert!(repo.remote_tags().is_empty());

    let run = release::run(repo.path(), &release_config(), &ReleaseOptions::default()).unwrap();

    assert_eq!(run.bootstrap_tag, None);
    assert_eq!(run.new_tag.as_deref(), Some("v0.1.1"));
    assert_eq!(repo.remote_tags(), vec!["v0.1.0", "v0.1.1"]);
}

#[test]
fn shallow_clone_is_deepened_before_reading_history() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();
    repo.commit_file("src/indicator.py", "print('rsi')\n", "Add RSI");
    repo.commit_file("src/indicator.py", "print('macd')\n", "Add MACD");
    repo.git(&["push", "-q", "origin", "main"]);

    let clone = repo.shallow_clone();
    assert_eq!(git_in(clone.path(), &["rev-parse", "--is-shallow-repository"]), "true");

    let run = release::run(clone.path(), &config, &ReleaseOptions::default()).unwrap();

    assert_eq!(git_in(clone.path(), &["rev-parse", "--is-shallow-repository"]), "false");
    assert_eq!(run.bootstrap_tag, None);
    assert_eq!(run.previous_tag.as_deref(), Some("v0.1.1"));
    assert_eq!(run.new_tag.as_deref(), Some("v0.1.2"));
    assert_eq!(run.changelog.unwrap().entries, 2);
    assert_eq!(
        std::fs::read_to_string(clone.path().join("CHANGELOG.md")).unwrap(),
        "- Add MACD (Tester)\n- Add RSI (Tester)\n"
    );
}

#[test]
fn next_tag_on_another_branch_is_rejected() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    repo.git(&["checkout", "-q", "-b", "side"]);
    repo.commit_file("src/side.py", "x = 1\n", "Side work");
    repo.git(&["tag", "-a", "v0.1.2", "-m", "side"]);
    repo.git(&["checkout", "-q", "main"]);
    let local = ReleaseOptions {
        fetch: false,
        push: false,
        ..ReleaseOptions::default()
    };

    let err = release::run(repo.path(), &config, &local).unwrap_err();

    assert_eq!(err.code.as_str(), "validation.invalid_argument");
    assert_eq!(err.details["field"], "tag");
    let problem = err.details["problem"].as_str().unwrap();
    assert!(problem.contains("'v0.1.2' already exists on another commit"));
    assert!(err.details.get("id").is_none());
    assert!(!repo.tags_at_head().contains(&"v0.1.2".to_string()));
}

#[test]
fn plan_reports_bootstrap_without_changing_anything() {
    let repo = TestRepo::new();
    let config = release_config();
    let head_before = repo.git(&["rev-parse", "HEAD"]);

    let plan = release::plan(repo.path(), &config, &ReleaseOptions::default()).unwrap();

    assert!(plan.bootstrap);
    assert_eq!(plan.current_tag, None);
    assert_eq!(plan.next_tag, "v0.1.1");
    assert!(plan.commits.is_empty());
    let bootstrap = plan.steps.iter().find(|s| s.id == "git.bootstrap_tag").unwrap();
    assert_eq!(bootstrap.status, ReleasePlanStatus::Ready);
    assert!(repo.tags().is_empty());
    assert_eq!(repo.git(&["rev-parse", "HEAD"]), head_before);
}

#[test]
fn plan_after_release_lists_pending_commits() {
    let repo = TestRepo::new();
    let config = release_config();
    release::run(repo.path(), &config, &ReleaseOptions::default()).unwrap();
    repo.commit_file("src/c.py", "c = 1\n", "Pending change");

    let options = ReleaseOptions {
        fetch: false,
        push: false,
        skip_ignored: false,
    };
    let plan = release::plan(repo.path(), &config, &options).unwrap();

    assert!(!plan.bootstrap);
    assert_eq!(plan.current_tag.as_deref(), Some("v0.1.1"));
    assert_eq!(plan.next_version, "0.1.2");
    assert_eq!(plan.commits.len(), 1);
    assert_eq!(plan.commits[0].subject, "Pending change");
    let push = plan.steps.iter().find(|s| s.id == "git.push").unwrap();
    assert_eq!(push.status, ReleasePlanStatus::Disabled);
}
