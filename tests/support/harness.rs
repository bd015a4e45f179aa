use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// TestHarness provides an isolated git repository in a temporary directory.
/// Commits are created with fixed author and committer dates so tag ordering
/// and changelog windows are deterministic.
pub struct TestHarness {
    pub dir: TempDir,
    #[allow(dead_code)]
    pub binary: PathBuf,
}

impl TestHarness {
    /// Creates a new harness with an empty repository on branch `main`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let harness = TestHarness {
            dir: temp_dir,
            binary: PathBuf::from(env!("CARGO_BIN_EXE_git-calver")),
        };

        harness.git(&["init", "-b", "main"]);
        harness.git(&["config", "user.email", "test@example.com"]);
        harness.git(&["config", "user.name", "Test User"]);
        harness.git(&["config", "commit.gpgsign", "false"]);
        harness.git(&["config", "tag.gpgsign", "false"]);
        harness
    }

    /// Returns the repository directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Runs git in the repository and returns trimmed stdout, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Creates an empty commit dated `date` (ISO 8601) and returns its id.
    pub fn commit_at(&self, message: &str, date: &str) -> String {
        self.commit_as(message, date, "Test User", "test@example.com")
    }

    /// Like [`commit_at`](Self::commit_at) with an explicit author.
    pub fn commit_as(&self, message: &str, date: &str, name: &str, email: &str) -> String {
        let output = Command::new("git")
            .args(["commit", "--allow-empty", "-m", message])
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .env("GIT_AUTHOR_NAME", name)
            .env("GIT_AUTHOR_EMAIL", email)
            .current_dir(self.path())
            .output()
            .expect("Failed to commit");
        assert!(
            output.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        self.git(&["rev-parse", "HEAD"])
    }

    /// Creates a lightweight tag.
    pub fn tag(&self, name: &str, rev: &str) {
        self.git(&["tag", name, rev]);
    }

    /// Creates an annotated tag.
    #[allow(dead_code)]
    pub fn annotated_tag(&self, name: &str, rev: &str) {
        self.git(&["tag", "-a", name, rev, "-m", name]);
    }

    /// Names of all local tags, sorted.
    #[allow(dead_code)]
    pub fn tags(&self) -> Vec<String> {
        self.git(&["tag", "--list"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Adds a bare repository as remote `name`; keep the returned dir alive.
    #[allow(dead_code)]
    pub fn add_bare_remote(&self, name: &str) -> TempDir {
        let remote = TempDir::new().expect("Failed to create remote dir");
        let output = Command::new("git")
            .args(["init", "--bare"])
            .current_dir(remote.path())
            .output()
            .expect("Failed to init bare repo");
        assert!(output.status.success(), "git init --bare failed");

        let url = remote.path().to_string_lossy().to_string();
        self.git(&["remote", "add", name, &url]);
        remote
    }

    /// Executes the git-calver binary in the repository with a clean
    /// format environment and colour disabled.
    #[allow(dead_code)]
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    #[allow(dead_code)]
    pub fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .current_dir(self.path())
            .env_remove("CALVER")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        for (key, value) in envs {
            command.env(key, value);
        }
        command.output().expect("Failed to run git-calver")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a finished command as a string.
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
