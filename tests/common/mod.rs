use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Run the binary with `args` inside `cwd`, with the Composer environment
/// variables cleared so the host shell cannot leak into the test.
///
/// stdout/stderr are also written to a per-case log file for post-mortem.
pub fn run_cli_case(case_name: &str, cwd: &Path, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("vendor-cleanup-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_vendor-cleanup"));

    let output = Command::new(&bin_path)
        .args(args)
        .current_dir(cwd)
        .env_remove("COMPOSER")
        .env_remove("COMPOSER_VENDOR_DIR")
        .env("NO_COLOR", "1")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute vendor-cleanup command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("cwd={}\n", cwd.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// A throwaway Composer project: `composer.json` plus a vendor tree.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    pub fn new(manifest: &str) -> Self {
        let dir = tempfile::tempdir().expect("create project dir");
        fs::write(dir.path().join("composer.json"), manifest).expect("write composer.json");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn vendor(&self) -> PathBuf {
        self.dir.path().join("vendor")
    }

    /// Create `vendor/<rel>` with a file inside so removal is recursive.
    pub fn install(&self, rels: &[&str]) {
        for rel in rels {
            let dir = self.vendor().join(rel);
            fs::create_dir_all(&dir).expect("create vendor dir");
            fs::write(dir.join("README.md"), "fixture").expect("write fixture");
        }
    }
}
