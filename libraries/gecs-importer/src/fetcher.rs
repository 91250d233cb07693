//! Track downloads through an external helper process
//!
//! The helper is invoked with the track URL as its only argument, runs in its
//! own directory and writes into `DOWNLOADS_DIR`. It prints a JSON object
//! describing the result on stdout, possibly surrounded by log output.

use async_trait::async_trait;
use gecs_core::{FetchOutcome, TrackFetcher};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info, warn};
use url::Url;

/// Base file name of the helper executable
pub const HELPER_NAME: &str = "python_downloader";

/// Hosts accepted by [`is_supported_url`]
const SUPPORTED_HOSTS: &[&str] = &["soundcloud.com", "m.soundcloud.com"];

/// Runs the download helper
#[derive(Debug, Clone)]
pub struct HelperFetcher {
    helper: Option<PathBuf>,
    downloads_dir: PathBuf,
}

impl HelperFetcher {
    /// Use an explicit helper path
    pub fn new(helper: PathBuf, downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            helper: Some(helper),
            downloads_dir: downloads_dir.into(),
        }
    }

    /// Use `configured` if given, else look next to the running executable
    pub fn discover(configured: Option<PathBuf>, downloads_dir: impl Into<PathBuf>) -> Self {
        let helper = configured.or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().and_then(locate_helper))
        });
        Self {
            helper,
            downloads_dir: downloads_dir.into(),
        }
    }

    pub fn helper(&self) -> Option<&Path> {
        self.helper.as_deref()
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    fn command(&self, helper: &Path, url: &str) -> Command {
        let is_script = helper
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("py"));

        let mut command = if is_script {
            let mut c = Command::new("python");
            c.arg(helper);
            c
        } else {
            Command::new(helper)
        };

        command
            .arg(url)
            .env("DOWNLOADS_DIR", &self.downloads_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = helper.parent().filter(|d| !d.as_os_str().is_empty()) {
            command.current_dir(dir);
        }
        command
    }
}

#[async_trait]
impl TrackFetcher for HelperFetcher {
    async fn download(&self, url: &str) -> FetchOutcome {
        if !is_supported_url(url) {
            return FetchOutcome::failure(format!("Unsupported URL: {url}"));
        }

        let Some(helper) = self.helper.as_deref().filter(|h| h.exists()) else {
            error!("Download helper not found: {:?}", self.helper);
            return FetchOutcome::failure(format!(
                "Download helper not found. Expected {HELPER_NAME} next to the application or a configured helper path."
            ));
        };

        info!("Downloading {} with {}", url, helper.display());
        let output = match self.command(helper, url).output().await {
            Ok(output) => output,
            Err(e) => {
                error!("Failed to start download process: {}", e);
                return FetchOutcome::failure(format!("Failed to start download process: {e}"));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("Helper exited with {}: {}", output.status, stdout);

        if !output.status.success() {
            warn!("Download helper failed ({}): {}", output.status, stderr);
            let message = stderr.trim();
            return FetchOutcome::failure(if message.is_empty() {
                "Download failed"
            } else {
                message
            });
        }

        parse_helper_output(&stdout)
    }
}

/// Candidate helper locations inside `dir`, most specific first
pub fn helper_candidates(dir: &Path) -> Vec<PathBuf> {
    let exe = format!("{HELPER_NAME}{}", std::env::consts::EXE_SUFFIX);
    vec![dir.join(&exe), dir.join("dist").join(&exe)]
}

/// First existing helper inside `dir`
pub fn locate_helper(dir: &Path) -> Option<PathBuf> {
    helper_candidates(dir).into_iter().find(|p| p.is_file())
}

/// Parse the JSON object the helper prints
///
/// Everything before the first `{` and after the last `}` is ignored.
pub fn parse_helper_output(stdout: &str) -> FetchOutcome {
    let trimmed = stdout.trim();
    let json = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(first), Some(last)) if last > first => &trimmed[first..=last],
        _ => {
            return FetchOutcome::failure(
                "Failed to parse download result: No valid JSON found in output",
            )
        }
    };

    serde_json::from_str(json).unwrap_or_else(|e| {
        warn!("Unparsable helper output: {}", stdout);
        FetchOutcome::failure(format!("Failed to parse download result: {e}"))
    })
}

/// Whether `url` points at a supported audio-sharing site
pub fn is_supported_url(url: &str) -> bool {
    let url = url.trim();
    let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{url}")));
    parsed
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| SUPPORTED_HOSTS.contains(&host.as_str()))
}
