//! Title, description and the final artifact.

use super::step_failed;
use crate::{JobState, Step, StepContext, StepOutput, prompts};
use async_trait::async_trait;
use reelsmith_core::fields;
use reelsmith_error::{ParseError, PersistenceError, PersistenceErrorKind, ReelsmithResult};
use reelsmith_interface::CompletionRequest;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TITLE_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9 '\n.]").expect("Valid title regex"));

#[derive(Debug, Deserialize)]
struct Metadata {
    title: String,
    #[serde(default)]
    description: String,
}

/// Reduce a title to characters that are safe in a file name.
///
/// Returns `None` when nothing usable is left.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::steps::sanitize_title;
///
/// assert_eq!(
///     sanitize_title("5 Wild Facts: Owls!  #shorts").as_deref(),
///     Some("5 Wild Facts Owls shorts")
/// );
/// assert_eq!(sanitize_title("???"), None);
/// ```
pub fn sanitize_title(title: &str) -> Option<String> {
    let kept = TITLE_DISALLOWED.replace_all(title, "");
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches('.').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn write_error(path: &Path, e: std::io::Error) -> PersistenceError {
    PersistenceError::new(PersistenceErrorKind::FileWrite(format!(
        "{}: {}",
        path.display(),
        e
    )))
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn file_len(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|m| m.len())
}

/// Where a job's video is published.
///
/// `<title>.mp4` unless another file already holds that name, in which case
/// the job id is appended.
async fn publish_target(output_dir: &Path, title: &str, job_id: &str) -> PathBuf {
    let plain = output_dir.join(format!("{}.mp4", title));
    if exists(&plain).await {
        output_dir.join(format!("{} {}.mp4", title, job_id))
    } else {
        plain
    }
}

/// Copy `from` to `to` through a temporary file, so `to` is either absent or
/// complete.
async fn copy_into_place(from: &Path, to: &Path) -> ReelsmithResult<()> {
    let partial = to.with_extension("mp4.part");
    tokio::fs::copy(from, &partial)
        .await
        .map_err(|e| write_error(&partial, e))?;
    tokio::fs::rename(&partial, to)
        .await
        .map_err(|e| write_error(to, e))?;
    Ok(())
}

/// Asks the completion provider for a title and description and picks the
/// published file name.
///
/// The name is checkpointed before any file is placed, so publishing can be
/// retried without generating a new title.
pub struct WriteMetadata;

#[async_trait]
impl Step for WriteMetadata {
    fn name(&self) -> &'static str {
        "write_metadata"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[fields::SCRIPT, fields::RENDERED_VIDEO_PATH]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::TITLE, fields::DESCRIPTION, fields::VIDEO_PATH]
    }

    async fn run(&self, ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let script: String = job.get(fields::SCRIPT)?;

        let request = CompletionRequest::builder()
            .prompt(prompts::metadata(&script))
            .system(Some(prompts::METADATA_SYSTEM.to_string()))
            .build()
            .map_err(|e| step_failed(self.name(), e.to_string()))?;

        let metadata = ctx
            .complete_structured(&request, |metadata: Metadata| {
                if metadata.title.trim().is_empty() {
                    Err(ParseError::new("metadata title is empty"))
                } else {
                    Ok(metadata)
                }
            })
            .await?;

        let title = sanitize_title(&metadata.title).unwrap_or_else(|| job.job_id().to_string());
        let description = metadata.description.trim().to_string();
        let video_path =
            publish_target(ctx.config().output_dir(), &title, job.job_id().as_str()).await;

        tracing::info!(title = %title, path = %video_path.display(), "Chose video metadata");
        StepOutput::new()
            .with(fields::TITLE, title)?
            .with(fields::DESCRIPTION, description)?
            .with(fields::VIDEO_PATH, video_path)
    }
}

/// Places the rendered video and its description file in the output
/// directory.
///
/// The rendered file stays in the work directory, so a job whose metadata
/// is cleared can be published again.
pub struct PublishVideo;

#[async_trait]
impl Step for PublishVideo {
    fn name(&self) -> &'static str {
        "publish_video"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[
            fields::TITLE,
            fields::DESCRIPTION,
            fields::VIDEO_PATH,
            fields::RENDERED_VIDEO_PATH,
        ]
    }

    fn produces(&self) -> &'static [&'static str] {
        &[fields::READY_TO_UPLOAD]
    }

    async fn run(&self, _ctx: &StepContext, job: &JobState) -> ReelsmithResult<StepOutput> {
        let title: String = job.get(fields::TITLE)?;
        let description: String = job.get(fields::DESCRIPTION)?;
        let video_path: PathBuf = job.get(fields::VIDEO_PATH)?;
        let rendered: PathBuf = job.get(fields::RENDERED_VIDEO_PATH)?;

        if let Some(output_dir) = video_path.parent() {
            tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
                PersistenceError::new(PersistenceErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    output_dir.display(),
                    e
                )))
            })?;
        }

        match (file_len(&rendered).await, file_len(&video_path).await) {
            (Some(_), None) => copy_into_place(&rendered, &video_path).await?,
            (Some(source), Some(target)) if source == target => {
                tracing::info!(path = %video_path.display(), "Video already published");
            }
            (Some(_), Some(_)) => {
                return Err(step_failed(
                    self.name(),
                    format!("{} belongs to another video", video_path.display()),
                ));
            }
            (None, Some(_)) => {
                tracing::info!(path = %video_path.display(), "Video already published");
            }
            (None, None) => {
                return Err(step_failed(
                    self.name(),
                    format!("rendered video {} does not exist", rendered.display()),
                ));
            }
        }

        let info_path = video_path.with_extension("txt");
        let info = format!(
            "---Youtube title---\n{}\n---Youtube description---\n{}",
            title, description
        );
        tokio::fs::write(&info_path, info)
            .await
            .map_err(|e| write_error(&info_path, e))?;

        tracing::info!(title = %title, path = %video_path.display(), "Published video");
        StepOutput::new().with(fields::READY_TO_UPLOAD, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_apostrophes_and_dots() {
        assert_eq!(
            sanitize_title("Owls' 3.5 lb secret").as_deref(),
            Some("Owls' 3.5 lb secret")
        );
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize_title("../etc/passwd").as_deref(), Some("etcpasswd"));
    }

    #[tokio::test]
    async fn test_copy_into_place_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.mp4");
        let to = dir.path().join("b.mp4");
        tokio::fs::write(&from, b"video").await.unwrap();

        copy_into_place(&from, &to).await.unwrap();
        assert!(!to.with_extension("mp4.part").exists());

        assert!(from.exists());
        assert_eq!(tokio::fs::read(&to).await.unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_taken_title_gets_job_suffix() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            publish_target(dir.path(), "Owls", "job-b").await,
            dir.path().join("Owls.mp4")
        );

        tokio::fs::write(dir.path().join("Owls.mp4"), b"first").await.unwrap();
        assert_eq!(
            publish_target(dir.path(), "Owls", "job-b").await,
            dir.path().join("Owls job-b.mp4")
        );
    }
}
