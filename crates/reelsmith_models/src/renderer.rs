//! Command-line rendering from a JSON manifest.

use crate::{CommandSpec, RendererConfig};
use async_trait::async_trait;
use reelsmith_core::RenderPlan;
use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reelsmith_interface::Renderer;
use std::path::{Path, PathBuf};

/// Renderer that writes the plan next to the output and runs a compositor.
///
/// The manifest is `<output>.plan.json`; the compositor reads it and writes
/// the plan's output file.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: CommandSpec,
}

impl CommandRenderer {
    /// Creates a renderer from configuration.
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            command: config.command().clone(),
        }
    }

    /// Where the manifest for `output` is written.
    pub fn manifest_path(output: &Path) -> PathBuf {
        let mut name = output.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".plan.json");
        output.with_file_name(name)
    }
}

fn render_error(message: String) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Render(message))
}

#[async_trait]
impl Renderer for CommandRenderer {
    #[tracing::instrument(skip(self, plan), fields(output = %plan.output().display(), layers = plan.layers().len()))]
    async fn render(&self, plan: &RenderPlan) -> ProviderResult<PathBuf> {
        let output = plan.output();
        let manifest = Self::manifest_path(output);

        let json = serde_json::to_vec_pretty(plan)
            .map_err(|e| render_error(format!("cannot encode render plan: {}", e)))?;
        tokio::fs::write(&manifest, json)
            .await
            .map_err(|e| render_error(format!("cannot write {}: {}", manifest.display(), e)))?;

        let manifest_arg = manifest.to_string_lossy();
        let output_arg = output.to_string_lossy();
        self.command
            .run(&[("manifest", &*manifest_arg), ("output", &*output_arg)])
            .await
            .map_err(|e| render_error(e.kind.to_string()))?;

        let written = tokio::fs::metadata(output)
            .await
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(render_error(format!(
                "compositor produced no output at {}",
                output.display()
            )));
        }

        tracing::info!("Rendered video");
        Ok(output.clone())
    }
}
