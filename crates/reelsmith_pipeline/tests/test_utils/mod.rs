//! Mock collaborators and fixtures for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use reelsmith_checkpoint::{CheckpointStore, MemoryCheckpointStore};
use reelsmith_core::{Language, RenderPlan, ResolvedAsset, Transcript, WordTiming, fields};
use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reelsmith_interface::{
    AssetSearchProvider, CompletionProvider, CompletionRequest, MusicLibrary, Narrator, Renderer,
    Transcriber,
};
use reelsmith_pipeline::{
    PipelineConfig, PipelineExecutor, StepContext, StepRegistry, video_registry,
};
use reelsmith_resolver::{ResolverConfig, ResourceResolver, RetryPolicy};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&CompletionRequest) -> ProviderResult<String> + Send + Sync;

/// Completion provider answering through a closure and recording requests.
pub struct MockCompletion {
    responder: Box<Responder>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletion {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> ProviderResult<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers each kind of request with a well-formed response.
    pub fn scripted(script: impl Into<String>) -> Self {
        let script = script.into();
        Self::new(move |request| Ok(canned_answer(request, &script)))
    }

    /// Returns the queued answers in order, then fails.
    pub fn queue(answers: Vec<&str>) -> Self {
        let answers: Mutex<Vec<String>> =
            Mutex::new(answers.into_iter().rev().map(str::to_string).collect());
        Self::new(move |_| {
            answers.lock().unwrap().pop().ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::InvalidResponse(
                    "no more queued answers".to_string(),
                ))
            })
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }

    fn provider_name(&self) -> &str {
        "mock-completion"
    }
}

/// A plausible answer for each completion the video steps make.
pub fn canned_answer(request: &CompletionRequest, script: &str) -> String {
    let system = request.system().clone().unwrap_or_default();
    if system.contains("still images") {
        r#"```json
{"image_queries": [
  {"timestamp": 2.0, "query": "owl eyes image"},
  {"timestamp": 6.5, "query": "snowy forest"},
  {"timestamp": 0.0, "query": "owl feathers"}
]}
```"#
            .to_string()
    } else if system.contains("stock footage") {
        r#"Here you go: {"video_segments": [
  {"time_range": [0.0, 4.0], "queries": ["forest", "night forest", "owl flying"]},
  {"time_range": [4.0, 8.0], "queries": ["moon", "full moon"]},
  {"time_range": [8.0, 99.0], "queries": ["broken"]}
]}"#
            .to_string()
    } else if system.contains("metadata") {
        r#"{"title": "Owls: 5 Facts!", "description": "Night hunters explained."}"#.to_string()
    } else if system.contains("translator") {
        format!("[translated] {}", script)
    } else {
        script.to_string()
    }
}

/// Search provider returning three distinct assets per query.
pub struct MockSearch {
    width: u32,
    height: u32,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetSearchProvider for MockSearch {
    async fn search(&self, query: &str, count: usize) -> ProviderResult<Vec<ResolvedAsset>> {
        self.queries.lock().unwrap().push(query.to_string());
        let slug = query.replace(' ', "-");
        Ok((0..count.min(3))
            .map(|i| {
                ResolvedAsset::new(
                    format!("https://stock.test/{}/{}", slug, i),
                    self.width,
                    self.height,
                )
            })
            .collect())
    }

    fn provider_name(&self) -> &str {
        "mock-search"
    }
}

/// Narrator that writes a placeholder audio file.
pub struct MockNarrator {
    duration: f64,
    calls: Mutex<usize>,
}

impl MockNarrator {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Narrator for MockNarrator {
    async fn synthesize(&self, text: &str, _language: Language, output: &Path) -> ProviderResult<PathBuf> {
        *self.calls.lock().unwrap() += 1;
        tokio::fs::write(output, text.as_bytes())
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::InvalidResponse(e.to_string())))?;
        Ok(output.to_path_buf())
    }

    async fn duration(&self, _audio: &Path) -> ProviderResult<f64> {
        Ok(self.duration)
    }
}

/// Transcriber reading the narration file back as evenly spaced words.
pub struct MockTranscriber {
    duration: f64,
}

impl MockTranscriber {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &Path) -> ProviderResult<Transcript> {
        let text = tokio::fs::read_to_string(audio)
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::InvalidResponse(e.to_string())))?;
        let words: Vec<&str> = text.split_whitespace().collect();
        let step = self.duration / words.len().max(1) as f64;
        let timings = words
            .iter()
            .enumerate()
            .map(|(i, w)| WordTiming::new(*w, i as f64 * step, (i + 1) as f64 * step))
            .collect();
        Ok(Transcript::new(timings, self.duration))
    }
}

/// Renderer that writes a placeholder video and keeps the plans it saw.
#[derive(Default)]
pub struct MockRenderer {
    plans: Mutex<Vec<RenderPlan>>,
}

impl MockRenderer {
    pub fn plans(&self) -> Vec<RenderPlan> {
        self.plans.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, plan: &RenderPlan) -> ProviderResult<PathBuf> {
        self.plans.lock().unwrap().push(plan.clone());
        tokio::fs::write(plan.output(), b"mp4")
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Render(e.to_string())))?;
        Ok(plan.output().clone())
    }
}

/// Music library backed by a map.
#[derive(Default)]
pub struct MockMusic {
    tracks: HashMap<String, String>,
}

impl MockMusic {
    pub fn with_track(mut self, name: &str, url: &str) -> Self {
        self.tracks.insert(name.to_string(), url.to_string());
        self
    }
}

#[async_trait]
impl MusicLibrary for MockMusic {
    async fn lookup(&self, name: &str) -> ProviderResult<Option<String>> {
        Ok(self.tracks.get(name).cloned())
    }
}

/// Handles on every mock wired into a [`Fixture`].
pub struct Fixture {
    pub executor: PipelineExecutor,
    pub store: Arc<MemoryCheckpointStore>,
    pub completion: Arc<MockCompletion>,
    pub narrator: Arc<MockNarrator>,
    pub renderer: Arc<MockRenderer>,
    pub videos: Arc<MockSearch>,
    pub images: Arc<MockSearch>,
}

/// Builds an executor over mocks, writing under `dir`.
pub fn fixture(dir: &Path, completion: MockCompletion, duration: f64) -> Fixture {
    fixture_with_registry(dir, completion, duration, video_registry())
}

pub fn fixture_with_registry(
    dir: &Path,
    completion: MockCompletion,
    duration: f64,
    registry: StepRegistry,
) -> Fixture {
    fixture_with_seeds(dir, completion, duration, registry, fields::SEEDS)
}

/// Like [`fixture_with_registry`], treating `seeds` as given.
pub fn fixture_with_seeds(
    dir: &Path,
    completion: MockCompletion,
    duration: f64,
    registry: StepRegistry,
    seeds: &[&str],
) -> Fixture {
    let store = Arc::new(MemoryCheckpointStore::new());
    let completion = Arc::new(completion);
    let narrator = Arc::new(MockNarrator::new(duration));
    let renderer = Arc::new(MockRenderer::default());
    let videos = Arc::new(MockSearch::new(1080, 1920));
    let images = Arc::new(MockSearch::new(720, 720));

    let context = context(
        dir,
        Arc::clone(&completion),
        Arc::clone(&narrator),
        Arc::clone(&renderer),
        Arc::clone(&videos),
        Arc::clone(&images),
        duration,
    );
    let executor = PipelineExecutor::with_seeds(
        registry,
        seeds,
        Arc::clone(&store) as Arc<dyn CheckpointStore>,
        context,
    )
    .expect("valid registry");

    Fixture {
        executor,
        store,
        completion,
        narrator,
        renderer,
        videos,
        images,
    }
}

/// A step context over the given mocks, writing under `dir`.
pub fn context(
    dir: &Path,
    completion: Arc<MockCompletion>,
    narrator: Arc<MockNarrator>,
    renderer: Arc<MockRenderer>,
    videos: Arc<MockSearch>,
    images: Arc<MockSearch>,
    duration: f64,
) -> StepContext {
    let music = Arc::new(MockMusic::default().with_track("calm", "https://music.test/calm.mp3"));

    let resolver_config = ResolverConfig::default().with_retry(RetryPolicy::new(1_000, 1, 1));
    let video_resolver = ResourceResolver::new(videos as Arc<dyn AssetSearchProvider>, &resolver_config);
    let image_resolver = ResourceResolver::new(images as Arc<dyn AssetSearchProvider>, &resolver_config);

    let config = PipelineConfig::default()
        .with_dirs(dir.join("work"), dir.join("videos"))
        .with_completion_retry(RetryPolicy::new(1_000, 1, 1).with_fatal_timeouts());

    StepContext::builder()
        .config(config)
        .completion(completion as Arc<dyn CompletionProvider>)
        .narrator(narrator as Arc<dyn Narrator>)
        .transcriber(Arc::new(MockTranscriber::new(duration)) as Arc<dyn Transcriber>)
        .renderer(renderer as Arc<dyn Renderer>)
        .music(music as Arc<dyn MusicLibrary>)
        .video_resolver(Arc::new(video_resolver))
        .image_resolver(Arc::new(image_resolver))
        .build()
        .expect("complete step context")
}

/// A context whose mocks are not inspected afterwards.
pub fn plain_context(dir: &Path) -> StepContext {
    context(
        dir,
        Arc::new(MockCompletion::scripted(words(5))),
        Arc::new(MockNarrator::new(2.0)),
        Arc::new(MockRenderer::default()),
        Arc::new(MockSearch::new(1080, 1920)),
        Arc::new(MockSearch::new(720, 720)),
        2.0,
    )
}

/// A script of `n` words.
pub fn words(n: usize) -> String {
    (1..=n)
        .map(|i| format!("owl{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}
