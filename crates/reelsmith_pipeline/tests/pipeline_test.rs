//! End-to-end runs of the video registry over mock collaborators.

mod test_utils;

use reelsmith_checkpoint::CheckpointStore;
use reelsmith_core::{JobId, Language, RenderLayer, TimedEntry, fields};
use reelsmith_error::{PipelineErrorKind, ProviderError, ProviderErrorKind, ReelsmithErrorKind};
use reelsmith_pipeline::steps::TimeCaptions;
use reelsmith_pipeline::{JobSeed, JobState, StepRegistry, video_registry};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use test_utils::{MockCompletion, canned_answer, fixture, fixture_with_seeds, words};

fn script_seed(script: &str, vertical: bool) -> JobSeed {
    JobSeed::builder()
        .script(script)
        .format_vertical(vertical)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_end_to_end_vertical_short() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(40);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 12.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    let run = fx.executor.run(&mut job).await.unwrap();

    assert!(job.is_ready());
    assert_eq!(run.executed().len(), 13);
    assert_eq!(run.skipped(), &vec!["generate_script".to_string()]);

    let captions: Vec<TimedEntry<String>> = job.get(fields::TIMED_CAPTIONS).unwrap();
    assert!(!captions.is_empty());
    assert!(captions.iter().all(|c| c.payload.chars().count() <= 15));
    assert!(captions.windows(2).all(|w| w[0].start <= w[1].start));

    let artifact = run.artifact().clone().unwrap();
    assert!(!artifact.as_os_str().is_empty());
    assert_eq!(artifact, dir.path().join("videos").join("Owls 5 Facts.mp4"));
    assert_eq!(tokio::fs::read(&artifact).await.unwrap(), b"mp4");

    let info = tokio::fs::read_to_string(artifact.with_extension("txt"))
        .await
        .unwrap();
    assert_eq!(
        info,
        "---Youtube title---\nOwls 5 Facts\n---Youtube description---\nNight hunters explained."
    );
}

#[tokio::test]
async fn test_render_plan_uses_resolved_assets() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(40);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 12.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    fx.executor.run(&mut job).await.unwrap();

    let videos: Vec<TimedEntry<String>> = job.get(fields::TIMED_VIDEO_URLS).unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].payload, "https://stock.test/owl-flying/0");
    assert_eq!(videos[1].payload, "https://stock.test/full-moon/0");

    let images: Vec<TimedEntry<String>> = job.get(fields::TIMED_IMAGE_URLS).unwrap();
    assert_eq!(images.len(), 3);
    assert!(images.iter().all(|i| i.is_within(12.0)));
    assert!(fx.images.queries().contains(&"owl eyes".to_string()));

    let plans = fx.renderer.plans();
    assert_eq!(plans.len(), 1);
    let ranks: Vec<u8> = plans[0].layers().iter().map(RenderLayer::rank).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(plans[0].clip_seconds(), None);
}

#[tokio::test]
async fn test_second_run_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(40);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 12.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, false))
        .await
        .unwrap();
    let first = fx.executor.run(&mut job).await.unwrap();
    let writes = fx.store.write_count().await;
    let completions = fx.completion.call_count();

    let second = fx.executor.resume(job.job_id()).await.unwrap();

    assert!(second.was_noop());
    assert_eq!(second.artifact(), first.artifact());
    assert_eq!(fx.store.write_count().await, writes);
    assert_eq!(fx.completion.call_count(), completions);
    assert_eq!(fx.narrator.call_count(), 1);
    assert_eq!(fx.renderer.plans().len(), 1);
}

#[tokio::test]
async fn test_missing_field_stops_before_any_collaborator() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(20);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 8.0);

    let job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    assert!(fx.store.clear(job.job_id(), fields::LANGUAGE).await.unwrap());

    let mut job = fx.executor.open_job(job.job_id()).await.unwrap();
    let err = fx.executor.run(&mut job).await.unwrap_err();

    assert_eq!(err.missing_field(), Some(fields::LANGUAGE));
    assert!(format!("{}", err).contains("translate_script"));
    assert_eq!(fx.completion.call_count(), 0);
    assert_eq!(fx.narrator.call_count(), 0);
}

#[tokio::test]
async fn test_every_step_checks_its_inputs_first() {
    let dir = tempfile::tempdir().unwrap();

    for step in video_registry().iter() {
        for missing in step.requires() {
            let fx = fixture_with_seeds(
                dir.path(),
                MockCompletion::scripted(words(20)),
                8.0,
                StepRegistry::new().with_shared(Arc::clone(step)),
                step.requires(),
            );
            let present = step
                .requires()
                .iter()
                .filter(|f| *f != missing)
                .map(|f| (f.to_string(), Value::String("present".to_string())))
                .collect();
            let mut job = JobState::new(JobId::new(), present);

            let err = fx.executor.run(&mut job).await.unwrap_err();

            match err.kind() {
                ReelsmithErrorKind::Pipeline(pipeline) => match &pipeline.kind {
                    PipelineErrorKind::MissingField { step: name, field, .. } => {
                        assert_eq!(name, step.name());
                        assert_eq!(field, *missing);
                    }
                    other => panic!("{}: expected a missing field, got {}", step.name(), other),
                },
                other => panic!("{}: expected a pipeline error, got {}", step.name(), other),
            }
            assert_eq!(fx.completion.call_count(), 0, "{}", step.name());
            assert_eq!(fx.narrator.call_count(), 0, "{}", step.name());
            assert!(fx.renderer.plans().is_empty(), "{}", step.name());
            assert!(fx.videos.queries().is_empty(), "{}", step.name());
            assert!(fx.images.queries().is_empty(), "{}", step.name());
            assert!(fx.store.load(job.job_id()).await.unwrap().is_empty());
        }
    }
}

#[tokio::test]
async fn test_captions_bounded_by_measured_narration() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("narration.txt");
    tokio::fs::write(&audio, words(8)).await.unwrap();

    // The transcriber spreads the words over 8 s; the narration measured 4 s
    let registry = StepRegistry::new().with(TimeCaptions);
    let seeds = [
        fields::AUDIO_PATH,
        fields::VOICEOVER_DURATION,
        fields::FORMAT_VERTICAL,
    ];
    let fx = fixture_with_seeds(dir.path(), MockCompletion::scripted(words(8)), 8.0, registry, &seeds);
    let present = [
        (fields::AUDIO_PATH, Value::from(audio.to_string_lossy().to_string())),
        (fields::VOICEOVER_DURATION, Value::from(4.0)),
        (fields::FORMAT_VERTICAL, Value::Bool(true)),
    ]
    .into_iter()
    .map(|(f, v)| (f.to_string(), v))
    .collect();
    let mut job = JobState::new(JobId::new(), present);

    fx.executor.run(&mut job).await.unwrap();

    let captions: Vec<TimedEntry<String>> = job.get(fields::TIMED_CAPTIONS).unwrap();
    let texts: Vec<&str> = captions.iter().map(|c| c.payload.as_str()).collect();
    assert_eq!(texts, vec!["owl1 owl2 owl3", "owl4 owl5 owl6"]);
    assert_eq!(captions[1].end, 4.0);
    assert!(captions.iter().all(|c| c.is_within(4.0) && c.start < c.end));
}

#[tokio::test]
async fn test_long_script_trimmed_to_word_limit() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(150);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 30.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    fx.executor.run(&mut job).await.unwrap();

    let narration: String = job.get(fields::NARRATION_SCRIPT).unwrap();
    assert_eq!(narration.split_whitespace().count(), 90);
    assert!(narration.ends_with("owl90..."));
    let original: String = job.get(fields::SCRIPT).unwrap();
    assert_eq!(original, script);
}

#[tokio::test]
async fn test_long_narration_is_clipped() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(60);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 42.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, false))
        .await
        .unwrap();
    fx.executor.run(&mut job).await.unwrap();

    assert_eq!(fx.renderer.plans()[0].clip_seconds(), Some(30.0));
}

#[tokio::test]
async fn test_script_generated_from_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(dir.path(), MockCompletion::scripted(words(30)), 10.0);

    let seed = JobSeed::builder()
        .script_prompt("snowy owls")
        .build()
        .unwrap();
    let mut job = fx.executor.create_job(&seed).await.unwrap();
    let run = fx.executor.run(&mut job).await.unwrap();

    assert_eq!(run.executed()[0], "generate_script");
    let first = &fx.completion.requests()[0];
    assert!(first.prompt().contains("snowy owls (must be under 30 seconds)"));
    assert_eq!(*first.temperature(), 1.0);
    assert!(job.is_ready());
}

#[tokio::test]
async fn test_non_english_narration_is_translated() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(20);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 8.0);

    let seed = JobSeed::builder()
        .script(script.clone())
        .language(Language::Spanish)
        .build()
        .unwrap();
    let mut job = fx.executor.create_job(&seed).await.unwrap();
    fx.executor.run(&mut job).await.unwrap();

    let spoken: String = job.get(fields::SPOKEN_SCRIPT).unwrap();
    assert_eq!(spoken, format!("[translated] {}", script));
}

#[tokio::test]
async fn test_background_music_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(20);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 8.0);

    let known = JobSeed::builder()
        .script(script.clone())
        .background_music_name("calm")
        .build()
        .unwrap();
    let mut job = fx.executor.create_job(&known).await.unwrap();
    fx.executor.run(&mut job).await.unwrap();
    let url: Option<String> = job.optional(fields::BACKGROUND_MUSIC_URL).unwrap();
    assert_eq!(url.as_deref(), Some("https://music.test/calm.mp3"));
    assert!(fx.renderer.plans()[0].layers().contains(&RenderLayer::BackgroundMusic {
        url: "https://music.test/calm.mp3".to_string(),
        volume: 0.08,
        loop_until: 8.0,
    }));

    let unknown = JobSeed::builder()
        .script(script)
        .background_music_name("polka")
        .build()
        .unwrap();
    let mut job = fx.executor.create_job(&unknown).await.unwrap();
    fx.executor.run(&mut job).await.unwrap();
    assert!(job.is_populated(fields::BACKGROUND_MUSIC_URL));
    let url: Option<String> = job.optional(fields::BACKGROUND_MUSIC_URL).unwrap();
    assert_eq!(url, None);
}

#[tokio::test]
async fn test_malformed_json_is_asked_again() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(30);
    let malformed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&malformed);
    let answer_script = script.clone();
    let completion = MockCompletion::new(move |request| {
        let system = request.system().clone().unwrap_or_default();
        if system.contains("still images") && counter.fetch_add(1, Ordering::SeqCst) < 3 {
            return Ok("Sure! Here are some great images for you.".to_string());
        }
        Ok(canned_answer(request, &answer_script))
    });
    let fx = fixture(dir.path(), completion, 10.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    fx.executor.run(&mut job).await.unwrap();

    assert_eq!(malformed.load(Ordering::SeqCst), 4);
    assert!(job.is_ready());
}

#[tokio::test]
async fn test_persistently_malformed_json_fails_the_step() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(30);
    let answer_script = script.clone();
    let completion = MockCompletion::new(move |request| {
        let system = request.system().clone().unwrap_or_default();
        if system.contains("stock footage") {
            return Ok(r#"{"video_segments": []}"#.to_string());
        }
        Ok(canned_answer(request, &answer_script))
    });
    let fx = fixture(dir.path(), completion, 10.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    let err = fx.executor.run(&mut job).await.unwrap_err();

    match err.kind() {
        ReelsmithErrorKind::Step(step) => {
            assert_eq!(step.step, "generate_video_search_terms");
            assert_eq!(step.job_id, job.job_id().to_string());
        }
        other => panic!("expected a step error, got {}", other),
    }
    match err.root_kind() {
        ReelsmithErrorKind::Parse(parse) => assert_eq!(parse.attempts, 4),
        other => panic!("expected a parse error, got {}", other),
    }
    // Earlier steps stay checkpointed
    assert!(job.is_populated(fields::IMAGE_QUERIES));
    assert!(!job.is_populated(fields::TIMED_VIDEO_SEARCHES));
}

#[tokio::test]
async fn test_resume_after_failure_reruns_only_the_failed_step() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(30);
    let metadata_down = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&metadata_down);
    let answer_script = script.clone();
    let completion = MockCompletion::new(move |request| {
        let system = request.system().clone().unwrap_or_default();
        if system.contains("metadata") && flag.load(Ordering::SeqCst) {
            return Err(ProviderError::new(ProviderErrorKind::Http {
                status_code: 400,
                message: "bad request".to_string(),
            }));
        }
        Ok(canned_answer(request, &answer_script))
    });
    let fx = fixture(dir.path(), completion, 10.0);

    let job_id = JobId::new();
    let mut job = fx
        .executor
        .create_job_with_id(job_id.clone(), &script_seed(&script, true))
        .await
        .unwrap();
    let err = fx.executor.run(&mut job).await.unwrap_err();
    assert!(format!("{}", err).contains("write_metadata"));
    assert!(fx.store.get(&job_id, fields::RENDERED_VIDEO_PATH).await.unwrap().is_some());
    assert!(!job.is_ready());

    metadata_down.store(false, Ordering::SeqCst);
    let run = fx.executor.resume(&job_id).await.unwrap();

    assert_eq!(
        run.executed(),
        &vec!["write_metadata".to_string(), "publish_video".to_string()]
    );
    assert_eq!(fx.renderer.plans().len(), 1);
    assert_eq!(fx.narrator.call_count(), 1);
    assert!(run.artifact().is_some());
}

/// Answers metadata requests with a new title every time.
fn retitling_completion(script: String) -> MockCompletion {
    let titles = AtomicUsize::new(0);
    MockCompletion::new(move |request| {
        let system = request.system().clone().unwrap_or_default();
        if system.contains("metadata") {
            let n = titles.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(format!(
                r#"{{"title": "Owls Take {}", "description": "Take {}."}}"#,
                n, n
            ));
        }
        Ok(canned_answer(request, &script))
    })
}

#[tokio::test]
async fn test_republish_after_metadata_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(30);
    let fx = fixture(dir.path(), retitling_completion(script.clone()), 10.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    let first = fx.executor.run(&mut job).await.unwrap();
    let first_artifact = first.artifact().clone().unwrap();
    assert_eq!(first_artifact, dir.path().join("videos").join("Owls Take 1.mp4"));

    for field in [
        fields::TITLE,
        fields::DESCRIPTION,
        fields::VIDEO_PATH,
        fields::READY_TO_UPLOAD,
    ] {
        fx.store.clear(job.job_id(), field).await.unwrap();
    }
    let second = fx.executor.resume(job.job_id()).await.unwrap();

    assert_eq!(
        second.executed(),
        &vec!["write_metadata".to_string(), "publish_video".to_string()]
    );
    let second_artifact = second.artifact().clone().unwrap();
    assert_eq!(second_artifact, dir.path().join("videos").join("Owls Take 2.mp4"));
    assert_eq!(tokio::fs::read(&second_artifact).await.unwrap(), b"mp4");
    assert!(first_artifact.exists());
    assert_eq!(fx.renderer.plans().len(), 1);
}

#[tokio::test]
async fn test_publish_accepts_video_already_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(30);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 10.0);

    let mut job = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    let first = fx.executor.run(&mut job).await.unwrap();
    let completions = fx.completion.call_count();

    // As if the process died after placing the video but before checkpointing
    fx.store
        .clear(job.job_id(), fields::READY_TO_UPLOAD)
        .await
        .unwrap();
    let again = fx.executor.resume(job.job_id()).await.unwrap();

    assert_eq!(again.executed(), &vec!["publish_video".to_string()]);
    assert_eq!(again.artifact(), first.artifact());
    assert_eq!(fx.completion.call_count(), completions);
}

#[tokio::test]
async fn test_same_title_does_not_overwrite_another_job() {
    let dir = tempfile::tempdir().unwrap();
    let script = words(30);
    let fx = fixture(dir.path(), MockCompletion::scripted(script.clone()), 10.0);

    let mut first = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    let first_run = fx.executor.run(&mut first).await.unwrap();
    tokio::fs::write(first_run.artifact().clone().unwrap(), b"first job")
        .await
        .unwrap();

    let mut second = fx
        .executor
        .create_job(&script_seed(&script, true))
        .await
        .unwrap();
    let second_run = fx.executor.run(&mut second).await.unwrap();

    let videos = dir.path().join("videos");
    assert_eq!(first_run.artifact().clone().unwrap(), videos.join("Owls 5 Facts.mp4"));
    assert_eq!(
        second_run.artifact().clone().unwrap(),
        videos.join(format!("Owls 5 Facts {}.mp4", second.job_id()))
    );
    assert_eq!(
        tokio::fs::read(videos.join("Owls 5 Facts.mp4")).await.unwrap(),
        b"first job"
    );
}

#[tokio::test]
async fn test_unknown_job_cannot_be_resumed() {
    let dir = tempfile::tempdir().unwrap();
    let fx = fixture(dir.path(), MockCompletion::scripted(words(10)), 5.0);

    let err = fx.executor.resume(&JobId::new()).await.unwrap_err();
    assert!(matches!(err.kind(), ReelsmithErrorKind::Persistence(_)));
}
