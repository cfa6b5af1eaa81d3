use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use serde_json::{json, Value};
use speech_gateway::{
    controllers::{
        recognition::{RecognitionController, WhisperController},
        tts::TtsController,
    },
    domain::{
        recognition::{CompletionRequest, CorrectionProfiles, Recognition, RecognitionService, WhisperService},
        tts::TtsService,
    },
    infrastructure::{
        audio::{AudioConverter, ConversionError, ConversionJob},
        http::{build_router, Controllers},
        repositories::{AudioStream, SpeechRepository, TranscriptionRepository, TtsRepository},
    },
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;


use api_client::TestClient;

pub const DEFAULT_VOICE: &str = "es-MX-JorgeNeural";

pub struct TestContext {
    pub client: TestClient,
    pub sounds_dir: PathBuf,
    pub tts: Arc<StubTtsProvider>,
    pub converter: Arc<StubConverter>,
    pub speech: Arc<StubSpeech>,
    pub google: Arc<StubSpeech>,
    pub whisper: Arc<StubWhisper>,
    _sounds: TempDir,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async { TestContext::new().await.expect("Failed to start test server") }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Sounds directory is removed when the TempDir drops
        }
    }
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let sounds = tempfile::tempdir()?;
        let sounds_dir = sounds.path().to_path_buf();

        let tts = Arc::new(StubTtsProvider::default());
        let converter = Arc::new(StubConverter::default());
        let speech = Arc::new(StubSpeech::default());
        let google = Arc::new(StubSpeech::default());
        let whisper = Arc::new(StubWhisper::default());

        let tts_service = Arc::new(TtsService::new(
            tts.clone(),
            converter.clone(),
            sounds_dir.clone(),
            2,
        ));
        let recognition_service = Arc::new(RecognitionService::new(
            speech.clone(),
            sounds_dir.clone(),
            "es-MX".to_string(),
        ));
        let google_service = Arc::new(RecognitionService::new(
            google.clone(),
            sounds_dir.clone(),
            "es-CO".to_string(),
        ));
        let whisper_service = Arc::new(WhisperService::new(
            whisper.clone(),
            sounds_dir.clone(),
            CorrectionProfiles::new("ft:date-parser".to_string(), "ft:user-correspond".to_string()),
        ));

        let app = build_router(
            Arc::new(sounds_dir.clone()),
            Controllers {
                tts: Arc::new(TtsController::new(tts_service, DEFAULT_VOICE.to_string())),
                recognition: Arc::new(RecognitionController::new(recognition_service)),
                google: Some(Arc::new(RecognitionController::new(google_service))),
                whisper: Some(Arc::new(WhisperController::new(whisper_service))),
            },
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            sounds_dir,
            tts,
            converter,
            speech,
            google,
            whisper,
            _sounds: sounds,
        })
    }

    /// Absolute path of a file under the sounds root
    pub fn sound_file(&self, relative: &str) -> PathBuf {
        self.sounds_dir.join(relative)
    }

    /// Place an audio file under the sounds root
    pub async fn put_sound(&self, relative: &str, contents: &[u8]) -> Result<()> {
        let path = self.sound_file(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }
}

/// TTS provider whose response can be changed between requests
pub struct StubTtsProvider {
    chunks: Mutex<Vec<Result<Bytes, String>>>,
    calls: AtomicUsize,
    payloads: Mutex<Vec<String>>,
}

impl Default for StubTtsProvider {
    fn default() -> Self {
        Self {
            chunks: Mutex::new(vec![Ok(Bytes::from_static(&[1, 0, 2, 0, 3, 0, 4, 0]))]),
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }
}

impl StubTtsProvider {
    pub fn respond_with(&self, chunks: Vec<Result<Bytes, String>>) {
        *self.chunks.lock().unwrap() = chunks;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<String> {
        self.payloads.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TtsRepository for StubTtsProvider {
    fn provider(&self) -> &'static str {
        "azure"
    }

    async fn synthesize(&self, payload: &str) -> Result<AudioStream, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.to_string());
        let chunks = self.chunks.lock().unwrap().clone();
        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn list_voices(&self) -> Result<Value, String> {
        Ok(json!([
            {"ShortName": "es-MX-JorgeNeural", "Locale": "es-MX", "Gender": "Male"},
            {"ShortName": "en-US-JennyNeural", "Locale": "en-US", "Gender": "Female"}
        ]))
    }
}

/// Converter that writes a marker file instead of running sox
#[derive(Default)]
pub struct StubConverter {
    fail: AtomicBool,
    jobs: AtomicUsize,
}

impl StubConverter {
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn jobs(&self) -> usize {
        self.jobs.load(Ordering::SeqCst)
    }
}

impl AudioConverter for StubConverter {
    fn convert(&self, job: &ConversionJob) -> Result<(), ConversionError> {
        self.jobs.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ConversionError::Failed {
                status: "exit status: 2".to_string(),
                stderr: "sox FAIL formats: can't open output file".to_string(),
            });
        }
        std::fs::write(&job.output, format!("{}@{}", job.output_spec.file_type, job.output_spec.rate))?;
        Ok(())
    }
}

/// Short-audio recognizer with a configurable verdict
pub struct StubSpeech {
    result: Mutex<Recognition>,
    languages: Mutex<Vec<String>>,
}

impl Default for StubSpeech {
    fn default() -> Self {
        Self {
            result: Mutex::new(Recognition::Recognized(" Sí, soy yo.".to_string())),
            languages: Mutex::new(Vec::new()),
        }
    }
}

impl StubSpeech {
    pub fn respond_with(&self, result: Recognition) {
        *self.result.lock().unwrap() = result;
    }

    pub fn languages(&self) -> Vec<String> {
        self.languages.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechRepository for StubSpeech {
    async fn recognize(&self, _audio: Vec<u8>, _content_type: &str, language: &str) -> Result<Recognition, String> {
        self.languages.lock().unwrap().push(language.to_string());
        Ok(self.result.lock().unwrap().clone())
    }
}

/// Whisper backend recording which endpoint was used
#[derive(Default)]
pub struct StubWhisper {
    calls: Mutex<Vec<String>>,
    completions: Mutex<Vec<CompletionRequest>>,
}

impl StubWhisper {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn completions(&self) -> Vec<CompletionRequest> {
        self.completions.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionRepository for StubWhisper {
    async fn transcribe(&self, _audio: &Path) -> Result<String, String> {
        self.calls.lock().unwrap().push("transcribe".to_string());
        Ok("in two weeks".to_string())
    }

    async fn translate(&self, _audio: &Path, prompt: &str) -> Result<String, String> {
        self.calls.lock().unwrap().push(format!("translate: {}", prompt));
        Ok("yes it is me".to_string())
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, String> {
        let answer = if request.model == "ft:date-parser" {
            "2026/10/31"
        } else {
            "True"
        };
        self.completions.lock().unwrap().push(request);
        Ok(answer.to_string())
    }
}
