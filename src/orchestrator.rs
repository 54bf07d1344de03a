use crate::config::{Credentials, RotationOutcome};
use crate::error::{Error, Result};
use crate::logger::Journal;
use crate::models::{
    ChatMessage, EncodedImage, EngineRoute, GenerationOutcome, GenerationRequest,
};
use crate::presets::{fallback_preset, Preset};
use crate::prompt::{self, GenerationContext, Mode};
use crate::providers::{
    ArkClient, Assistant, GeminiClient, Multimodal, OpenAiClient, StabilityClient, TextToImage,
};
use crate::registry::{model_registry, validate_model_call, Provider};
use std::sync::Arc;

/// Coordinates one generation request end to end: prompt construction,
/// engine routing, the single fallback from a fast engine to the multimodal
/// engine, and credential rotation with one retry on rate limits.
///
/// Credentials are passed into every call and only the ring cursor is
/// mutated; persisting them (and anything else) stays with the caller. Since
/// `generate` borrows the credentials mutably, at most one generation can be
/// in flight per credential set.
pub struct Orchestrator {
    multimodal: Arc<dyn Multimodal>,
    stability: Arc<dyn TextToImage>,
    openai: Arc<dyn TextToImage>,
    seedream: Arc<dyn TextToImage>,
    assistant: Arc<dyn Assistant>,
    journal: Journal,
}

impl Orchestrator {
    pub fn new(journal: Journal) -> Self {
        let http = reqwest::Client::new();
        Self {
            multimodal: Arc::new(GeminiClient::new(
                http.clone(),
                remote_id("gemini", "gemini-2.5-flash-image"),
            )),
            stability: Arc::new(StabilityClient::new(http.clone())),
            openai: Arc::new(OpenAiClient::new(http.clone(), remote_id("dall-e-3", "dall-e-3"))),
            seedream: Arc::new(ArkClient::new(
                http.clone(),
                remote_id("seedream", "seedream-4-5-251128"),
            )),
            assistant: Arc::new(ArkClient::new(
                http,
                remote_id("seedream", "seedream-4-5-251128"),
            )),
            journal,
        }
    }

    fn with_engines(
        multimodal: Arc<dyn Multimodal>,
        stability: Arc<dyn TextToImage>,
        openai: Arc<dyn TextToImage>,
        seedream: Arc<dyn TextToImage>,
        assistant: Arc<dyn Assistant>,
        journal: Journal,
    ) -> Self {
        Self {
            multimodal,
            stability,
            openai,
            seedream,
            assistant,
            journal,
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Run one generation request. Yields exactly one image or one
    /// classified error, never a partial result.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        credentials: &mut Credentials,
    ) -> Result<GenerationOutcome> {
        let preset = match &request.preset {
            Some(preset) => preset.clone(),
            None if request.mode == Mode::Vectorize => fallback_preset(),
            None => return Err(Error::MissingPreset),
        };

        self.journal.process("Synthesizing visual geometry...");
        self.journal.info(format!("Applying preset: {}", preset.name));

        let ctx = GenerationContext {
            prompt: prompt::effective_text(request.mode, &request.text),
            preset,
            reference: request.reference.clone(),
            strict_fidelity: request.strict_fidelity,
        };
        if ctx.strict_fidelity && ctx.reference.is_some() {
            self.journal
                .info("High fidelity mode active: prioritizing reference subject");
        }

        let built_prompt = prompt::build_prompt(request.mode, &ctx);
        let bypass = prompt::bypass_fast_engine(&ctx);

        let model = validate_model_call(&request.model_id, credentials)?;

        let mut route = EngineRoute::Multimodal;
        if !model.provider.is_multimodal() {
            if bypass {
                self.journal.info(format!(
                    "{} mode: bypassing external engines for direct image processing",
                    request.mode.label()
                ));
            } else {
                self.journal.info(format!("Using {} engine...", model.label));
                let engine = self.fast_engine(model.provider);
                let api_key = fast_engine_key(model.provider, credentials)?;

                // One attempt only; any failure falls through to the
                // multimodal engine.
                match engine.generate(&ctx.prompt, &ctx.preset, api_key).await {
                    Ok(image) => {
                        self.journal.success("Synthesis complete. Image rendered.");
                        return Ok(GenerationOutcome {
                            image,
                            preset_name: ctx.preset.name.clone(),
                            route: EngineRoute::FastEngine(model.provider),
                        });
                    }
                    Err(err) => {
                        self.journal
                            .error(format!("External engine unavailable: {}", err));
                        self.journal.info("Falling back to the multimodal engine...");
                        route = EngineRoute::MultimodalFallback;
                    }
                }
            }
        }

        let image = self
            .multimodal_generate(&built_prompt, &ctx, credentials)
            .await?;
        self.journal.success("Synthesis complete. Image rendered.");

        Ok(GenerationOutcome {
            image,
            preset_name: ctx.preset.name.clone(),
            route,
        })
    }

    /// Extract a reusable style preset from a reference image. Same
    /// rate-limit policy as generation: one rotation, one retry.
    pub async fn analyze_reference_image(
        &self,
        image: &EncodedImage,
        credentials: &mut Credentials,
    ) -> Result<Preset> {
        self.journal.process("Initiating visual DNA extraction...");

        let api_key = active_gemini_key(credentials)?;
        match self.multimodal.analyze_style(image, &api_key).await {
            Ok(preset) => {
                self.journal.success("Style extraction complete.");
                Ok(preset)
            }
            Err(err) if err.is_rate_limit() => match credentials.gemini.rotate() {
                RotationOutcome::Rotated(index) => {
                    self.log_node_switch(index);
                    let api_key = active_gemini_key(credentials)?;
                    match self.multimodal.analyze_style(image, &api_key).await {
                        Ok(preset) => {
                            self.journal.success("Style extraction complete.");
                            Ok(preset)
                        }
                        Err(retry_err) if retry_err.is_rate_limit() => {
                            Err(Error::RateLimited(retry_err.to_string()))
                        }
                        Err(retry_err) => Err(classify(retry_err)),
                    }
                }
                RotationOutcome::Exhausted => {
                    self.log_exhaustion();
                    Err(Error::RateLimited(err.to_string()))
                }
            },
            Err(err) => Err(classify(err)),
        }
    }

    /// Ask the design assistant. Single credential slot, no rotation.
    pub async fn chat(&self, messages: &[ChatMessage], credentials: &Credentials) -> Result<String> {
        let api_key = credentials
            .ark_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(Error::MissingCredential("BytePlus"))?;

        self.assistant
            .chat(messages, api_key)
            .await
            .map_err(classify)
    }

    async fn multimodal_generate(
        &self,
        built_prompt: &str,
        ctx: &GenerationContext,
        credentials: &mut Credentials,
    ) -> Result<EncodedImage> {
        self.journal.info("Using the multimodal engine...");

        let api_key = active_gemini_key(credentials)?;
        let first = self
            .multimodal
            .generate(built_prompt, &ctx.preset, ctx.reference.as_ref(), &api_key)
            .await;

        let err = match first {
            Ok(image) => return Ok(image),
            Err(err) if err.is_rate_limit() => err,
            Err(err) => return Err(classify(err)),
        };

        match credentials.gemini.rotate() {
            RotationOutcome::Rotated(index) => {
                self.log_node_switch(index);
                let api_key = active_gemini_key(credentials)?;
                match self
                    .multimodal
                    .generate(built_prompt, &ctx.preset, ctx.reference.as_ref(), &api_key)
                    .await
                {
                    Ok(image) => Ok(image),
                    Err(retry_err) if retry_err.is_rate_limit() => {
                        Err(Error::RateLimited(retry_err.to_string()))
                    }
                    Err(retry_err) => Err(classify(retry_err)),
                }
            }
            RotationOutcome::Exhausted => {
                self.log_exhaustion();
                Err(Error::RateLimited(err.to_string()))
            }
        }
    }

    fn fast_engine(&self, provider: Provider) -> &Arc<dyn TextToImage> {
        match provider {
            Provider::StabilityAi => &self.stability,
            Provider::OpenAi => &self.openai,
            Provider::BytePlus => &self.seedream,
            // The validator only routes non-multimodal providers here.
            Provider::GoogleGemini => unreachable!("multimodal provider is not a fast engine"),
        }
    }

    fn log_node_switch(&self, index: usize) {
        self.journal.process(format!(
            "Rate limit detected. Switching to node {:02}...",
            index + 1
        ));
    }

    fn log_exhaustion(&self) {
        self.journal.error(
            "All multimodal free-tier nodes exhausted. Please update API keys in settings.",
        );
    }
}

fn remote_id(model_id: &str, fallback: &'static str) -> &'static str {
    model_registry()
        .get(model_id)
        .and_then(|m| m.remote_model_id)
        .unwrap_or(fallback)
}

fn active_gemini_key(credentials: &Credentials) -> Result<String> {
    credentials
        .gemini
        .active_key()
        .map(str::to_string)
        .ok_or(Error::MissingCredential("Gemini"))
}

fn fast_engine_key<'a>(provider: Provider, credentials: &'a Credentials) -> Result<&'a str> {
    let key = match provider {
        Provider::StabilityAi => credentials.stability_api_key.as_deref(),
        Provider::OpenAi => credentials.openai_api_key.as_deref(),
        Provider::BytePlus => credentials.ark_api_key.as_deref(),
        Provider::GoogleGemini => None,
    };
    key.filter(|k| !k.is_empty())
        .ok_or(Error::MissingCredential(provider.label()))
}

/// Map an adapter-level failure into the caller-facing taxonomy. Applied
/// once, here; adapters report raw status and body.
fn classify(err: Error) -> Error {
    if err.is_rate_limit() {
        return Error::RateLimited(err.to_string());
    }
    match err {
        Error::Api {
            provider,
            status,
            body,
        } => {
            let detail = format!("{} ({}): {}", provider, status, body);
            match status {
                400..=499 => Error::InvalidPrompt(detail),
                500..=599 => Error::ServiceUnavailable(detail),
                _ => Error::Unknown(detail),
            }
        }
        Error::Request(msg) | Error::Response(msg) => Error::Unknown(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn image(tag: &[u8]) -> EncodedImage {
        EncodedImage::from_bytes("image/png", tag)
    }

    fn rate_limit_error() -> Error {
        Error::Api {
            provider: "Gemini",
            status: 429,
            body: "quota exceeded".into(),
        }
    }

    #[derive(Default)]
    struct MockFast {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TextToImage for MockFast {
        async fn generate(
            &self,
            _prompt: &str,
            _preset: &Preset,
            _api_key: &str,
        ) -> Result<EncodedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(Error::Api {
                    provider: "Stability AI",
                    status: 503,
                    body: "overloaded".into(),
                })
            } else {
                Ok(image(b"fast"))
            }
        }
    }

    /// Multimodal engine that replays a scripted sequence of results and
    /// records the API key used for each call.
    #[derive(Default)]
    struct MockMultimodal {
        calls: AtomicUsize,
        script: Mutex<VecDeque<Result<EncodedImage>>>,
        analyze_script: Mutex<VecDeque<Result<Preset>>>,
        keys_seen: Mutex<Vec<String>>,
    }

    impl MockMultimodal {
        fn scripted(results: Vec<Result<EncodedImage>>) -> Self {
            Self {
                script: Mutex::new(results.into()),
                ..Default::default()
            }
        }

        fn scripted_analysis(results: Vec<Result<Preset>>) -> Self {
            Self {
                analyze_script: Mutex::new(results.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Multimodal for MockMultimodal {
        async fn generate(
            &self,
            _prompt: &str,
            _preset: &Preset,
            _reference: Option<&EncodedImage>,
            api_key: &str,
        ) -> Result<EncodedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.keys_seen.lock().unwrap().push(api_key.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(image(b"multimodal")))
        }

        async fn analyze_style(&self, _image: &EncodedImage, api_key: &str) -> Result<Preset> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.keys_seen.lock().unwrap().push(api_key.to_string());
            self.analyze_script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(fallback_preset()))
        }
    }

    struct MockAssistant;

    #[async_trait]
    impl Assistant for MockAssistant {
        async fn chat(&self, messages: &[ChatMessage], _api_key: &str) -> Result<String> {
            Ok(format!("echo: {}", messages.len()))
        }
    }

    struct Harness {
        orchestrator: Orchestrator,
        fast: Arc<MockFast>,
        multimodal: Arc<MockMultimodal>,
    }

    fn harness(fast: MockFast, multimodal: MockMultimodal) -> Harness {
        let fast = Arc::new(fast);
        let multimodal = Arc::new(multimodal);
        let orchestrator = Orchestrator::with_engines(
            multimodal.clone(),
            fast.clone(),
            Arc::new(MockFast::default()),
            Arc::new(MockFast::default()),
            Arc::new(MockAssistant),
            Journal::new(),
        );
        Harness {
            orchestrator,
            fast,
            multimodal,
        }
    }

    fn full_credentials() -> Credentials {
        Credentials::new()
            .with_gemini_keys(vec!["g1".into(), "g2".into()])
            .with_stability_key("sk")
            .with_openai_key("ok")
            .with_ark_key("ak")
    }

    fn lettering_request() -> GenerationRequest {
        GenerationRequest::new(Mode::Lettering, "Coffee").with_preset(fallback_preset())
    }

    #[tokio::test]
    async fn fast_engine_is_used_exactly_once_and_multimodal_never() {
        let h = harness(MockFast::default(), MockMultimodal::default());
        let mut creds = full_credentials();

        let outcome = h
            .orchestrator
            .generate(&lettering_request(), &mut creds)
            .await
            .unwrap();

        assert_eq!(h.fast.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.route, EngineRoute::FastEngine(Provider::StabilityAi));
        assert_eq!(outcome.image, image(b"fast"));
    }

    #[tokio::test]
    async fn reference_image_bypasses_the_fast_engine() {
        let h = harness(MockFast::default(), MockMultimodal::default());
        let mut creds = full_credentials();

        let request = lettering_request().with_reference(image(b"ref"));
        let outcome = h.orchestrator.generate(&request, &mut creds).await.unwrap();

        assert_eq!(h.fast.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.route, EngineRoute::Multimodal);
    }

    #[tokio::test]
    async fn fast_engine_failure_falls_back_to_multimodal_once() {
        let h = harness(
            MockFast {
                fail: true,
                ..Default::default()
            },
            MockMultimodal::default(),
        );
        let mut creds = full_credentials();

        let outcome = h
            .orchestrator
            .generate(&lettering_request(), &mut creds)
            .await
            .unwrap();

        assert_eq!(h.fast.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.route, EngineRoute::MultimodalFallback);
        assert_eq!(outcome.image, image(b"multimodal"));
    }

    #[tokio::test]
    async fn rate_limit_rotates_once_and_retries_with_the_next_key() {
        let h = harness(
            MockFast::default(),
            MockMultimodal::scripted(vec![Err(rate_limit_error()), Ok(image(b"second"))]),
        );
        let mut creds = full_credentials();

        let request = GenerationRequest::new(Mode::Vectorize, "a fox");
        let outcome = h.orchestrator.generate(&request, &mut creds).await.unwrap();

        assert_eq!(outcome.image, image(b"second"));
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 2);
        assert_eq!(creds.gemini.cursor(), 1);
        assert_eq!(
            *h.multimodal.keys_seen.lock().unwrap(),
            vec!["g1".to_string(), "g2".to_string()]
        );
    }

    #[tokio::test]
    async fn exhausted_rotation_surfaces_rate_limited_with_cursor_unchanged() {
        let h = harness(
            MockFast::default(),
            MockMultimodal::scripted(vec![Err(rate_limit_error())]),
        );
        let mut creds = Credentials::new().with_gemini_keys(vec!["".into(), "g2".into()]);
        creds.gemini.select(1);

        let request = GenerationRequest::new(Mode::Vectorize, "a fox");
        let err = h
            .orchestrator
            .generate(&request, &mut creds)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RateLimited(_)));
        assert_eq!(creds.gemini.cursor(), 1);
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rate_limited_retry_gives_up_after_one_rotation() {
        let h = harness(
            MockFast::default(),
            MockMultimodal::scripted(vec![Err(rate_limit_error()), Err(rate_limit_error())]),
        );
        let mut creds = full_credentials();

        let request = GenerationRequest::new(Mode::Vectorize, "a fox");
        let err = h
            .orchestrator
            .generate(&request, &mut creds)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RateLimited(_)));
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 2);
        assert_eq!(creds.gemini.cursor(), 1);
    }

    #[tokio::test]
    async fn non_rate_limit_failures_propagate_without_retry() {
        let h = harness(
            MockFast::default(),
            MockMultimodal::scripted(vec![Err(Error::Api {
                provider: "Gemini",
                status: 400,
                body: "unsafe prompt".into(),
            })]),
        );
        let mut creds = full_credentials();

        let request = GenerationRequest::new(Mode::Vectorize, "a fox");
        let err = h
            .orchestrator
            .generate(&request, &mut creds)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPrompt(_)));
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 1);
        assert_eq!(creds.gemini.cursor(), 0);
    }

    #[tokio::test]
    async fn server_errors_classify_as_service_unavailable() {
        let h = harness(
            MockFast::default(),
            MockMultimodal::scripted(vec![Err(Error::Api {
                provider: "Gemini",
                status: 500,
                body: "internal".into(),
            })]),
        );
        let mut creds = full_credentials();

        let request = GenerationRequest::new(Mode::Vectorize, "a fox");
        let err = h
            .orchestrator
            .generate(&request, &mut creds)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn non_vectorize_modes_require_a_preset() {
        let h = harness(MockFast::default(), MockMultimodal::default());
        let mut creds = full_credentials();

        let request = GenerationRequest::new(Mode::Monogram, "AB");
        let err = h
            .orchestrator
            .generate(&request, &mut creds)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingPreset));
        assert_eq!(h.fast.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn vectorize_without_preset_uses_the_fallback() {
        let h = harness(MockFast::default(), MockMultimodal::default());
        let mut creds = full_credentials();

        let request = GenerationRequest::new(Mode::Vectorize, "");
        let outcome = h.orchestrator.generate(&request, &mut creds).await.unwrap();

        assert_eq!(outcome.preset_name, "Default Vector");
        assert_eq!(outcome.route, EngineRoute::Multimodal);
    }

    #[tokio::test]
    async fn unknown_model_is_rejected_before_any_engine_call() {
        let h = harness(MockFast::default(), MockMultimodal::default());
        let mut creds = full_credentials();

        let request = GenerationRequest::new(Mode::Vectorize, "a fox").with_model("midjourney");
        let err = h
            .orchestrator
            .generate(&request, &mut creds)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnknownModel(_)));
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn analyze_retries_once_after_rotation() {
        let mut analyzed = fallback_preset();
        analyzed.name = String::new();
        let h = harness(
            MockFast::default(),
            MockMultimodal::scripted_analysis(vec![
                Err(rate_limit_error()),
                Ok(analyzed.clone()),
            ]),
        );
        let mut creds = full_credentials();

        let preset = h
            .orchestrator
            .analyze_reference_image(&image(b"ref"), &mut creds)
            .await
            .unwrap();

        assert_eq!(preset, analyzed);
        assert_eq!(h.multimodal.calls.load(Ordering::SeqCst), 2);
        assert_eq!(creds.gemini.cursor(), 1);
    }

    #[tokio::test]
    async fn chat_requires_the_aggregator_key() {
        let h = harness(MockFast::default(), MockMultimodal::default());
        let creds = Credentials::new();

        let err = h
            .orchestrator
            .chat(&[ChatMessage::user("hello")], &creds)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingCredential("BytePlus")));

        let creds = full_credentials();
        let reply = h
            .orchestrator
            .chat(&[ChatMessage::user("hello")], &creds)
            .await
            .unwrap();
        assert_eq!(reply, "echo: 1");
    }
}
