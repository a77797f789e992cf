use crate::{build_prompt, AiError, GenerationBackend};
use buddy_core::{GenerationStage, ToneProfile, Variation};
use std::sync::Arc;
use std::time::Duration;

/// Runs the three-variation generation batch against a backend.
///
/// Calls are issued one after another. Each is bounded by `request_timeout`;
/// when it elapses the in-flight request future is dropped and the remaining
/// variations are never started.
#[derive(Clone)]
pub struct DraftGenerator {
    backend: Arc<dyn GenerationBackend>,
    request_timeout: Duration,
}

impl DraftGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>, request_timeout: Duration) -> Self {
        Self {
            backend,
            request_timeout,
        }
    }

    pub async fn probe(&self) -> bool {
        self.backend.probe().await
    }

    /// Produces the balanced, detailed and brief drafts, in that order.
    ///
    /// Input is validated before any request is made, and the endpoint is
    /// probed before the first generation call.
    pub async fn generate<F>(
        &self,
        email_text: &str,
        tone: Option<&ToneProfile>,
        mut on_stage: F,
    ) -> Result<[String; 3], AiError>
    where
        F: FnMut(GenerationStage) + Send,
    {
        if email_text.trim().is_empty() {
            return Err(AiError::Validation("email text is required".to_string()));
        }
        let tone = tone.ok_or_else(|| {
            AiError::Validation("a tone profile must be selected".to_string())
        })?;

        on_stage(GenerationStage::LoadingModel);
        if !self.backend.probe().await {
            return Err(AiError::Unreachable(
                "the local model server is not running; start it and try again".to_string(),
            ));
        }

        let balanced = self
            .run_variation(email_text, tone, Variation::Balanced, &mut on_stage)
            .await?;
        let detailed = self
            .run_variation(email_text, tone, Variation::Detailed, &mut on_stage)
            .await?;
        let brief = self
            .run_variation(email_text, tone, Variation::Brief, &mut on_stage)
            .await?;

        tracing::info!(tone = %tone.name, "generated draft batch");
        Ok([balanced, detailed, brief])
    }

    async fn run_variation<F>(
        &self,
        email_text: &str,
        tone: &ToneProfile,
        variation: Variation,
        on_stage: &mut F,
    ) -> Result<String, AiError>
    where
        F: FnMut(GenerationStage) + Send,
    {
        on_stage(GenerationStage::Generating(variation));
        let prompt = build_prompt(email_text, tone, variation);

        match tokio::time::timeout(self.request_timeout, self.backend.generate(&prompt)).await {
            Ok(Ok(text)) => {
                tracing::debug!(variation = variation.index(), chars = text.len(), "draft generated");
                Ok(text)
            }
            Ok(Err(err)) => {
                tracing::warn!(variation = variation.index(), "draft generation failed: {err}");
                Err(err)
            }
            Err(_elapsed) => {
                tracing::warn!(
                    variation = variation.index(),
                    timeout = ?self.request_timeout,
                    "draft generation timed out"
                );
                Err(AiError::Timeout {
                    variation: variation.index(),
                    after: self.request_timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use buddy_core::ToneProfileFields;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Hang,
        Status(u16),
    }

    #[derive(Default)]
    struct ScriptedBackend {
        unreachable: bool,
        replies: Mutex<VecDeque<Reply>>,
        prompts: Mutex<Vec<String>>,
        probes: Mutex<usize>,
    }

    impl ScriptedBackend {
        fn replying(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Text(text)) => Ok(text.to_string()),
                Some(Reply::Status(status)) => Err(AiError::Remote {
                    status,
                    message: "Service Unavailable".to_string(),
                }),
                Some(Reply::Hang) | None => {
                    std::future::pending::<()>().await;
                    Ok(String::new())
                }
            }
        }

        async fn probe(&self) -> bool {
            *self.probes.lock().unwrap() += 1;
            !self.unreachable
        }
    }

    fn tone() -> ToneProfile {
        ToneProfile::from_fields(
            ToneProfileFields {
                name: "Direct".to_string(),
                description: "Clear, concise, and to-the-point".to_string(),
                keywords: vec!["noted".to_string()],
                sample_phrases: vec!["Confirmed.".to_string()],
                personality_instructions: "Be clear and concise.".to_string(),
            },
            Utc::now(),
        )
    }

    fn generator(backend: &Arc<ScriptedBackend>) -> DraftGenerator {
        DraftGenerator::new(backend.clone(), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn produces_three_drafts_in_variation_order() {
        let backend = Arc::new(ScriptedBackend::replying(vec![
            Reply::Text("one"),
            Reply::Text("two"),
            Reply::Text("three"),
        ]));
        let mut stages = Vec::new();

        let drafts = generator(&backend)
            .generate("Can we move our meeting to Friday?", Some(&tone()), |stage| {
                stages.push(stage)
            })
            .await
            .unwrap();

        assert_eq!(drafts, ["one", "two", "three"].map(String::from));
        assert_eq!(
            stages,
            vec![
                GenerationStage::LoadingModel,
                GenerationStage::Generating(Variation::Balanced),
                GenerationStage::Generating(Variation::Detailed),
                GenerationStage::Generating(Variation::Brief),
            ]
        );

        let prompts = backend.prompts.lock().unwrap();
        for (prompt, variation) in prompts.iter().zip(Variation::ALL) {
            assert!(prompt.contains(variation.instruction()));
            assert!(prompt.contains("Can we move our meeting to Friday?"));
        }
    }

    #[tokio::test]
    async fn empty_email_fails_before_any_request() {
        let backend = Arc::new(ScriptedBackend::default());

        let err = generator(&backend)
            .generate("   \n", Some(&tone()), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Validation(_)));
        assert_eq!(backend.calls(), 0);
        assert_eq!(*backend.probes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_tone_fails_before_any_request() {
        let backend = Arc::new(ScriptedBackend::default());

        let err = generator(&backend)
            .generate("Hello", None, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Validation(_)));
        assert_eq!(backend.calls(), 0);
        assert_eq!(*backend.probes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn unreachable_endpoint_blocks_generation() {
        let backend = Arc::new(ScriptedBackend {
            unreachable: true,
            ..ScriptedBackend::default()
        });

        let err = generator(&backend)
            .generate("Hello", Some(&tone()), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Unreachable(_)));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn timeout_on_second_call_skips_the_third() {
        let backend = Arc::new(ScriptedBackend::replying(vec![
            Reply::Text("one"),
            Reply::Hang,
            Reply::Text("three"),
        ]));

        let err = generator(&backend)
            .generate("Hello", Some(&tone()), |_| {})
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "draft 2 generation timed out after 100ms");
        match err {
            AiError::Timeout { variation, after } => {
                assert_eq!(variation, 2);
                assert_eq!(after, Duration::from_millis(100));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn remote_error_aborts_remaining_calls() {
        let backend = Arc::new(ScriptedBackend::replying(vec![Reply::Status(503)]));

        let err = generator(&backend)
            .generate("Hello", Some(&tone()), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Remote { status: 503, .. }));
        assert_eq!(backend.calls(), 1);
    }
}
