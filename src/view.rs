use crate::api::client::SpamApi;
use crate::api::error::ApiError;
use crate::api::models::{ModelStats, Prediction};
use crate::samples::Category;
use crate::state::{Action, ViewState, reduce};
use rand::Rng;
use std::sync::Arc;

/// Owns the view state and runs the user-facing operations against a
/// [`SpamApi`]. All mutation happens through [`ClientView::dispatch`].
///
/// The window drives the network half itself, on the tokio runtime, and
/// feeds results back through `apply_health`, `apply_stats`,
/// `begin_submit` and `finish_submit`. `initialize` and
/// `submit_prediction` compose the same steps on a single task.
pub struct ClientView<A, R> {
    api: Arc<A>,
    rng: R,
    state: ViewState,
}

impl<A: SpamApi, R: Rng> ClientView<A, R> {
    pub fn new(api: Arc<A>, rng: R) -> Self {
        Self {
            api,
            rng,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> Arc<A> {
        self.api.clone()
    }

    pub fn dispatch(&mut self, action: Action) {
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
    }

    /// Probe health and fetch stats concurrently. Never fails.
    #[cfg(test)]
    pub async fn initialize(&mut self) {
        let (health, stats) = tokio::join!(self.api.health(), self.api.stats());
        self.apply_health(health);
        self.apply_stats(stats);
    }

    pub fn apply_health(&mut self, res: Result<(), ApiError>) {
        if let Err(e) = &res {
            log::warn!("Health check failed: {e}");
        }
        self.dispatch(Action::HealthChecked { ok: res.is_ok() });
    }

    pub fn apply_stats(&mut self, res: Result<ModelStats, ApiError>) {
        match res {
            Ok(stats) => self.dispatch(Action::StatsLoaded(stats)),
            Err(e) => log::warn!("Stats unavailable: {e}"),
        }
    }

    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.dispatch(Action::DraftEdited(text.into()));
    }

    pub fn load_example(&mut self, category: Category) -> &'static str {
        let sample = category.pick(&mut self.rng);
        self.dispatch(Action::ExampleLoaded(sample.to_string()));
        sample
    }

    /// Guard and start a prediction. Returns the text to send, or `None`
    /// when nothing should go out (blank draft, or a call already in flight).
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.state.loading {
            return None;
        }
        if self.state.draft_is_blank() {
            self.dispatch(Action::SubmitRejected);
            return None;
        }
        self.dispatch(Action::PredictionStarted);
        Some(self.state.draft.clone())
    }

    pub fn finish_submit(&mut self, outcome: Result<Prediction, ApiError>) {
        match outcome {
            Ok(prediction) => {
                log::info!(
                    "Prediction: {} ({:.1}%)",
                    prediction.label,
                    prediction.confidence
                );
                self.dispatch(Action::PredictionSucceeded(prediction));
            }
            Err(e) => {
                log::error!("Prediction failed: {e}");
                self.dispatch(Action::PredictionFailed);
            }
        }
    }

    #[cfg(test)]
    pub async fn submit_prediction(&mut self) {
        let Some(text) = self.begin_submit() else {
            return;
        };
        let outcome = self.api.predict(&text).await;
        self.finish_submit(outcome);
    }

    pub fn dismiss_alert(&mut self) {
        self.dispatch(Action::AlertDismissed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiClient;
    use crate::api::models::{Accuracy, Verdict};
    use crate::samples::{HAM_SAMPLES, SPAM_SAMPLES};
    use crate::state::{Alert, ApiStatus};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use reqwest::StatusCode;
    use serde_json::Map;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    enum Reply {
        Ok(f64, &'static str),
        Status(StatusCode),
        Malformed,
    }

    struct FakeApi {
        healthy: bool,
        stats: Option<&'static str>,
        reply: Reply,
        health_calls: AtomicUsize,
        stats_calls: AtomicUsize,
        sent: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new(reply: Reply) -> Self {
            Self {
                healthy: true,
                stats: Some("97.8%"),
                reply,
                health_calls: AtomicUsize::new(0),
                stats_calls: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl SpamApi for FakeApi {
        async fn health(&self) -> Result<(), ApiError> {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            if self.healthy {
                Ok(())
            } else {
                Err(ApiError::Status { status: StatusCode::BAD_GATEWAY })
            }
        }

        async fn stats(&self) -> Result<ModelStats, ApiError> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            match self.stats {
                Some(acc) => Ok(ModelStats {
                    accuracy: Accuracy::Text(acc.into()),
                    extra: Map::new(),
                }),
                None => Err(ApiError::Status { status: StatusCode::NOT_FOUND }),
            }
        }

        async fn predict(&self, text: &str) -> Result<Prediction, ApiError> {
            self.sent.lock().unwrap().push(text.to_string());
            match &self.reply {
                Reply::Ok(confidence, label) => Prediction::new(*label, *confidence),
                Reply::Status(status) => Err(ApiError::Status { status: *status }),
                Reply::Malformed => Err(ApiError::MalformedResponse("missing confidence".into())),
            }
        }
    }

    fn make_view(api: FakeApi) -> (Arc<FakeApi>, ClientView<FakeApi, StdRng>) {
        let api = Arc::new(api);
        let view = ClientView::new(api.clone(), StdRng::seed_from_u64(1));
        (api, view)
    }

    #[tokio::test]
    async fn initialize_connects_and_loads_stats() {
        let (api, mut view) = make_view(FakeApi::new(Reply::Ok(50.0, "ham")));
        view.initialize().await;
        assert_eq!(view.state().api_status, ApiStatus::Connected);
        assert_eq!(
            view.state().stats.as_ref().map(|s| s.accuracy.to_string()),
            Some("97.8%".to_string())
        );
        assert_eq!(api.health_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 1);
    }

    /// Each call only completes once the other has started.
    struct RendezvousApi {
        health_started: Notify,
        stats_started: Notify,
    }

    impl SpamApi for RendezvousApi {
        async fn health(&self) -> Result<(), ApiError> {
            self.health_started.notify_one();
            self.stats_started.notified().await;
            Ok(())
        }

        async fn stats(&self) -> Result<ModelStats, ApiError> {
            self.stats_started.notify_one();
            self.health_started.notified().await;
            Ok(ModelStats {
                accuracy: Accuracy::Number(0.97),
                extra: Map::new(),
            })
        }

        async fn predict(&self, _text: &str) -> Result<Prediction, ApiError> {
            Err(ApiError::MalformedResponse("not used".into()))
        }
    }

    #[tokio::test]
    async fn initialize_runs_health_and_stats_together() {
        let api = Arc::new(RendezvousApi {
            health_started: Notify::new(),
            stats_started: Notify::new(),
        });
        let mut view = ClientView::new(api, StdRng::seed_from_u64(5));
        timeout(Duration::from_secs(5), view.initialize())
            .await
            .expect("health and stats were awaited one after the other");
        assert_eq!(view.state().api_status, ApiStatus::Connected);
        assert!(view.state().stats.is_some());
    }

    #[tokio::test]
    async fn initialize_survives_failures() {
        let mut fake = FakeApi::new(Reply::Ok(50.0, "ham"));
        fake.healthy = false;
        fake.stats = None;
        let (_, mut view) = make_view(fake);
        view.initialize().await;
        assert_eq!(view.state().api_status, ApiStatus::Error);
        assert!(view.state().stats.is_none());
        assert!(view.state().alert.is_none());
    }

    #[tokio::test]
    async fn submit_sends_the_draft_verbatim_once() {
        let (api, mut view) = make_view(FakeApi::new(Reply::Ok(95.3, "spam")));
        view.edit_draft("  FREE iPhone!\n");
        view.submit_prediction().await;

        assert_eq!(api.sent(), vec!["  FREE iPhone!\n".to_string()]);
        let state = view.state();
        assert!(!state.loading);
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.verdict, Verdict::Spam);
        assert_eq!(result.confidence, 95.3);
        assert!(state.alert.is_none());
    }

    #[tokio::test]
    async fn blank_draft_makes_no_call() {
        let (api, mut view) = make_view(FakeApi::new(Reply::Ok(95.3, "spam")));
        for blank in ["", "   ", "\n\t "] {
            view.edit_draft(blank);
            view.submit_prediction().await;
            assert_eq!(view.state().alert, Some(Alert::EmptyInput));
            assert!(!view.state().loading);
            view.dismiss_alert();
        }
        assert!(api.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_call_alerts_and_leaves_no_result() {
        for reply in [Reply::Status(StatusCode::INTERNAL_SERVER_ERROR), Reply::Malformed] {
            let (api, mut view) = make_view(FakeApi::new(reply));
            view.edit_draft("hello");
            view.submit_prediction().await;
            assert_eq!(api.sent().len(), 1);
            assert_eq!(view.state().alert, Some(Alert::PredictionFailed));
            assert!(view.state().result.is_none());
            assert!(!view.state().loading);
        }
    }

    #[test]
    fn second_submit_is_ignored_while_in_flight() {
        let (_, mut view) = make_view(FakeApi::new(Reply::Ok(10.0, "ham")));
        view.edit_draft("hello");
        assert_eq!(view.begin_submit().as_deref(), Some("hello"));
        assert!(view.state().loading);
        assert_eq!(view.begin_submit(), None);
        assert!(view.state().alert.is_none());

        view.finish_submit(Prediction::new("ham", 10.0));
        assert!(!view.state().loading);
        assert_eq!(view.state().result.as_ref().map(|r| r.verdict), Some(Verdict::Legitimate));
    }

    #[test]
    fn examples_come_from_the_fixed_pools_and_clear_the_result() {
        let (_, mut view) = make_view(FakeApi::new(Reply::Ok(10.0, "ham")));
        view.finish_submit(Prediction::new("ham", 10.0));
        assert!(view.state().result.is_some());

        for _ in 0..2 {
            let picked = view.load_example(Category::Ham);
            assert!(HAM_SAMPLES.contains(&picked));
            assert_eq!(view.state().draft, picked);
            assert!(view.state().result.is_none());
        }
        let picked = view.load_example(Category::Spam);
        assert!(SPAM_SAMPLES.contains(&picked));
        assert_eq!(HAM_SAMPLES.len(), 3);
        assert_eq!(SPAM_SAMPLES.len(), 3);
    }

    #[tokio::test]
    async fn unreachable_service_is_handled_end_to_end() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = Arc::new(ApiClient::new(&format!("http://{addr}")).unwrap());
        let mut view = ClientView::new(api, StdRng::seed_from_u64(9));
        view.initialize().await;
        assert_eq!(view.state().api_status, ApiStatus::Error);
        assert!(view.state().stats.is_none());

        view.edit_draft("Don't forget to bring the documents");
        view.submit_prediction().await;
        assert_eq!(view.state().alert, Some(Alert::PredictionFailed));
        assert!(view.state().result.is_none());
        assert!(!view.state().loading);
    }
}
