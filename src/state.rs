//! View state and its transitions.
//!
//! `ViewState` is never mutated in place; every change goes through
//! [`reduce`], which consumes the old record and returns the next one.

use crate::api::models::{ModelStats, Prediction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStatus {
    #[default]
    Checking,
    Connected,
    Error,
}

/// Blocking messages the user has to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    EmptyInput,
    PredictionFailed,
}

impl Alert {
    pub fn message(self) -> &'static str {
        match self {
            Alert::EmptyInput => "⚠️ Veuillez entrer un message",
            Alert::PredictionFailed => "❌ Erreur : Impossible de contacter l'API",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub draft: String,
    pub api_status: ApiStatus,
    pub result: Option<Prediction>,
    pub stats: Option<ModelStats>,
    pub loading: bool,
    pub alert: Option<Alert>,
}

impl ViewState {
    pub fn draft_is_blank(&self) -> bool {
        self.draft.trim().is_empty()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.draft_is_blank()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    HealthChecked { ok: bool },
    StatsLoaded(ModelStats),
    DraftEdited(String),
    ExampleLoaded(String),
    SubmitRejected,
    PredictionStarted,
    PredictionSucceeded(Prediction),
    PredictionFailed,
    AlertDismissed,
}

pub fn reduce(state: ViewState, action: Action) -> ViewState {
    match action {
        Action::HealthChecked { ok } => {
            // one-shot: only the first probe result counts
            if state.api_status != ApiStatus::Checking {
                return state;
            }
            let api_status = if ok { ApiStatus::Connected } else { ApiStatus::Error };
            ViewState { api_status, ..state }
        }
        Action::StatsLoaded(stats) => {
            if state.stats.is_some() {
                return state;
            }
            ViewState { stats: Some(stats), ..state }
        }
        Action::DraftEdited(draft) => ViewState { draft, ..state },
        Action::ExampleLoaded(draft) => ViewState {
            draft,
            result: None,
            ..state
        },
        Action::SubmitRejected => ViewState {
            alert: Some(Alert::EmptyInput),
            ..state
        },
        Action::PredictionStarted => ViewState {
            result: None,
            loading: true,
            ..state
        },
        Action::PredictionSucceeded(prediction) => ViewState {
            result: Some(prediction),
            loading: false,
            ..state
        },
        Action::PredictionFailed => ViewState {
            result: None,
            loading: false,
            alert: Some(Alert::PredictionFailed),
            ..state
        },
        Action::AlertDismissed => ViewState { alert: None, ..state },
    }
}
