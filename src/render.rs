//! What the window shows for a given [`ViewState`]. Nothing here touches GTK,
//! so every branch of the layout can be checked in plain unit tests.

use crate::api::models::{ModelStats, Prediction, Verdict};
use crate::state::{ApiStatus, ViewState};

pub const TITLE: &str = "Détecteur de Spam SMS";
pub const SUBTITLE: &str = "Intelligence artificielle pour détecter les messages frauduleux";
pub const INPUT_LABEL: &str = "Entrez un message à analyser";
pub const INPUT_PLACEHOLDER: &str = "Tapez ou collez un message SMS ici...";
pub const EXAMPLES_LABEL: &str = "📝 Exemples rapides :";
pub const HAM_BUTTON: &str = "✅ Message normal";
pub const SPAM_BUTTON: &str = "⚠️ Message spam";
pub const TECHNOLOGY: &str = "Naïve Bayes + TF-IDF";
pub const TECHNOLOGY_NOTE: &str = "Machine Learning";
pub const FOOTER: [&str; 2] = [
    "⚡ Propulsé par FastAPI, scikit-learn et GTK",
    "🧠 Intelligence artificielle pour la cybersécurité",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Pending,
    Success,
    Danger,
}

impl Tone {
    /// libadwaita style class for the tone.
    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Pending => "warning",
            Tone::Success => "success",
            Tone::Danger => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBadge {
    pub text: &'static str,
    pub tone: Tone,
}

pub fn status_badge(status: ApiStatus) -> StatusBadge {
    match status {
        ApiStatus::Checking => StatusBadge { text: "⏳ Vérification...", tone: Tone::Pending },
        ApiStatus::Connected => StatusBadge { text: "✅ API connectée", tone: Tone::Success },
        ApiStatus::Error => StatusBadge { text: "❌ API déconnectée", tone: Tone::Danger },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitButton {
    pub sensitive: bool,
    pub spinning: bool,
    pub label: &'static str,
}

pub fn submit_button(state: &ViewState) -> SubmitButton {
    SubmitButton {
        sensitive: state.can_submit(),
        spinning: state.loading,
        label: if state.loading { "Analyse en cours..." } else { "Analyser le message" },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub tone: Tone,
    pub headline: &'static str,
    pub description: &'static str,
    /// Bar fill in `[0, 1]`; the bar is `fraction * 100` percent wide.
    pub fraction: f64,
    pub percent: String,
}

impl ResultCard {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let (tone, headline, description) = match prediction.verdict {
            Verdict::Spam => (
                Tone::Danger,
                "⚠️ SPAM DÉTECTÉ",
                "⛔ Ce message semble être un spam ou une tentative de fraude. Soyez très prudent et ne cliquez sur aucun lien !",
            ),
            Verdict::Legitimate => (
                Tone::Success,
                "✅ MESSAGE LÉGITIME",
                "👍 Ce message semble être légitime et sans danger. Aucune menace détectée.",
            ),
        };
        Self {
            tone,
            headline,
            description,
            fraction: prediction.confidence / 100.0,
            percent: one_decimal_percent(prediction.confidence),
        }
    }
}

/// One decimal, ties rounded away from zero (`95.25` → `95.3%`). Plain
/// `{:.1}` rounds exact binary ties to even.
fn one_decimal_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded:.1}%")
}

/// The hint over the empty text area.
pub fn placeholder_visible(state: &ViewState) -> bool {
    state.draft.is_empty()
}

/// The spinner wins over a result; in practice the result is already
/// cleared when loading starts.
pub fn result_card(state: &ViewState) -> Option<ResultCard> {
    if state.loading {
        return None;
    }
    state.result.as_ref().map(ResultCard::from_prediction)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsCard {
    pub accuracy: String,
    pub extra: Vec<(String, String)>,
}

impl StatsCard {
    pub fn from_stats(stats: &ModelStats) -> Self {
        Self {
            accuracy: stats.accuracy.to_string(),
            extra: stats.extra_rows(),
        }
    }
}

pub fn stats_card(state: &ViewState) -> Option<StatsCard> {
    state.stats.as_ref().map(StatsCard::from_stats)
}
