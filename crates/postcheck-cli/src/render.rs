//! Plain-text rendering for terminal output.

use postcheck_core::{registry, HeuristicResult};
use postcheck_runtime::{ArtifactStatus, Prediction, ProviderStatus};

pub fn prediction(prediction: &Prediction) -> String {
    let verdict = &prediction.verdict;
    let mut out = format!(
        "Verdict:     {}\nConfidence:  {}%\nSource:      {}\nExplanation: {}\n",
        verdict.label.as_str().to_uppercase(),
        verdict.percent(),
        verdict.source,
        verdict.explanation
    );
    if let Some(reason) = &prediction.fallback {
        out.push_str(&format!("Fallback:    {}\n", reason));
    }
    out
}

pub fn heuristic(result: &HeuristicResult) -> String {
    let flags = if result.triggered.is_empty() {
        "none".to_string()
    } else {
        result
            .triggered
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = format!("Score:   {:.2}\nFlags:   {}\nReasons:\n", result.score, flags);
    for reason in &result.reasons {
        out.push_str(&format!("  - {}\n", reason));
    }
    out
}

pub fn patterns() -> String {
    let mut out = String::new();
    for category in registry() {
        out.push_str(&format!("{}\n", category.name()));
        for matcher in &category.matchers {
            out.push_str(&format!("  {}\n", matcher.as_str()));
        }
    }
    out
}

fn artifact_line(name: &str, status: &ArtifactStatus) -> String {
    match status.loaded_at {
        Some(at) => format!("{:<11} loaded at {}\n", name, at.to_rfc3339()),
        None => format!("{:<11} not loaded\n", name),
    }
}

pub fn status(status: &ProviderStatus) -> String {
    let mut out = format!("Source:     {}\n", status.source);
    out.push_str(&artifact_line("Vectorizer:", &status.vectorizer));
    out.push_str(&artifact_line("Classifier:", &status.classifier));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcheck_core::HeuristicScorer;
    use postcheck_runtime::{Engine, FallbackReason};

    #[test]
    fn test_prediction_output() {
        let engine = Engine::heuristic_only();
        let out = prediction(&engine.predict_explained("Contact hr@gmail.com for details"));
        assert!(out.contains("Verdict:     GENUINE"));
        assert!(out.contains("Confidence:  75%"));
        assert!(out.contains("Source:      heuristic"));
        assert!(out.contains(&format!("Fallback:    {}", FallbackReason::ModelUnavailable)));
    }

    #[test]
    fn test_heuristic_output() {
        let out = heuristic(&HeuristicScorer::new().score("Telegram only, 50k per week"));
        assert!(out.contains("Score:   0.50"));
        assert!(out.contains("Flags:   whatsapp, high_pay"));
    }

    #[test]
    fn test_patterns_lists_every_category() {
        let out = patterns();
        for name in ["fee", "whatsapp", "personal_contact", "vague", "high_pay"] {
            assert!(out.lines().any(|l| l == name));
        }
    }

    #[test]
    fn test_status_output() {
        let engine = Engine::heuristic_only();
        let out = status(&engine.provider().status());
        assert!(out.contains("Source:     disabled"));
        assert!(out.contains("not loaded"));
    }
}
