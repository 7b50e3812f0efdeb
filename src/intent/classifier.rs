//! Meeting Action Classifier.
//!
//! Decides whether a sentence asks to create, update, cancel, or list
//! meetings. The four pattern families are evaluated independently and a
//! fixed precedence resolves conflicts: list > cancel > update > create,
//! then keyword-presence fallbacks, then default-to-create.

use crate::meeting::MeetingAction;
use crate::resolve::period;

use super::patterns::*;

// ============================================================================
// Classification Result
// ============================================================================

/// Outcome of classifying one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The action the sentence asks for.
    pub action: MeetingAction,
    /// Confidence in the chosen action (0.0 to 1.0).
    pub confidence: f32,
    /// Evidence collected along the way, as `family:token` markers.
    pub signals: Vec<String>,
}

impl Classification {
    fn new(action: MeetingAction, confidence: f32, signals: Vec<String>) -> Self {
        Self {
            action,
            confidence,
            signals,
        }
    }
}

/// One family's vote: confidence plus the evidence behind it.
type FamilyVote = Option<(f32, Vec<String>)>;

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies sentences into meeting actions.
///
/// Classification is pure and idempotent: the same sentence always yields
/// the same action, confidence, and signals.
pub struct IntentClassifier {
    /// Minimum confidence a family vote needs to count.
    confidence_threshold: f32,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a new classifier with default settings.
    pub fn new() -> Self {
        Self {
            confidence_threshold: 0.3,
        }
    }

    /// Create a classifier with a custom confidence threshold.
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            confidence_threshold: threshold,
        }
    }

    /// Classify a sentence into a meeting action.
    pub fn classify(&self, sentence: &str) -> Classification {
        let text = sentence.to_lowercase();
        let tokens = tokenize(sentence);

        // Cancel/update vocabulary negates create, whatever else happens.
        let blocking = first_keyword(&tokens, &NOT_CREATE_KEYWORDS)
            .map(|word| format!("blocked_by:{word}"));

        // ---- Pattern stage, fixed precedence ----

        if let Some((confidence, signals)) = self.gate(self.classify_list(&text, &tokens)) {
            return Classification::new(MeetingAction::ListEvents, confidence, signals);
        }

        if let Some((confidence, signals)) = self.gate(self.classify_cancel(&text, &tokens)) {
            return Classification::new(MeetingAction::Cancel, confidence, signals);
        }

        if let Some((confidence, signals)) = self.gate(self.classify_update(&text)) {
            return Classification::new(MeetingAction::Update, confidence, signals);
        }

        if blocking.is_none() {
            if let Some((confidence, signals)) = self.gate(self.classify_create(&text, &tokens)) {
                return Classification::new(MeetingAction::Create, confidence, signals);
            }
        }

        // ---- Keyword-presence fallbacks ----

        let meeting_word = first_keyword(&tokens, &MEETING_WORDS);

        if let Some(word) = meeting_word {
            if let Some(cancel_word) = first_keyword(&tokens, &CANCEL_KEYWORDS) {
                let mut signals = vec![
                    format!("cancel_word:{cancel_word}"),
                    format!("meeting_word:{word}"),
                ];
                signals.extend(blocking.iter().cloned());
                return Classification::new(MeetingAction::Cancel, 0.80, signals);
            }
            if let Some(update_word) = first_keyword(&tokens, &UPDATE_KEYWORDS) {
                let mut signals = vec![
                    format!("update_word:{update_word}"),
                    format!("meeting_word:{word}"),
                ];
                signals.extend(blocking.iter().cloned());
                return Classification::new(MeetingAction::Update, 0.75, signals);
            }
        }

        // ---- Default: create, weakly ----

        let mut signals = vec!["default_create".to_string()];
        signals.extend(blocking);
        Classification::new(MeetingAction::Create, 0.40, signals)
    }

    fn gate(&self, vote: FamilyVote) -> FamilyVote {
        vote.filter(|(confidence, _)| *confidence >= self.confidence_threshold)
    }

    // ========================================================================
    // List-events family
    // ========================================================================

    fn classify_list(&self, text: &str, tokens: &[String]) -> FamilyVote {
        let has_period = period::has_time_period(text);
        let list_word = first_keyword(tokens, &LIST_KEYWORDS);
        let event_word = first_keyword(tokens, &EVENT_WORDS);

        let mut signals = Vec::new();
        if let Some(word) = list_word {
            signals.push(format!("list_word:{word}"));
        }
        if let Some(word) = event_word {
            signals.push(format!("event_word:{word}"));
        }

        if let Some(tag) = LIST_TABLE.first_match(text) {
            signals.insert(0, format!("list_pattern:{tag}"));
            let confidence = if has_period { 0.95 } else { 0.90 };
            if !has_period {
                signals.push("needs_clarification".to_string());
            }
            return Some((confidence, signals));
        }

        // "list events", "check my schedule": both vocabularies present.
        if list_word.is_some() && event_word.is_some() {
            let confidence = if has_period { 0.95 } else { 0.90 };
            if !has_period {
                signals.push("needs_clarification".to_string());
            }
            return Some((confidence, signals));
        }

        // Question forms without a list verb ("what meetings do I have").
        if event_word.is_some() && list_word.is_none() {
            let question_words = ["what", "which", "how", "do", "does", "any"];
            if tokens.iter().any(|t| question_words.contains(&t.as_str())) {
                signals.push("question_form".to_string());
                let confidence = if has_period { 0.85 } else { 0.80 };
                if !has_period {
                    signals.push("needs_clarification".to_string());
                }
                return Some((confidence, signals));
            }
        }

        // A list verb plus a time period might still be a list request.
        if list_word.is_some() && has_period {
            signals.push("possible_list_request".to_string());
            return Some((0.60, signals));
        }

        None
    }

    // ========================================================================
    // Cancel family
    // ========================================================================

    fn classify_cancel(&self, text: &str, tokens: &[String]) -> FamilyVote {
        if let Some(tag) = CANCEL_TABLE.first_match(text) {
            return Some((0.95, vec![format!("cancel_pattern:{tag}")]));
        }

        // Generic cancel phrasings lose to reschedule vocabulary elsewhere
        // in the sentence ("cancel the 3pm and move it to 5" is an update).
        let guarded = tokens.iter().any(|t| RESCHEDULE_GUARD.contains(t.as_str()));
        if !guarded {
            if let Some(tag) = CANCEL_GENERIC_TABLE.first_match(text) {
                return Some((0.90, vec![format!("cancel_pattern:{tag}")]));
            }
        }

        None
    }

    // ========================================================================
    // Update / reschedule family
    // ========================================================================

    fn classify_update(&self, text: &str) -> FamilyVote {
        let tag = UPDATE_TABLE.first_match(text)?;
        let confidence = match tag {
            "reschedule_meeting" | "reschedule_pronoun" | "reschedule_article"
            | "bring_forward" | "update_meeting" => 0.95,
            _ => 0.90,
        };
        Some((confidence, vec![format!("update_pattern:{tag}")]))
    }

    // ========================================================================
    // Create family
    // ========================================================================

    fn classify_create(&self, text: &str, tokens: &[String]) -> FamilyVote {
        let create_word = first_keyword(tokens, &CREATE_KEYWORDS);
        let meeting_word = first_keyword(tokens, &MEETING_WORDS);

        if let Some(tag) = CREATE_TABLE.first_match(text) {
            let confidence = match tag {
                "create_meeting" => 0.95,
                "meeting_with" => 0.75,
                _ => 0.70,
            };
            return Some((confidence, vec![format!("create_pattern:{tag}")]));
        }

        match (create_word, meeting_word) {
            (Some(create), Some(meeting)) => Some((
                0.95,
                vec![
                    format!("create_word:{create}"),
                    format!("meeting_word:{meeting}"),
                ],
            )),
            (_, Some(meeting)) if tokens.iter().any(|t| t == "with") => Some((
                0.75,
                vec![format!("meeting_word:{meeting}"), "with_clause".to_string()],
            )),
            (Some(create), None) => Some((
                0.40,
                vec![format!("create_word:{create}"), "weak_create".to_string()],
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(sentence: &str) -> Classification {
        IntentClassifier::new().classify(sentence)
    }

    #[test]
    fn test_create_with_meeting_word() {
        let result = classify("Schedule a meeting with John tomorrow at 6pm");
        assert_eq!(result.action, MeetingAction::Create);
        assert!(result.confidence >= 0.9);
    }

    #[test]
    fn test_cancel_beats_create() {
        let result = classify("Please cancel the meeting I scheduled with John");
        assert_eq!(result.action, MeetingAction::Cancel);
    }

    #[test]
    fn test_cancel_keyword_blocks_create_flag() {
        // No cancel pattern fires, but the keyword plus a meeting word does.
        let result = classify("budget sync cancellation needed");
        assert_eq!(result.action, MeetingAction::Cancel);
    }

    #[test]
    fn test_generic_cancel_loses_to_reschedule() {
        let result = classify("I need to cancel and reschedule the standup");
        assert_eq!(result.action, MeetingAction::Update);
    }

    #[test]
    fn test_update_reschedule_pattern() {
        let result = classify("Reschedule the budget meeting to Friday");
        assert_eq!(result.action, MeetingAction::Update);
        assert!(result.signals.iter().any(|s| s.starts_with("update_pattern:")));
    }

    #[test]
    fn test_duration_change_is_update() {
        let result = classify("change the meeting duration from 30 minutes to 60 minutes");
        assert_eq!(result.action, MeetingAction::Update);
    }

    #[test]
    fn test_list_with_period() {
        let result = classify("show my meetings for tomorrow");
        assert_eq!(result.action, MeetingAction::ListEvents);
        assert!(result.confidence >= 0.9);
    }

    #[test]
    fn test_list_without_period_flags_clarification() {
        let result = classify("list my meetings");
        assert_eq!(result.action, MeetingAction::ListEvents);
        assert!(result.signals.iter().any(|s| s == "needs_clarification"));
    }

    #[test]
    fn test_question_form_list() {
        let result = classify("what meetings do I have today");
        assert_eq!(result.action, MeetingAction::ListEvents);
    }

    #[test]
    fn test_list_beats_cancel() {
        let result = classify("show me the meetings I cancelled this week");
        assert_eq!(result.action, MeetingAction::ListEvents);
    }

    #[test]
    fn test_default_is_create() {
        let result = classify("coffee at the office");
        assert_eq!(result.action, MeetingAction::Create);
        assert!(result.signals.iter().any(|s| s == "default_create"));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let first = classify("cancel the 3pm sync");
        let second = classify("cancel the 3pm sync");
        assert_eq!(first, second);
    }

    #[test]
    fn test_meeting_with_clause() {
        let result = classify("meeting with Sarah and the design team");
        assert_eq!(result.action, MeetingAction::Create);
    }
}
