use crate::model::ActionResult;
use crate::protocol::{FeedbackRequest, OutboundMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackCategory {
    Bug,
    Feature,
    #[default]
    General,
}

impl FeedbackCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Bug => "bug",
            FeedbackCategory::Feature => "feature",
            FeedbackCategory::General => "general",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            FeedbackCategory::Bug => FeedbackCategory::Feature,
            FeedbackCategory::Feature => FeedbackCategory::General,
            FeedbackCategory::General => FeedbackCategory::Bug,
        }
    }
}

/// Inline banner under a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBanner {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

impl ResultBanner {
    pub fn from_result(result: &ActionResult, fallback: &str) -> Self {
        Self {
            success: result.success,
            message: result
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string()),
            error: result.error.clone().filter(|e| !e.is_empty()),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }
}

/// Feedback form
#[derive(Debug, Clone, Default)]
pub struct FeedbackForm {
    pub category: FeedbackCategory,
    pub message: String,
    pub submitting: bool,
    pub banner: Option<ResultBanner>,
}

impl FeedbackForm {
    /// Validate and build the submit command. An empty message shows an
    /// inline error and sends nothing; a submit already in flight is ignored.
    pub fn submit(&mut self, initiative_id: Option<String>) -> Option<OutboundMessage> {
        if self.submitting {
            return None;
        }
        let message = self.message.trim();
        if message.is_empty() {
            self.banner = Some(ResultBanner::invalid("Please enter a feedback message."));
            return None;
        }
        let request = FeedbackRequest {
            category: self.category.as_str().to_string(),
            message: message.to_string(),
            initiative_id,
        };
        self.submitting = true;
        self.banner = None;
        Some(OutboundMessage::SubmitFeedback(request))
    }

    /// Apply the host's `feedbackResult`
    pub fn apply_result(&mut self, result: &ActionResult) {
        self.submitting = false;
        self.banner = Some(ResultBanner::from_result(
            result,
            if result.success {
                "Feedback submitted."
            } else {
                "Feedback could not be submitted."
            },
        ));
        if result.success {
            self.message.clear();
        }
    }
}
