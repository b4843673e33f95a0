//! General conversation handling
//!
//! Small talk never touches CRM data. With a model available the reply
//! is generated; otherwise (or on failure) a canned response keyed on
//! the message keeps the assistant responsive.

use std::sync::Arc;

use hcp_crm_core::CompletionModel;

const HELP_TEXT: &str = "I can help you manage HCP interactions. Start a message with '-' to give me a task:\n\
- Log one: \"-met with Dr. Sarah Johnson this morning at 9:15 about the cardiology trial\"\n\
- Adjust the form: \"-put sentiment as positive\"\n\
- Edit a record: \"-edit interaction 3 change time to 2:30 pm\"\n\
- Review history: \"-history for Dr. Johnson\"\n\
- Get insights: \"-insights for Dr. Patel last 30 days\"\n\
Anything else is just conversation.";

const GREETING: &str =
    "Hello! I'm your CRM assistant. Tell me about an HCP interaction and I'll log it for you.";

const FALLBACK: &str =
    "I'm here to help with your HCP interactions. Ask me to log, edit, or review them, or say 'help' for examples.";

pub struct ConversationHandler {
    model: Option<Arc<dyn CompletionModel>>,
}

impl ConversationHandler {
    /// Canned responses only.
    pub fn canned() -> Self {
        Self { model: None }
    }

    /// Model-generated replies with canned fallback.
    pub fn with_model(model: Arc<dyn CompletionModel>) -> Self {
        Self { model: Some(model) }
    }

    pub async fn respond(&self, text: &str) -> String {
        if let Some(canned) = canned_response(text) {
            return canned.to_string();
        }

        if let Some(model) = &self.model {
            match model.complete(&conversation_prompt(text)).await {
                Ok(reply) if !reply.trim().is_empty() => return reply.trim().to_string(),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "conversation call failed, using canned reply");
                }
            }
        }

        FALLBACK.to_string()
    }
}

fn canned_response(text: &str) -> Option<&'static str> {
    let lowered = text.trim().to_lowercase();
    if lowered == "help" || lowered.contains("what can you do") || lowered.contains("how do i") {
        return Some(HELP_TEXT);
    }
    if ["hello", "hi", "hey", "good morning", "good afternoon"]
        .iter()
        .any(|g| lowered == *g || lowered.starts_with(&format!("{} ", g)))
    {
        return Some(GREETING);
    }
    if lowered.starts_with("thank") {
        return Some("You're welcome! Let me know when you have another interaction to log.");
    }
    if lowered.contains("what is an hcp") || lowered.contains("what does hcp") {
        return Some(
            "HCP stands for healthcare professional, such as a physician, nurse practitioner, \
or pharmacist you meet with. Every interaction you log here is tied to one.",
        );
    }
    None
}

fn conversation_prompt(text: &str) -> String {
    format!(
        "You are a concise, friendly assistant for pharmaceutical sales reps using a CRM. \
Reply in at most two sentences. Do not invent CRM data.\n\nUser: {text}"
    )
}
