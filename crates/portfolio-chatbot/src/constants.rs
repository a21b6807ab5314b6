//! Canned user-facing texts shared by the client and the terminal UI.

/// Greeting shown when a chat session opens.
pub const GREETING: &str = "Hi! I'm the portfolio assistant. I can help you learn more about the \
                            experience, projects, and skills featured on this site. What would you \
                            like to know?";

/// Shown by the terminal UI when a streaming turn fails outright.
pub const STREAM_ERROR_NOTICE: &str =
    "I apologize, but I'm having trouble processing your question. Please try again.";

/// Follow-up suggestions attached to the canned fallback answer.
pub const FALLBACK_FOLLOW_UPS: [&str; 3] = [
    "What projects are featured on this site?",
    "Which technologies come up most often?",
    "How can I get in touch?",
];

/// Contact address used when none is configured.
pub const DEFAULT_CONTACT_EMAIL: &str = "silvio.baratto22@gmail.com";
