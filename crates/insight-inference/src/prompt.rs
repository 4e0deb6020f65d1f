//! Prompt construction for generative task extraction.

/// Task object schema shown to the model.
pub const TASK_SCHEMA: &str = r#"{ "id": "string", "description": "string", "priority": "low|medium|high", "dependencies": ["task-id-1", ...], "status": "ready|blocked" }"#;

/// Build the single user message sent to the model.
pub fn extraction_prompt(transcript: &str) -> String {
    format!(
        "You are an assistant that extracts actionable tasks from meeting transcripts. \
         Return ONLY a JSON array of task objects. No markdown, no commentary.\n\n\
         Task schema for each item:\n{schema}\n\n\
         Use short stable ids and list in \"dependencies\" the ids of tasks that must finish first.\n\n\
         Transcript:\n\n{transcript}\n\n\
         Respond with a JSON array only.",
        schema = TASK_SCHEMA,
        transcript = transcript,
    )
}
