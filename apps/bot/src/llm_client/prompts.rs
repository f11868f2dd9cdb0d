// Prompt text sent to the generation provider.
// The four-block layout here must match what `generation::template` parses.

/// Daily question prompt. Replace `{topic}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"You are an experienced placement preparation assistant.
Generate **one interview question** from the topic: {topic}.

- Write the **answer in 4-6 sentences**, simple and clear, so that someone reading it can **understand the concept fully**.
- Use **easy language**, as if explaining to a student preparing for an interview.
- Include **one reference link** for further reading.
- Format exactly like this:
Topic: <Topic Name>

Q: <question>

A: <answer>

Reference: <link>
- Do not add any extra information or greetings."#;

pub fn build_question_prompt(topic: &str) -> String {
    QUESTION_PROMPT_TEMPLATE.replace("{topic}", topic)
}
