//! Grounded prompt construction

use crate::db::RetrievalResult;

/// Fixed refusal returned whenever the answer is not in the document
pub const NO_INFO_ANSWER: &str = "I do not have the information needed to answer your question.";

/// Prompt template; `{context}` and `{question}` are filled once each
pub const PROMPT_TEMPLATE: &str = r#"CONTEXT:
{context}

RULES:
- Answer only based on CONTEXT.
- If the information is not explicitly in CONTEXT, respond:
  "I do not have the information needed to answer your question."
- Never invent or use external knowledge.
- Never produce opinions or interpretations beyond what is written.

EXAMPLES OF OUT-OF-CONTEXT QUESTIONS:
Question: "What is the capital of France?"
Answer: "I do not have the information needed to answer your question."

Question: "How many customers did we have in 2024?"
Answer: "I do not have the information needed to answer your question."

Question: "Do you think this is good or bad?"
Answer: "I do not have the information needed to answer your question."

USER QUESTION:
{question}

ANSWER THE "USER QUESTION""#;

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

/// Separator between retrieved chunks in the context block
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join retrieved chunk texts in rank order
pub fn build_context(results: &RetrievalResult) -> String {
    results
        .iter()
        .map(|r| r.text())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Fill the template with `context` and `question`.
///
/// Substitution is positional, so placeholder-like text inside the context or
/// the question is copied through untouched.
pub fn build_prompt(context: &str, question: &str) -> String {
    let (head, rest) = PROMPT_TEMPLATE
        .split_once(CONTEXT_SLOT)
        .unwrap_or((PROMPT_TEMPLATE, ""));
    let (middle, tail) = rest.split_once(QUESTION_SLOT).unwrap_or((rest, ""));

    let mut prompt =
        String::with_capacity(PROMPT_TEMPLATE.len() + context.len() + question.len());
    prompt.push_str(head);
    prompt.push_str(context);
    prompt.push_str(middle);
    prompt.push_str(question);
    prompt.push_str(tail);
    prompt
}
