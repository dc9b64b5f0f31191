use crate::forum::PostEntry;

/// Upper bound on source text handed to the model, in characters.
pub const MAX_SOURCE_CHARS: usize = 12_000;

const POST_SYSTEM: &str = "You are a helpful assistant that summarizes reddit posts.";

const POST_INSTRUCTIONS: &str = "The summary should be concise and to the point. \
If it is a story, summarize what happened. If it describes an experience with a company \
or a person, add tips on how to avoid the same outcome. Write 5-10 sentences with proper \
spacing and paragraphs. Only return the summary, no other text.";

const ANSWER_SYSTEM: &str =
    "You are a helpful assistant that answers questions using the provided web page excerpts.";

const ANSWER_INSTRUCTIONS: &str = "Answer the question using only the excerpts above. \
Be concise and factual, use short paragraphs, and say so if the excerpts do not contain \
the answer. Only return the answer, no other text.";

/// A fixed system instruction plus the user message for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub system: String,
    pub user: String,
}

impl SummaryPrompt {
    /// Prompt for summarizing one scraped post. Includes the body when it was fetched.
    pub fn for_post(post: &PostEntry) -> Self {
        let mut user = format!(
            "Please summarize the following reddit post: {}\nTitle: {}\nFlair: {}\n",
            post.url, post.title, post.flair
        );
        if let Some(body) = post.body.as_deref() {
            user.push_str("Post text:\n");
            user.push_str(truncate_chars(body, MAX_SOURCE_CHARS));
            user.push('\n');
        }
        user.push_str(POST_INSTRUCTIONS);

        Self {
            system: POST_SYSTEM.to_string(),
            user,
        }
    }

    /// Prompt for answering a question from combined search-result text.
    pub fn for_answer(question: &str, combined_text: &str) -> Self {
        let user = format!(
            "Question: {}\n\nExcerpts:\n{}\n\n{}",
            question.trim(),
            truncate_chars(combined_text, MAX_SOURCE_CHARS),
            ANSWER_INSTRUCTIONS
        );
        Self {
            system: ANSWER_SYSTEM.to_string(),
            user,
        }
    }
}

/// Longest prefix of `text` with at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
