use crate::session::{
    CRITIC_CHECK_KEY, CURRENT_ARTICLE_KEY, FORMATTED_ARTICLE_KEY, RESEARCH_RESULTS_KEY,
    REVISED_KEY, TONE_CHECKED_KEY,
};
use crate::shared::ids::RoleId;
use serde::{Deserialize, Serialize};

/// Default model for every reference role.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Capability a role may invoke through the provider. Only the searcher uses
/// one today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTool {
    WebSearch,
}

/// Immutable configuration for one LLM-driven task executor: its task
/// contract (instruction text), the session key it writes, and optional tool
/// access. Constructed once at coordinator initialization and reused across
/// every invocation in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDescriptor {
    pub id: RoleId,
    pub description: String,
    pub instruction: String,
    pub output_key: String,
    #[serde(default)]
    pub tools: Vec<RoleTool>,
}

fn role(
    id: &str,
    description: &str,
    instruction: &str,
    output_key: &str,
    tools: Vec<RoleTool>,
) -> RoleDescriptor {
    RoleDescriptor {
        id: RoleId::parse(id).expect("reference role id is valid"),
        description: description.to_string(),
        instruction: instruction.to_string(),
        output_key: output_key.to_string(),
        tools,
    }
}

pub fn searcher_role() -> RoleDescriptor {
    role(
        "searcher",
        "Searches for relevant articles and information to ground a LinkedIn post.",
        "You are an agent that searches for relevant articles and information to \
generate LinkedIn posts. Research the topic provided in the session state under \
the key 'topic'.\n\
- Search for articles, blog posts, and other relevant content that can be used \
to generate a LinkedIn article.\n\
- Check the legitimacy of the sources and ensure the information is accurate \
and up-to-date.\n\
- Provide a summary of the search results and highlight the most relevant \
articles.\n\
- Provide the search results in a structured format.\n\
- Provide sources for the information you find.",
        RESEARCH_RESULTS_KEY,
        vec![RoleTool::WebSearch],
    )
}

pub fn article_generator_role() -> RoleDescriptor {
    role(
        "article_generator",
        "Generates a long-form article from the gathered research.",
        "You are an agent that generates articles based on the provided research. \
Review the research stored in the session state under 'research_results' \
together with the 'topic'. Write a long-form article that is relevant to the \
provided research.\n\
- Write the article about the topic under 'topic'.\n\
- The article should be informative, engaging, and suitable for a LinkedIn \
audience.\n\
- The article should be well-structured with an introduction, body, and \
conclusion.\n\
- The article should be around 1500-2000 words long.",
        CURRENT_ARTICLE_KEY,
        Vec::new(),
    )
}

pub fn tone_checker_role() -> RoleDescriptor {
    role(
        "tone_checker",
        "Checks and adjusts the article's tone for a LinkedIn audience.",
        "You are an agent that checks the tone of articles. Review the article \
stored in the session state under 'current_article'. Ensure the tone is \
professional, engaging, and suitable for a LinkedIn audience. Make edits to \
the article to improve the tone if necessary.",
        TONE_CHECKED_KEY,
        Vec::new(),
    )
}

pub fn revisor_role() -> RoleDescriptor {
    role(
        "revisor",
        "Revises the article for clarity, coherence, and quality.",
        "You are an agent that revises articles. Review the article stored in the \
session state under 'current_article_tone_checked'. Make edits to improve \
clarity, coherence, and overall quality. Ensure the article is well-structured \
and free of grammatical errors.",
        REVISED_KEY,
        Vec::new(),
    )
}

pub fn critic_role() -> RoleDescriptor {
    role(
        "critic",
        "Critiques the article and records a verdict for the final gate.",
        "You are an agent that critiques articles. Review the article stored in \
the session state under 'current_article_revised'. Evaluate the article for \
relevance, quality, and suitability for a LinkedIn audience. Provide feedback \
on the article and suggest improvements if necessary. If the article is not \
ready for posting, respond with exactly the word 'negative'.",
        CRITIC_CHECK_KEY,
        Vec::new(),
    )
}

pub fn formatter_role() -> RoleDescriptor {
    role(
        "formatter",
        "Formats the finished article as a LinkedIn post.",
        "You are an agent that formats articles for LinkedIn posts. Review the \
article stored in the session state under 'current_article_critic_check'. \
Format the article for a LinkedIn post with appropriate headings and bullet \
points. Ensure the article is visually appealing and easy to read.",
        FORMATTED_ARTICLE_KEY,
        Vec::new(),
    )
}
