/// Placeholder replaced by the diff blob when a template is rendered.
pub const DIFF_PLACEHOLDER: &str = "{diff}";

/// Scored review with a numbered list of improvements. The default.
const RUBRIC: &str = "As a valued member of our code review team, \
we'd like you to review the following changes made in a pull request. \
Please provide us with insightful advice to enhance the quality, maintainability, and readability of our code. \
Keep in mind that we're not looking for comments about deleted files \
or demands for additional comments and documentation in the code.\n\n\
Here are the pull request changes:\n\
```\n\
{diff}\
```\n\n\
We need your input in two parts:\n\n\
1. Score the changes from 0 (worst) to 100 (best) based on your assessment.\n\
2. Provide a short list of improvements. If code changes are needed, \
include them in your response. Remember to use markdown to format the code blocks appropriately.\n\n\
Please format your response as follows:\n\
**Score**: [Your score here and an emoji]\n\n\
**AI Suggested Improvements:**\n\
1. [First improvement suggestion]\n\
2. [Second improvement suggestion]\n\
...";

/// Open-ended request for review feedback.
const FREEFORM: &str = "Please review the following pull request changes and suggest \
any improvements you see. Use markdown code blocks for code.\n\n\
```\n\
{diff}\
```\n";

/// Instructional text wrapped around the diff blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PromptTemplate {
    #[default]
    Rubric,
    Freeform,
    /// User-supplied text; must contain [`DIFF_PLACEHOLDER`].
    Custom(String),
}

impl PromptTemplate {
    fn text(&self) -> &str {
        match self {
            PromptTemplate::Rubric => RUBRIC,
            PromptTemplate::Freeform => FREEFORM,
            PromptTemplate::Custom(text) => text.as_str(),
        }
    }

    /// Embed the diff blob verbatim. No truncation.
    pub fn render(&self, diff: &str) -> String {
        self.text().replace(DIFF_PLACEHOLDER, diff)
    }
}
