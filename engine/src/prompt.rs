//! Prompt construction for the question generator

use sdk::types::ThemeContext;

/// Separator between previous questions in the avoidance list
pub const RECENT_SEPARATOR: &str = " | ";

/// Build the generation prompt for `theme`, steering away from `recent`.
///
/// Major themes may be named in the question; ambient ones only inspire it.
pub fn build_prompt(theme: &ThemeContext, recent: &[&str]) -> String {
    let theme_rule = if theme.is_major {
        format!(
            "- Today is {}. You may mention it by name in the question \
             (e.g. \"It's {}! ...\").",
            theme.theme, theme.theme
        )
    } else {
        format!(
            "- Do not name \"{}\" or refer to it directly. \
             Ask a question that is only inspired by it.",
            theme.theme
        )
    };

    let avoid = if recent.is_empty() {
        "(none yet)".to_string()
    } else {
        recent.join(RECENT_SEPARATOR)
    };

    let mut prompt = String::new();
    prompt.push_str("Generate one \"Question of the Day.\"\n");
    prompt.push_str(&format!("Current Theme: {}\n", theme.theme));
    prompt.push_str("Style:\n");
    prompt.push_str(&theme_rule);
    prompt.push('\n');
    prompt.push_str(
        "- Grounded in reality. No surreal, abstract or impossible hypothetical scenarios.\n",
    );
    prompt.push_str(&format!(
        "- DO NOT repeat themes or questions similar to: {}\n",
        avoid
    ));
    prompt.push_str(
        "Return ONLY the question text: exactly one question, no commentary, \
         no surrounding quotation marks.",
    );
    prompt
}
