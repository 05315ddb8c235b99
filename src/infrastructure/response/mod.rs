use once_cell::sync::Lazy;
use regex::Regex;

static REASONING_BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(think|reasoning|internal)>.*?</(?:think|reasoning|internal)>|<think\s*/>")
        .unwrap()
});

/// Removes reasoning blocks some models emit ahead of their answer, so that
/// query text mentioned while "thinking" is not mistaken for the answer.
/// Everything outside those blocks is kept as written, apart from outer whitespace.
pub fn clean_llm_response(response: &str) -> String {
    REASONING_BLOCK_PATTERN
        .replace_all(response, "")
        .trim()
        .to_string()
}
