//! 从 LLM 输出中提取 JSON
//!
//! 模型经常把 JSON 包在 ```json 代码块里，或者在前后加解释文字。

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

fn fenced_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("static regex is valid")
    })
}

/// 从 LLM 输出中提取 JSON 值
///
/// 依次尝试：
/// 1. 整段文本直接解析
/// 2. ``` 代码块中的内容
/// 3. 第一个 `{` 到最后一个 `}` 之间的内容
///
/// 全部失败时返回 `None`
pub fn extract_json_from_llm_output(output: &str) -> Option<JsonValue> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<JsonValue>(trimmed) {
        return Some(value);
    }

    for caps in fenced_block_regex().captures_iter(trimmed) {
        if let Some(body) = caps.get(1) {
            if let Ok(value) = serde_json::from_str::<JsonValue>(body.as_str().trim()) {
                return Some(value);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<JsonValue>(&trimmed[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        let value = extract_json_from_llm_output(r#" {"answer": "42", "cot": "6*7"} "#);
        assert_eq!(value, Some(json!({"answer": "42", "cot": "6*7"})));
    }

    #[test]
    fn test_fenced_json_block() {
        let output = "好的，优化结果如下：\n```json\n{\n  \"answer\": \"新的答案\"\n}\n```\n希望有帮助。";
        let value = extract_json_from_llm_output(output).unwrap();
        assert_eq!(value["answer"], "新的答案");
    }

    #[test]
    fn test_unlabelled_fence() {
        let output = "```\n{\"answer\": \"x\"}\n```";
        assert_eq!(extract_json_from_llm_output(output), Some(json!({"answer": "x"})));
    }

    #[test]
    fn test_braces_inside_prose() {
        let output = "Here you go: {\"answer\": \"a {nested} brace\", \"cot\": \"\"} -- done";
        let value = extract_json_from_llm_output(output).unwrap();
        assert_eq!(value["answer"], "a {nested} brace");
    }

    #[test]
    fn test_garbage_returns_none() {
        assert_eq!(extract_json_from_llm_output(""), None);
        assert_eq!(extract_json_from_llm_output("sorry, I cannot help"), None);
        assert_eq!(extract_json_from_llm_output("} backwards {"), None);
        assert_eq!(extract_json_from_llm_output("{not json}"), None);
    }
}
