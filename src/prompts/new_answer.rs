//! 根据修改建议重新生成答案的提示词

use phf::phf_map;

/// 提示词语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Zh,
    En,
}

static LANGUAGE_TAGS: phf::Map<&'static str, Language> = phf_map! {
    "en" => Language::En,
    "en-us" => Language::En,
    "en-gb" => Language::En,
    "zh" => Language::Zh,
    "zh-cn" => Language::Zh,
};

impl Language {
    /// 从语言标签解析，未知标签按中文处理
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.map(|t| t.trim().to_ascii_lowercase())
            .and_then(|t| LANGUAGE_TAGS.get(t.as_str()).copied())
            .unwrap_or(Language::Zh)
    }
}

/// 构建优化答案的提示词
///
/// 模型需要返回 `{"answer": "...", "cot": "..."}` 格式的 JSON
pub fn build_new_answer_prompt(
    language: Language,
    question: &str,
    answer: &str,
    cot: &str,
    advice: &str,
) -> String {
    match language {
        Language::Zh => format!(
            r#"# Role: 微调数据集答案优化专家
## Profile:
- Description: 你是一名微调数据集答案优化专家，擅长根据用户的改进建议，对问题的回答结果和思考过程（思维链）进行优化。

## Skills:
1. 基于给定的优化建议 + 问题，对输入的答案进行优化，可以进行适当的丰富和补充
2. 能够根据优化建议，对答案的格式进行调整，如换行、列表等
3. 对思维链同步优化，去掉"参考""根据文献"等字样，使其看起来是真实的推理过程

## 原始问题
{question}

## 待优化的答案
{answer}

## 答案优化建议
{advice}，同时对答案进行适当的丰富和补充，确保答案准确、充分、清晰

## 待优化的思考过程
{cot}

## 思考过程优化建议
- 通用优化建议：{advice}
- 去除思考过程中的参考、依据、文献等相关表述，使其看起来是正常的推理过程

## Constrains:
1. 结果必须按照 JSON 格式输出：
   ```json
     {{
       "answer": "优化后的答案",
       "cot": "优化后的思考过程"
     }}
   ```
2. 不要输出 JSON 之外的任何内容
"#
        ),
        Language::En => format!(
            r#"# Role: Fine-tuning Dataset Answer Optimization Expert
## Profile:
- Description: You are an expert in optimizing answers for fine-tuning datasets. You improve the answer and the chain of thought of a question according to the user's suggestions.

## Skills:
1. Optimize the given answer according to the suggestions and the question, enriching and supplementing it where appropriate
2. Adjust the answer's format (line breaks, lists, etc.) as the suggestions require
3. Optimize the chain of thought accordingly, removing phrases such as "reference" or "according to the literature" so it reads as genuine reasoning

## Original Question
{question}

## Answer to be Optimized
{answer}

## Answer Optimization Suggestions
{advice}. Also enrich and supplement the answer where appropriate so that it is accurate, complete and clear.

## Chain of Thought to be Optimized
{cot}

## Chain of Thought Optimization Suggestions
- General suggestions: {advice}
- Remove references, sources and literature mentions from the chain of thought so it reads as normal reasoning

## Constraints:
1. The result must be output in JSON format:
   ```json
     {{
       "answer": "optimized answer",
       "cot": "optimized chain of thought"
     }}
   ```
2. Do not output anything other than the JSON
"#
        ),
    }
}
