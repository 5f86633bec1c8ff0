//! 答案优化流程 - 流程层
//!
//! 核心职责：定义"按建议重写一条数据集答案"的完整流程
//!
//! 流程顺序：
//! 1. 校验参数
//! 2. 读取数据集
//! 3. 构建提示词 → LLM
//! 4. 从输出中提取 `{answer, cot}`
//! 5. 合并并写回

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::{LlmError, StoreError};
use crate::models::Dataset;
use crate::prompts::{build_new_answer_prompt, Language};
use crate::services::{DatasetStore, LanguageModel};
use crate::utils::extract_json_from_llm_output;
use crate::utils::logging::truncate_text;

/// 优化请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub dataset_id: Option<String>,
    pub model: Option<String>,
    pub advice: Option<String>,
    pub language: Option<String>,
}

/// 优化流程错误
///
/// 展示文本直接作为接口的 `error` 字段返回
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// 缺少必要参数
    #[error("{0}")]
    Validation(&'static str),
    /// 数据集不存在
    #[error("Dataset does not exist")]
    NotFound,
    /// 模型输出无法解析为 `{answer, cot}`
    #[error("Failed to optimize answer, please try again")]
    InvalidModelOutput,
    /// LLM 调用失败
    #[error("{0}")]
    Upstream(#[from] LlmError),
    /// 持久层失败
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// 模型返回的优化结果
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedAnswer {
    pub answer: String,
    pub cot: Option<String>,
}

impl OptimizedAnswer {
    /// 从 LLM 输出中解析，`answer` 必须是非空字符串，内容原样保留
    pub fn parse(output: &str) -> Option<Self> {
        let value = extract_json_from_llm_output(output)?;
        let answer = value.get("answer")?.as_str()?;
        if answer.is_empty() {
            return None;
        }
        let cot = value
            .get("cot")
            .and_then(|c| c.as_str())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Some(Self {
            answer: answer.to_string(),
            cot,
        })
    }

    /// 合并到原记录：cot 为空时保留原值
    pub fn merge_into(self, dataset: Dataset) -> Dataset {
        Dataset {
            answer: self.answer,
            cot: self.cot.or(dataset.cot.clone()),
            ..dataset
        }
    }
}

/// 答案优化流程
///
/// - 不持有任何连接细节，只依赖存储和 LLM 能力
/// - 每次调用只处理一条数据集
pub struct AnswerOptimizer {
    store: Arc<dyn DatasetStore>,
    llm: Arc<dyn LanguageModel>,
}

impl AnswerOptimizer {
    pub fn new(store: Arc<dyn DatasetStore>, llm: Arc<dyn LanguageModel>) -> Self {
        Self { store, llm }
    }

    pub async fn optimize(
        &self,
        project_id: &str,
        request: OptimizeRequest,
    ) -> Result<Dataset, OptimizeError> {
        if project_id.is_empty() {
            return Err(OptimizeError::Validation("Project ID cannot be empty"));
        }
        let dataset_id = required(request.dataset_id.as_deref())
            .ok_or(OptimizeError::Validation("Dataset ID cannot be empty"))?;
        let model = required(request.model.as_deref())
            .ok_or(OptimizeError::Validation("Model cannot be empty"))?;
        let advice = required(request.advice.as_deref())
            .ok_or(OptimizeError::Validation("Please provide optimization suggestions"))?;

        let dataset = self
            .store
            .get_by_id(project_id, dataset_id)
            .await?
            .ok_or(OptimizeError::NotFound)?;

        info!(
            "[项目 {}] 🤖 优化数据集 {} (模型: {}), 建议: {}",
            project_id,
            dataset_id,
            model,
            truncate_text(advice, 40)
        );

        let language = Language::from_tag(request.language.as_deref());
        let prompt = build_new_answer_prompt(
            language,
            &dataset.question,
            &dataset.answer,
            dataset.cot.as_deref().unwrap_or_default(),
            advice,
        );

        let output = self.llm.complete(model, &prompt).await.map_err(|e| {
            error!("[项目 {}] ❌ LLM 调用失败: {}", project_id, e);
            e
        })?;

        let Some(optimized) = OptimizedAnswer::parse(&output) else {
            warn!(
                "[项目 {}] ⚠️ 无法解析 LLM 输出: {}",
                project_id,
                truncate_text(&output, 80)
            );
            return Err(OptimizeError::InvalidModelOutput);
        };

        let updated = self.store.update(optimized.merge_into(dataset)).await?;
        info!("[项目 {}] ✓ 数据集 {} 已更新", project_id, updated.id);

        Ok(updated)
    }
}

/// 非空字符串才算提供了参数
fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryDatasetStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio_test::assert_ok;

    /// 按脚本返回固定输出，并记录收到的提示词
    struct ScriptedModel {
        output: Result<String, String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedModel {
        fn replying(output: &str) -> Arc<Self> {
            Arc::new(Self {
                output: Ok(output.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                output: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            match &self.output {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(LlmError::api_call_failed(
                    model,
                    std::io::Error::new(std::io::ErrorKind::Other, message.clone()),
                )),
            }
        }
    }

    fn record() -> Dataset {
        Dataset {
            id: "ds-1".to_string(),
            project_id: "p1".to_string(),
            question: "What is ownership?".to_string(),
            answer: "A rule.".to_string(),
            cot: Some("old reasoning".to_string()),
            question_label: None,
            chunk_name: None,
            model: None,
            confirmed: false,
            create_at: None,
        }
    }

    fn request(language: &str) -> OptimizeRequest {
        OptimizeRequest {
            dataset_id: Some("ds-1".to_string()),
            model: Some("qwen-max".to_string()),
            advice: Some("Explain borrowing too".to_string()),
            language: Some(language.to_string()),
        }
    }

    fn build_optimizer(model: Arc<ScriptedModel>) -> (AnswerOptimizer, Arc<MemoryDatasetStore>) {
        let store = Arc::new(MemoryDatasetStore::with_datasets(vec![record()]));
        (AnswerOptimizer::new(store.clone(), model), store)
    }

    #[tokio::test]
    async fn test_optimize_updates_answer_and_cot() {
        let model = ScriptedModel::replying(
            "```json\n{\"answer\": \"Ownership and borrowing.\", \"cot\": \"new reasoning\"}\n```",
        );
        let (optimizer, store) = build_optimizer(model.clone());

        let updated = assert_ok!(optimizer.optimize("p1", request("en")).await);
        assert_eq!(updated.answer, "Ownership and borrowing.");
        assert_eq!(updated.cot.as_deref(), Some("new reasoning"));

        let stored = store.get_by_id("p1", "ds-1").await.unwrap().unwrap();
        assert_eq!(stored, updated);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "qwen-max");
        assert!(prompts[0].1.contains("Original Question\nWhat is ownership?"));
        assert!(prompts[0].1.contains("old reasoning"));
    }

    #[tokio::test]
    async fn test_missing_cot_keeps_previous() {
        let model = ScriptedModel::replying(r#"{"answer": "Better."}"#);
        let (optimizer, _) = build_optimizer(model.clone());

        let updated = optimizer.optimize("p1", request("zh")).await.unwrap();
        assert_eq!(updated.answer, "Better.");
        assert_eq!(updated.cot.as_deref(), Some("old reasoning"));

        // 非 en 使用中文提示词
        assert!(model.prompts.lock().unwrap()[0].1.contains("原始问题"));
    }

    #[tokio::test]
    async fn test_validation_order() {
        let model = ScriptedModel::replying("{}");
        let (optimizer, _) = build_optimizer(model.clone());

        let cases = [
            (OptimizeRequest::default(), "Dataset ID cannot be empty"),
            (
                OptimizeRequest {
                    model: None,
                    ..request("en")
                },
                "Model cannot be empty",
            ),
            (
                OptimizeRequest {
                    advice: Some(String::new()),
                    ..request("en")
                },
                "Please provide optimization suggestions",
            ),
        ];

        for (req, expected) in cases {
            let err = optimizer.optimize("p1", req).await.unwrap_err();
            assert!(matches!(err, OptimizeError::Validation(_)));
            assert_eq!(err.to_string(), expected);
        }

        let err = optimizer.optimize("", request("en")).await.unwrap_err();
        assert_eq!(err.to_string(), "Project ID cannot be empty");

        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_dataset_is_not_found() {
        let model = ScriptedModel::replying("{}");
        let (optimizer, _) = build_optimizer(model.clone());

        let req = OptimizeRequest {
            dataset_id: Some("nope".to_string()),
            ..request("en")
        };
        let err = optimizer.optimize("p1", req).await.unwrap_err();
        assert!(matches!(err, OptimizeError::NotFound));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_output_leaves_record_untouched() {
        for output in ["I think the answer is fine.", r#"{"cot": "only cot"}"#, r#"{"answer": ""}"#] {
            let (optimizer, store) = build_optimizer(ScriptedModel::replying(output));

            let err = optimizer.optimize("p1", request("en")).await.unwrap_err();
            assert!(matches!(err, OptimizeError::InvalidModelOutput));
            assert_eq!(err.to_string(), "Failed to optimize answer, please try again");

            let stored = store.get_by_id("p1", "ds-1").await.unwrap().unwrap();
            assert_eq!(stored, record());
        }
    }

    #[tokio::test]
    async fn test_llm_failure_is_upstream() {
        let (optimizer, _) = build_optimizer(ScriptedModel::failing("connection reset"));

        let err = optimizer.optimize("p1", request("en")).await.unwrap_err();
        assert!(matches!(err, OptimizeError::Upstream(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_parse_rejects_non_string_answer() {
        assert_eq!(OptimizedAnswer::parse(r#"{"answer": 42}"#), None);
        assert_eq!(OptimizedAnswer::parse(r#"{"answer": ""}"#), None);
    }

    #[test]
    fn test_parse_keeps_content_verbatim() {
        assert_eq!(
            OptimizedAnswer::parse(r#"{"answer": " ok \n", "cot": "  "}"#),
            Some(OptimizedAnswer {
                answer: " ok \n".to_string(),
                cot: Some("  ".to_string())
            })
        );
        assert_eq!(
            OptimizedAnswer::parse(r#"{"answer": "ok", "cot": ""}"#),
            Some(OptimizedAnswer {
                answer: "ok".to_string(),
                cot: None
            })
        );
    }

    #[tokio::test]
    async fn test_whitespace_advice_is_accepted() {
        let model = ScriptedModel::replying(r#"{"answer": "Better."}"#);
        let (optimizer, _) = build_optimizer(model.clone());

        let req = OptimizeRequest {
            advice: Some("   ".to_string()),
            ..request("en")
        };
        let updated = assert_ok!(optimizer.optimize("p1", req).await);
        assert_eq!(updated.answer, "Better.");
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }
}
