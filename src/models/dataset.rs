use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条问答数据集记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    pub question: String,
    #[serde(default)]
    pub answer: String,
    /// 思维链
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_name: Option<String>,
    /// 生成该记录的模型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<DateTime<Utc>>,
}

impl Dataset {
    /// 是否带有非空的思维链
    pub fn has_cot(&self) -> bool {
        self.cot.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// 按字段取值，用于搜索过滤
    pub fn field_value(&self, field: SearchField) -> &str {
        match field {
            SearchField::Question => &self.question,
            SearchField::Answer => &self.answer,
            SearchField::Cot => self.cot.as_deref().unwrap_or_default(),
            SearchField::QuestionLabel => self.question_label.as_deref().unwrap_or_default(),
        }
    }
}

/// 确认状态过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmedFilter {
    #[default]
    All,
    Confirmed,
    Unconfirmed,
}

impl ConfirmedFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfirmedFilter::All => "all",
            ConfirmedFilter::Confirmed => "confirmed",
            ConfirmedFilter::Unconfirmed => "unconfirmed",
        }
    }
}

/// 思维链过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CotFilter {
    #[default]
    All,
    Yes,
    No,
}

impl CotFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            CotFilter::All => "all",
            CotFilter::Yes => "yes",
            CotFilter::No => "no",
        }
    }
}

/// 关键字搜索的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    #[default]
    Question,
    Answer,
    Cot,
    QuestionLabel,
}

impl SearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Question => "question",
            SearchField::Answer => "answer",
            SearchField::Cot => "cot",
            SearchField::QuestionLabel => "questionLabel",
        }
    }
}

/// 数据集列表查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default)]
    pub status: ConfirmedFilter,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub field: SearchField,
    #[serde(default)]
    pub has_cot: CotFilter,
    /// `1` 表示返回全部符合条件的 ID，不分页
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_all: Option<u8>,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    10
}

impl Default for DatasetListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
            status: ConfirmedFilter::default(),
            input: String::new(),
            field: SearchField::default(),
            has_cot: CotFilter::default(),
            selected_all: None,
        }
    }
}

impl DatasetListQuery {
    pub fn wants_all_ids(&self) -> bool {
        self.selected_all == Some(1)
    }

    /// 判断单条记录是否满足过滤条件（不含分页）
    pub fn matches(&self, dataset: &Dataset) -> bool {
        let status_ok = match self.status {
            ConfirmedFilter::All => true,
            ConfirmedFilter::Confirmed => dataset.confirmed,
            ConfirmedFilter::Unconfirmed => !dataset.confirmed,
        };
        let cot_ok = match self.has_cot {
            CotFilter::All => true,
            CotFilter::Yes => dataset.has_cot(),
            CotFilter::No => !dataset.has_cot(),
        };
        let input = self.input.trim();
        let input_ok = input.is_empty()
            || dataset
                .field_value(self.field)
                .to_lowercase()
                .contains(&input.to_lowercase());

        status_ok && cot_ok && input_ok
    }

    /// 作为 URL 查询参数
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("status", self.status.as_str().to_string()),
            ("input", self.input.clone()),
            ("field", self.field.as_str().to_string()),
            ("hasCot", self.has_cot.as_str().to_string()),
        ];
        if let Some(flag) = self.selected_all {
            pairs.push(("selectedAll", flag.to_string()));
        }
        pairs
    }
}

/// `selectedAll=1` 时列表中的一项，只带 ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetId {
    pub id: String,
}

/// 分页后的数据集列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPage {
    pub data: Vec<Dataset>,
    pub total: usize,
    pub confirmed_count: usize,
}
