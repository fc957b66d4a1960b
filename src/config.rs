use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// 默认配置文件 (可通过 PMD_CONFIG 覆盖)
pub const DEFAULT_CONFIG_FILE: &str = "config/pmd-lookup";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub recon: ReconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// 逻辑字段对应的表头名称
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub valid_from: String,
    pub supplier_name: String,
    pub status: String,
    pub assignee: String,
    pub country: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            valid_from: "Valid From".to_string(),
            supplier_name: "Supplier Name".to_string(),
            status: "Status".to_string(),
            assignee: "Assigned".to_string(),
            country: "Country".to_string(),
        }
    }
}

/// 参考表出现重复匹配键时的取舍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    FirstWins,
    LastWins,
}

/// 引擎配置：进程启动时加载一次，之后只读
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    pub columns: ColumnNames,
    pub drop_columns: Vec<String>,
    pub excluded_countries: Vec<String>,
    pub output_columns: Vec<String>,
    pub key_separator: String,
    pub approved_status: String,
    pub display_format: String,
    pub duplicate_policy: DuplicatePolicy,
    pub sheet_name: String,
    pub download_name: String,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            drop_columns: vec!["Sl. No.".to_string(), "Remarks".to_string()],
            excluded_countries: vec!["CN".to_string()],
            output_columns: [
                "Valid From",
                "Bukr.",
                "Type",
                "EBSNO",
                "Supplier Name",
                "Street",
                "City",
                "Country",
                "Zip Code",
                "Requested By",
                "Pur. approver",
                "Pur. release date",
                "Status",
                "Assigned",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            key_separator: "__".to_string(),
            approved_status: "approved".to_string(),
            display_format: "%Y-%m-%d %I:%M %p".to_string(),
            duplicate_policy: DuplicatePolicy::FirstWins,
            sheet_name: "Result".to_string(),
            download_name: "PMD_Lookup_Result.xlsx".to_string(),
        }
    }
}

const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

impl ReconConfig {
    /// 校验配置；不合法的配置视为 UnexpectedFailure
    pub fn validate(&self) -> Result<(), ReconError> {
        let invalid = |msg: String| Err(ReconError::Unexpected(format!("invalid configuration: {}", msg)));

        let cols = &self.columns;
        for (field, name) in [
            ("valid_from", &cols.valid_from),
            ("supplier_name", &cols.supplier_name),
            ("status", &cols.status),
            ("assignee", &cols.assignee),
            ("country", &cols.country),
        ] {
            if name.trim().is_empty() {
                return invalid(format!("column name for '{}' is blank", field));
            }
        }
        if self.key_separator.is_empty() {
            return invalid("key_separator must not be empty".to_string());
        }
        if self.output_columns.is_empty() {
            return invalid("output_columns must not be empty".to_string());
        }
        if self.approved_status.trim().is_empty() {
            return invalid("approved_status must not be blank".to_string());
        }
        if let Some(col) = self
            .drop_columns
            .iter()
            .find(|c| **c == cols.valid_from || **c == cols.supplier_name)
        {
            return invalid(format!("drop_columns must not contain key column '{}'", col));
        }
        if self.display_format.trim().is_empty()
            || StrftimeItems::new(&self.display_format).any(|item| matches!(item, Item::Error))
        {
            return invalid(format!("display_format '{}' is not a valid format", self.display_format));
        }
        // Excel 工作表名：1..=31 个字符，不含 []:*?/\，首尾不能是单引号
        if self.sheet_name.is_empty()
            || self.sheet_name.chars().count() > 31
            || self.sheet_name.contains(SHEET_NAME_FORBIDDEN)
            || self.sheet_name.starts_with('\'')
            || self.sheet_name.ends_with('\'')
        {
            return invalid(format!("sheet_name '{}' is not a valid Excel sheet name", self.sheet_name));
        }
        Ok(())
    }
}

impl AppConfig {
    /// 加载配置：内置默认值 < 配置文件 < 环境变量 (PMD__SERVER__PORT 等)
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let file = std::env::var("PMD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(&file).required(false))
            .add_source(
                ::config::Environment::with_prefix("PMD")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("recon.drop_columns")
                    .with_list_parse_key("recon.excluded_countries")
                    .with_list_parse_key("recon.output_columns"),
            )
            .build()?;
        settings.try_deserialize()
    }
}
