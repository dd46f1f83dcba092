//! User-facing message sets
//!
//! Two fixed languages are supported: English (the default) and Chinese.

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::report::Warning;
use crate::selection::{Axis, SelectionIssue};

/// Message language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    /// Prefix printed before fatal errors
    pub fn error_prefix(self) -> &'static str {
        match self {
            Language::En => "Error",
            Language::Zh => "错误",
        }
    }

    /// Prefix printed before warnings
    pub fn warning_prefix(self) -> &'static str {
        match self {
            Language::En => "Warning",
            Language::Zh => "警告",
        }
    }
}

pub(crate) fn warning_text(warning: &Warning, lang: Language) -> String {
    match (warning, lang) {
        (Warning::RowsExceeded { requested, available }, Language::En) => {
            format!("requested {requested} rows but file has {available}")
        }
        (Warning::RowsExceeded { requested, available }, Language::Zh) => {
            format!("请求 {requested} 行，但文件只有 {available} 行")
        }
        (Warning::ColumnsExceeded { requested, available }, Language::En) => {
            format!("requested {requested} columns but file has {available}")
        }
        (Warning::ColumnsExceeded { requested, available }, Language::Zh) => {
            format!("请求 {requested} 列，但文件只有 {available} 列")
        }
        (Warning::RowIndexOutOfRange { index, available }, Language::En) => {
            format!("row index {index} is out of range, file has {available} rows")
        }
        (Warning::RowIndexOutOfRange { index, available }, Language::Zh) => {
            format!("行索引 {index} 超出范围，文件只有 {available} 行")
        }
        (Warning::ColumnIndexOutOfRange { index, available }, Language::En) => {
            format!("column index {index} is out of range, file has {available} columns")
        }
        (Warning::ColumnIndexOutOfRange { index, available }, Language::Zh) => {
            format!("列索引 {index} 超出范围，文件只有 {available} 列")
        }
    }
}

fn axis_zh(axis: Axis) -> &'static str {
    match axis {
        Axis::Row => "行",
        Axis::Column => "列",
    }
}

fn issue_zh(issue: SelectionIssue) -> &'static str {
    match issue {
        SelectionIssue::EmptyItem => "存在空的选择项",
        SelectionIssue::MalformedRange => "范围格式错误，应为 起始-结束",
        SelectionIssue::NotPositive => "索引必须是大于0的整数",
        SelectionIssue::NotNumeric => "行索引必须是数字",
        SelectionIssue::InvalidLabel => "列索引必须是数字或 A-Z 字母",
        SelectionIssue::TooLarge => "索引超出工作表上限",
    }
}

/// Chinese rendering of a fatal error
pub(crate) fn error_text_zh(err: &ViewerError) -> String {
    match err {
        ViewerError::FileNotFound(path) => format!("文件不存在: {}", path.display()),
        ViewerError::IsDirectory(path) => format!("路径是目录而不是文件: {}", path.display()),
        ViewerError::UnsupportedExtension(path) => format!(
            "不支持的文件类型: {} (支持 xlsx、xlsm、xlsb、xls、ods)",
            path.display()
        ),
        ViewerError::Open { source, .. } => format!("读取 Excel 文件失败: {source}"),
        ViewerError::NoSheets(path) => format!("工作簿中没有工作表: {}", path.display()),
        ViewerError::Sheet { sheet, source } => format!("读取工作表 '{sheet}' 失败: {source}"),
        ViewerError::InvalidPattern(source) => format!("正则表达式语法错误: {source}"),
        ViewerError::InvalidSelection {
            axis,
            input,
            issue,
        } => format!(
            "无效的{}选择 '{}': {}",
            axis_zh(*axis),
            input,
            issue_zh(*issue)
        ),
        ViewerError::InvalidIndex { axis, input } => format!(
            "--search-{} 需要指定有效的{}索引(大于0的整数): '{}'",
            axis.flag_suffix(),
            axis_zh(*axis),
            input
        ),
        ViewerError::InvalidConfig(reason) => format!("配置无效: {reason}"),
        ViewerError::ConfigRead { path, source } => {
            format!("读取配置文件 {} 失败: {}", path.display(), source)
        }
        ViewerError::ConfigParse { path, source } => {
            format!("解析配置文件 {} 失败: {}", path.display(), source)
        }
        ViewerError::Render(reason) => format!("输出序列化失败: {reason}"),
        ViewerError::Io(source) => format!("I/O 错误: {source}"),
    }
}
