// ==========================================
// denda-sim - 工作簿加载器
// ==========================================
// 流程: 解析工作簿 → 规范化主表 → 提取参考百分比
// 输出: LoadedWorkbook（会话内缓存的数据集）
// ==========================================
// 主表不可用（缺表/缺表头）不是致命错误: 记录问题，数据表置空
// ==========================================

use crate::domain::percentage::PercentageTable;
use crate::domain::sheet::RawWorkbook;
use crate::domain::violation::ViolationTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_discovery::file_name;
use crate::importer::file_parser::{ExcelParser, WorkbookParser};
use crate::importer::reference_extractor::ReferenceExtractor;
use crate::importer::table_normalizer::{NormalizeWarning, TableNormalizer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// 加载过程中的非致命问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadIssue {
    /// 未找到配置的主表；used 为实际采用的工作表
    MainSheetMissing {
        expected: String,
        used: Option<String>,
    },
    /// 主表中未找到表头行
    HeaderNotFound { sheet: String },
    /// 规范化警告
    Normalize { warning: NormalizeWarning },
}

/// 已加载的工作簿数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedWorkbook {
    pub file_name: String,
    pub sheet_names: Vec<String>,
    /// 数据表所在工作表
    pub table_sheet: Option<String>,
    /// 规范化后的数据表（不可用时为 None）
    pub table: Option<ViolationTable>,
    pub percentages: PercentageTable,
    pub issues: Vec<LoadIssue>,
}

// ==========================================
// WorkbookLoader
// ==========================================
pub struct WorkbookLoader {
    parser: Box<dyn WorkbookParser>,
    normalizer: TableNormalizer,
    extractor: ReferenceExtractor,
    main_sheet: String,
    reference_sheet: String,
}

impl WorkbookLoader {
    /// 使用 Excel 解析器创建加载器
    pub fn new(main_sheet: &str, reference_sheet: &str) -> Self {
        Self::with_parser(Box::new(ExcelParser), main_sheet, reference_sheet)
    }

    pub fn with_parser(
        parser: Box<dyn WorkbookParser>,
        main_sheet: &str,
        reference_sheet: &str,
    ) -> Self {
        Self {
            parser,
            normalizer: TableNormalizer::new(),
            extractor: ReferenceExtractor::new(),
            main_sheet: main_sheet.to_string(),
            reference_sheet: reference_sheet.to_string(),
        }
    }

    /// 从文件加载
    #[instrument(skip(self), fields(file = %path.display()))]
    pub fn load(&self, path: &Path) -> ImportResult<LoadedWorkbook> {
        let workbook = self.parser.parse_workbook(path)?;
        Ok(self.load_workbook(&file_name(path), &workbook))
    }

    /// 从已解析的工作簿加载
    pub fn load_workbook(&self, file_name: &str, workbook: &RawWorkbook) -> LoadedWorkbook {
        let mut issues = Vec::new();

        let (table_sheet, table) = match workbook.sheet(&self.main_sheet) {
            Some(sheet) => match self.normalizer.normalize(sheet) {
                Ok(outcome) => {
                    issues.extend(
                        outcome
                            .warnings
                            .into_iter()
                            .map(|warning| LoadIssue::Normalize { warning }),
                    );
                    (Some(sheet.name.clone()), Some(outcome.table))
                }
                Err(ImportError::HeaderNotFound { sheet, .. }) => {
                    warn!(sheet = %sheet, "主表未找到表头行");
                    issues.push(LoadIssue::HeaderNotFound { sheet });
                    (None, None)
                }
                Err(e) => {
                    warn!(error = %e, "主表规范化失败");
                    issues.push(LoadIssue::HeaderNotFound {
                        sheet: sheet.name.clone(),
                    });
                    (None, None)
                }
            },
            None => {
                // 主表缺失: 依次尝试其他工作表（参考表除外）
                let fallback = workbook
                    .sheets
                    .iter()
                    .filter(|s| s.name != self.reference_sheet)
                    .find_map(|s| {
                        self.normalizer
                            .normalize(s)
                            .ok()
                            .map(|outcome| (s.name.clone(), outcome))
                    });
                warn!(
                    expected = %self.main_sheet,
                    used = ?fallback.as_ref().map(|(name, _)| name),
                    "主表不存在"
                );
                issues.push(LoadIssue::MainSheetMissing {
                    expected: self.main_sheet.clone(),
                    used: fallback.as_ref().map(|(name, _)| name.clone()),
                });
                match fallback {
                    Some((name, outcome)) => {
                        issues.extend(
                            outcome
                                .warnings
                                .into_iter()
                                .map(|warning| LoadIssue::Normalize { warning }),
                        );
                        (Some(name), Some(outcome.table))
                    }
                    None => (None, None),
                }
            }
        };

        let percentages = self.extractor.extract(workbook, &self.reference_sheet);

        info!(
            file = file_name,
            sheets = workbook.sheets.len(),
            records = table.as_ref().map(|t| t.len()).unwrap_or(0),
            issues = issues.len(),
            "工作簿加载完成"
        );

        LoadedWorkbook {
            file_name: file_name.to_string(),
            sheet_names: workbook.sheet_names(),
            table_sheet,
            table,
            percentages,
            issues,
        }
    }
}
