// ==========================================
// denda-sim - 罚金计算 API
// ==========================================
// 职责: 会话级门面，串联 配置 → 文件扫描 → 加载(缓存) → 过滤/计算 → 导出
// 约定: 所有公开操作都不返回错误，失败转换为 Notice 附加在结果中
// ==========================================

use crate::api::dto::{
    CalculationOutcome, CalculationRequest, ExportOutcome, FileListing, LoadOutcome,
    OptionsOutcome,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::notice::Notice;
use crate::config::AppConfig;
use crate::domain::calculation::ResultTable;
use crate::domain::types::PermitTypeTable;
use crate::domain::violation::ViolationTable;
use crate::engine::filter_options::{build_filter_options, FilterSelection};
use crate::engine::orchestrator::DendaOrchestrator;
use crate::engine::result_builder::format_rupiah;
use crate::export::{export_file_name, CsvExporter, XlsxExporter};
use crate::i18n;
use crate::importer::file_discovery::file_name;
use crate::importer::{
    discover_workbooks, CacheStatus, ImportError, LoadedWorkbook, WorkbookCache, WorkbookLoader,
};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

// ==========================================
// DendaApi - 罚金计算 API
// ==========================================
pub struct DendaApi {
    config: AppConfig,
    loader: WorkbookLoader,
    orchestrator: DendaOrchestrator,
    cache: WorkbookCache<LoadedWorkbook>,
}

impl DendaApi {
    /// 创建 API 并应用配置中的界面语言
    pub fn new(config: AppConfig) -> Self {
        i18n::set_locale(&config.locale);
        Self::with_loader(
            WorkbookLoader::new(&config.main_sheet, &config.reference_sheet),
            config,
        )
    }

    /// 使用自定义加载器（测试或其他数据源），不修改全局语言设置
    pub fn with_loader(loader: WorkbookLoader, config: AppConfig) -> Self {
        Self {
            orchestrator: DendaOrchestrator::new(config.placeholder_row),
            loader,
            cache: WorkbookCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }

    // ==========================================
    // 文件列表
    // ==========================================

    #[instrument(skip(self), fields(data_dir = %self.config.data_dir.display()))]
    pub fn list_files(&self) -> FileListing {
        let data_dir = self.config.data_dir.display().to_string();
        let mut notices = Vec::new();

        let files = match discover_workbooks(&self.config.data_dir) {
            Ok(listing) => {
                if listing.created {
                    notices.push(Notice::info(
                        "DATA_DIR_CREATED",
                        "data_dir.created",
                        &[("path", data_dir.as_str())],
                    ));
                } else if listing.files.is_empty() {
                    notices.push(Notice::warning(
                        "DATA_DIR_EMPTY",
                        "data_dir.empty",
                        &[("path", data_dir.as_str())],
                    ));
                }
                listing.files.iter().map(|p| file_name(p)).collect()
            }
            Err(e) => {
                notices.push(Notice::from_api_error(&ApiError::from(e)));
                Vec::new()
            }
        };

        FileListing {
            data_dir,
            files,
            notices,
        }
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 加载文件（缓存命中时不重新解析）
    #[instrument(skip(self))]
    pub fn load(&mut self, file: &str) -> LoadOutcome {
        let mut outcome = LoadOutcome {
            file: file.to_string(),
            ..Default::default()
        };

        let path = match self.resolve_path(file) {
            Ok(path) => path,
            Err(e) => {
                outcome.notices.push(Notice::from_api_error(&e));
                return outcome;
            }
        };

        match load_cached(&mut self.cache, &self.loader, &path) {
            Ok((workbook, status)) => {
                outcome.sheet_names = workbook.sheet_names.clone();
                outcome.table_sheet = workbook.table_sheet.clone();
                outcome.table_available = workbook.table.is_some();
                if let Some(table) = &workbook.table {
                    outcome.columns = table.columns.clone();
                    outcome.records = table.len();
                }
                outcome.percentages = workbook.percentages.clone();
                outcome.cache_status = Some(status);
                outcome.notices = workbook.issues.iter().map(Notice::from_load_issue).collect();
                if status != CacheStatus::Hit {
                    let sheets = workbook.sheet_names.join(", ");
                    outcome.notices.push(Notice::info(
                        "FILE_LOADED",
                        "load.loaded",
                        &[("sheets", sheets.as_str())],
                    ));
                }
                if workbook.table.is_none() {
                    outcome.notices.push(Notice::from_api_error(&ApiError::TableUnavailable {
                        file: workbook.file_name.clone(),
                    }));
                }
            }
            Err(e) => outcome.notices.push(Notice::from_api_error(&e)),
        }
        outcome.loaded_at = self.cache.loaded_at(&path);
        outcome
    }

    /// 强制重新加载
    pub fn reload(&mut self, file: &str) -> LoadOutcome {
        if let Ok(path) = self.resolve_path(file) {
            self.cache.invalidate(&path);
        }
        self.load(file)
    }

    // ==========================================
    // 下拉选项
    // ==========================================

    #[instrument(skip(self, selection))]
    pub fn filter_options(&mut self, file: &str, selection: &FilterSelection) -> OptionsOutcome {
        let mut notices = Vec::new();
        let empty = ViolationTable::default();

        let loaded = match self.resolve_path(file) {
            Ok(path) => load_cached(&mut self.cache, &self.loader, &path),
            Err(e) => Err(e),
        };
        let options = match loaded {
            Ok((workbook, _)) => {
                if workbook.table.is_none() {
                    notices.push(Notice::from_api_error(&ApiError::TableUnavailable {
                        file: workbook.file_name.clone(),
                    }));
                }
                let table = workbook.table.as_ref().unwrap_or(&empty);
                build_filter_options(table, &workbook.percentages, selection)
            }
            Err(e) => {
                notices.push(Notice::from_api_error(&e));
                build_filter_options(&empty, &Default::default(), selection)
            }
        };

        OptionsOutcome {
            file: file.to_string(),
            options,
            notices,
        }
    }

    // ==========================================
    // 计算
    // ==========================================

    #[instrument(skip(self, request), fields(file = %request.file))]
    pub fn calculate(&mut self, request: &CalculationRequest) -> CalculationOutcome {
        let mut outcome = CalculationOutcome {
            file: request.file.clone(),
            query: request.query.clone(),
            ..Default::default()
        };

        let loaded = match self.resolve_path(&request.file) {
            Ok(path) => load_cached(&mut self.cache, &self.loader, &path),
            Err(e) => Err(e),
        };
        let workbook = match loaded {
            Ok((workbook, _)) => workbook,
            Err(e) => {
                outcome.notices.push(Notice::from_api_error(&e));
                return outcome;
            }
        };
        let table = match &workbook.table {
            Some(table) => table,
            None => {
                outcome.notices.push(Notice::from_api_error(&ApiError::TableUnavailable {
                    file: workbook.file_name.clone(),
                }));
                return outcome;
            }
        };

        let run = self
            .orchestrator
            .run(table, &workbook.percentages, &request.query);

        outcome.matched_rows = run.matched_rows;
        outcome.used_placeholder = run.used_placeholder;
        outcome.persentase = run.persentase;
        outcome.filter_summary = run.filter_summary.clone();

        if run.used_placeholder {
            let code = request.query.selection.jenis_izin.trim().to_uppercase();
            let maks = PermitTypeTable::maks_poin(&code).to_string();
            outcome.notices.push(Notice::warning(
                "PLACEHOLDER_ROW",
                "calc.placeholder",
                &[("jenis_izin", code.as_str()), ("maks_poin", maks.as_str())],
            ));
        }

        let result = match run.result {
            Some(result) => result,
            None => {
                outcome
                    .notices
                    .push(Notice::warning("NO_MATCHING_DATA", "calc.no_data", &[]));
                return outcome;
            }
        };

        if let Some(e) = &run.calculation_error {
            outcome.notices.push(Notice::error(
                "CALCULATION_ERROR",
                "calc.error",
                &[("message", e.to_string().as_str())],
            ));
        }

        let jenis_izin = run
            .selected_record
            .as_ref()
            .and_then(|r| r.jenis_izin.clone());
        outcome.maks_poin_default =
            PermitTypeTable::maks_poin(jenis_izin.as_deref().unwrap_or_default());
        outcome.jenis_izin = jenis_izin;
        outcome.result = Some(result);
        outcome.total_label = Some(format_rupiah(result.total_tagihan_denda));
        outcome.table = run.table;
        outcome.formula = run.formula;
        outcome.visualization = run.visualization;

        info!(
            total_tagihan_denda = result.total_tagihan_denda,
            notices = outcome.notices.len(),
            "计算完成"
        );
        outcome
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出 CSV；target 为目录时使用默认文件名
    pub fn export_csv(&self, outcome: &CalculationOutcome, target: &Path) -> ExportOutcome {
        self.export_with("CSV", "csv", outcome, target, |table, path| {
            CsvExporter.export_to_path(table, path)
        })
    }

    /// 导出 XLSX；未启用 xlsx-export 特性时返回 EXPORT_UNAVAILABLE 提示
    pub fn export_xlsx(&self, outcome: &CalculationOutcome, target: &Path) -> ExportOutcome {
        self.export_with("XLSX", "xlsx", outcome, target, |table, path| {
            XlsxExporter.export_to_path(table, path)
        })
    }

    fn export_with<F>(
        &self,
        format: &str,
        extension: &str,
        outcome: &CalculationOutcome,
        target: &Path,
        write: F,
    ) -> ExportOutcome
    where
        F: FnOnce(&ResultTable, &Path) -> crate::export::ExportResult<usize>,
    {
        let mut export = ExportOutcome {
            format: format.to_string(),
            ..Default::default()
        };

        let path = if target.is_dir() {
            let jenis_izin = outcome.jenis_izin.as_deref().unwrap_or_default();
            target.join(export_file_name(jenis_izin, extension))
        } else {
            target.to_path_buf()
        };

        match write(&outcome.table, &path) {
            Ok(bytes) => {
                let shown = path.display().to_string();
                export.notices.push(Notice::info(
                    "EXPORT_DONE",
                    "export.done",
                    &[("path", shown.as_str())],
                ));
                export.path = Some(shown);
                export.bytes = bytes;
            }
            Err(e) => export.notices.push(Notice::from_api_error(&ApiError::from(e))),
        }
        export
    }

    // ==========================================
    // 内部工具
    // ==========================================

    /// 文件名 → 路径（绝对路径直接使用，其余一律相对数据目录）
    fn resolve_path(&self, file: &str) -> ApiResult<PathBuf> {
        let file = file.trim();
        if file.is_empty() {
            return Err(ApiError::InvalidInput("未指定文件".to_string()));
        }

        let direct = PathBuf::from(file);
        let path = if direct.is_absolute() {
            direct
        } else {
            self.config.data_dir.join(direct)
        };

        if !path.exists() {
            return Err(ApiError::Import(ImportError::FileNotFound(
                path.display().to_string(),
            )));
        }
        Ok(path)
    }
}

/// 通过缓存加载工作簿
fn load_cached<'a>(
    cache: &'a mut WorkbookCache<LoadedWorkbook>,
    loader: &WorkbookLoader,
    path: &Path,
) -> ApiResult<(&'a LoadedWorkbook, CacheStatus)> {
    Ok(cache.get_or_load(path, |p| loader.load(p))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sheet::{CellValue, RawSheet, RawWorkbook};
    use crate::importer::{ImportResult, WorkbookParser};
    use tempfile::TempDir;

    /// 返回固定工作簿的解析器
    struct FixedParser(RawWorkbook);

    impl WorkbookParser for FixedParser {
        fn parse_workbook(&self, _path: &Path) -> ImportResult<RawWorkbook> {
            Ok(self.0.clone())
        }
    }

    fn t(s: &str) -> CellValue {
        CellValue::text(s)
    }

    fn workbook() -> RawWorkbook {
        RawWorkbook::new(vec![RawSheet::new(
            "FREK & ALAT",
            vec![
                vec![t("DINAS"), t("KATEGORI"), t("BAND"), t("JENIS IZIN"), t("TARIF DENDA")],
                vec![t("Maritim"), t("Kapal"), t("VHF"), t("isr"), CellValue::Number(10.0)],
            ],
        )])
    }

    fn api(dir: &TempDir) -> DendaApi {
        std::fs::write(dir.path().join("denda.xlsx"), b"stub").unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let loader = WorkbookLoader::with_parser(
            Box::new(FixedParser(workbook())),
            &config.main_sheet,
            &config.reference_sheet,
        );
        DendaApi::with_loader(loader, config)
    }

    #[test]
    fn test_load_uses_cache() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let first = api.load("denda.xlsx");
        assert_eq!(first.cache_status, Some(CacheStatus::Miss));
        assert!(first.table_available);
        assert_eq!(first.records, 1);

        let second = api.load("denda.xlsx");
        assert_eq!(second.cache_status, Some(CacheStatus::Hit));

        let reloaded = api.reload("denda.xlsx");
        assert_eq!(reloaded.cache_status, Some(CacheStatus::Miss));
        assert_eq!(api.cached_files(), 1);
    }

    #[test]
    fn test_missing_file_becomes_notice() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let outcome = api.load("tidak_ada.xlsx");
        assert!(!outcome.table_available);
        assert_eq!(outcome.notices[0].code, "FILE_READ_ERROR");

        let outcome = api.load("  ");
        assert_eq!(outcome.notices[0].code, "INVALID_INPUT");
    }

    #[test]
    fn test_relative_name_resolves_against_data_dir() {
        // 工作目录（包根）中存在同名 Cargo.toml，必须使用数据目录中的文件
        assert!(Path::new("Cargo.toml").exists());
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);

        let outcome = api.load("Cargo.toml");
        assert_eq!(outcome.notices[0].code, "FILE_READ_ERROR");
        assert_eq!(api.cached_files(), 0);

        std::fs::write(dir.path().join("Cargo.toml"), b"stub").unwrap();
        let outcome = api.load("Cargo.toml");
        assert!(outcome.table_available);
        assert!(api.cache.peek(&dir.path().join("Cargo.toml")).is_some());
        assert!(api.cache.peek(Path::new("Cargo.toml")).is_none());

        // 绝对路径直接使用
        let absolute = dir.path().join("denda.xlsx");
        let outcome = api.load(&absolute.display().to_string());
        assert!(outcome.table_available);
    }

    #[test]
    fn test_calculate_with_stored_tariff() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let mut request = CalculationRequest {
            file: "denda.xlsx".to_string(),
            ..Default::default()
        };
        request.query.selection.jenis_izin = "ISR".to_string();
        request.query.jumlah_frekuensi = 2;

        let outcome = api.calculate(&request);
        let result = outcome.result.unwrap();
        // 无指数列 → 默认 1.0；无 % → 1.0；ISR → 7000
        assert_eq!(result.maks_poin, 7000.0);
        assert_eq!(result.total_poin, 7000.0);
        assert_eq!(result.denda, 70000.0);
        assert_eq!(result.total_tagihan_denda, 140000.0);
        assert_eq!(outcome.total_label.as_deref(), Some("Rp 140,000.00"));
        assert_eq!(outcome.jenis_izin.as_deref(), Some("ISR"));
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn test_calculate_placeholder_notice() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let mut request = CalculationRequest {
            file: "denda.xlsx".to_string(),
            ..Default::default()
        };
        request.query.selection.jenis_izin = "APT".to_string();

        let outcome = api.calculate(&request);
        assert!(outcome.used_placeholder);
        assert_eq!(outcome.notices[0].code, "PLACEHOLDER_ROW");
        assert_eq!(outcome.result.unwrap().maks_poin, 5000.0);
    }

    #[test]
    fn test_calculate_no_data() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let mut request = CalculationRequest {
            file: "denda.xlsx".to_string(),
            ..Default::default()
        };
        request.query.selection.dinas = "Darat".to_string();

        let outcome = api.calculate(&request);
        assert!(!outcome.has_result());
        assert_eq!(outcome.notices[0].code, "NO_MATCHING_DATA");
    }

    #[test]
    fn test_export_csv_to_directory() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        let mut request = CalculationRequest {
            file: "denda.xlsx".to_string(),
            ..Default::default()
        };
        request.query.selection.jenis_izin = "ISR".to_string();
        let outcome = api.calculate(&request);

        let out_dir = TempDir::new().unwrap();
        let export = api.export_csv(&outcome, out_dir.path());
        let path = PathBuf::from(export.path.unwrap());
        assert!(path.ends_with("hasil_perhitungan_denda_ISR.csv"));
        assert!(export.bytes > 0);
        assert_eq!(export.notices[0].code, "EXPORT_DONE");
    }

    #[test]
    fn test_export_without_result() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);
        let export = api.export_csv(&CalculationOutcome::default(), &dir.path().join("x.csv"));
        assert!(export.path.is_none());
        assert_eq!(export.notices[0].code, "EXPORT_NO_RESULT");
    }

    #[test]
    fn test_list_files() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);
        std::fs::write(dir.path().join("catatan.txt"), b"x").unwrap();
        let listing = api.list_files();
        assert_eq!(listing.files, vec!["denda.xlsx"]);
        assert!(listing.notices.is_empty());
    }
}
