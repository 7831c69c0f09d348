// ==========================================
// DendaApi 端到端测试
// ==========================================
// 测试目标: 数据目录扫描 → xlsx 加载(缓存) → 下拉选项 → 计算 → 导出
// xlsx 由 umya-spreadsheet 写出、calamine 读回，需要 xlsx-export 特性
// ==========================================

#![cfg(feature = "xlsx-export")]


use denda_sim::api::{CalculationRequest, DendaApi, NoticeLevel};
use denda_sim::importer::{CacheStatus, ExcelParser, WorkbookParser};
use denda_sim::JenisPelanggaran;
use std::path::PathBuf;
use tempfile::TempDir;
use test_helpers::{sample_workbook, temp_config, write_xlsx};

const FILE: &str = "tabel_denda.xlsx";

fn setup() -> (TempDir, DendaApi) {
    let (dir, config) = temp_config().expect("创建临时目录失败");
    write_xlsx(&sample_workbook(), &dir.path().join(FILE)).expect("写入 xlsx 失败");
    (dir, DendaApi::new(config))
}

fn request(jenis_izin: &str, dinas: &str, band: &str) -> CalculationRequest {
    let mut request = CalculationRequest {
        file: FILE.to_string(),
        ..Default::default()
    };
    request.query.selection.jenis_izin = jenis_izin.to_string();
    request.query.selection.dinas = dinas.to_string();
    request.query.selection.band = band.to_string();
    request
}

#[test]
fn test_list_files_filters_extensions() {
    let (dir, api) = setup();
    std::fs::write(dir.path().join("catatan.txt"), b"bukan excel").unwrap();

    let listing = api.list_files();
    assert_eq!(listing.files, vec![FILE.to_string()]);
    assert!(listing.notices.is_empty());
}

#[test]
fn test_missing_data_dir_is_created() {
    let (dir, mut config) = temp_config().unwrap();
    config.data_dir = dir.path().join("Data");
    let api = DendaApi::new(config);

    let listing = api.list_files();
    assert!(listing.files.is_empty());
    assert_eq!(listing.notices[0].code, "DATA_DIR_CREATED");
    assert!(dir.path().join("Data").is_dir());
}

#[test]
fn test_load_real_workbook_and_cache() {
    let (_dir, mut api) = setup();

    let first = api.load(FILE);
    assert!(first.table_available, "notices: {:?}", first.notices);
    assert_eq!(first.records, 4);
    assert_eq!(first.table_sheet.as_deref(), Some("FREK & ALAT"));
    assert_eq!(first.cache_status, Some(CacheStatus::Miss));
    assert!(first.sheet_names.contains(&"Referensi".to_string()));
    assert_eq!(first.percentages.get("13-24"), Some(0.6));
    // 空表头列 → info 级别提示
    assert!(first
        .notices
        .iter()
        .any(|n| n.code == "DROPPED_COLUMNS" && n.level == NoticeLevel::Info));

    let second = api.load(FILE);
    assert_eq!(second.cache_status, Some(CacheStatus::Hit));
    assert_eq!(second.loaded_at, first.loaded_at);

    let reloaded = api.reload(FILE);
    assert_eq!(reloaded.cache_status, Some(CacheStatus::Miss));
}

#[test]
fn test_filter_options_cascade() {
    let (_dir, mut api) = setup();

    let mut selection = denda_sim::FilterSelection::default();
    let outcome = api.filter_options(FILE, &selection);
    assert!(outcome.notices.is_empty());
    assert_eq!(outcome.options.dinas[0], "Semua");
    assert!(outcome.options.jenis_izin.contains(&"APT".to_string()));
    assert_eq!(outcome.options.zona, vec!["Semua", "1", "2"]);

    selection.dinas = "Maritim".to_string();
    let outcome = api.filter_options(FILE, &selection);
    assert_eq!(outcome.options.kategori, vec!["Semua", "Kapal"]);
    assert_eq!(outcome.options.band, vec!["Semua", "UHF", "VHF"]);
}

#[test]
fn test_calculate_from_xlsx() {
    let (_dir, mut api) = setup();

    let mut req = request("IPFR", "Maritim", "UHF");
    req.query.jumlah_frekuensi = 2;
    req.query.jumlah_perangkat = 3;
    let outcome = api.calculate(&req);

    assert!(outcome.has_result(), "notices: {:?}", outcome.notices);
    assert_eq!(outcome.result.unwrap().total_tagihan_denda, 3600000.0);
    assert_eq!(outcome.total_label.as_deref(), Some("Rp 3,600,000.00"));
    assert_eq!(outcome.maks_poin_default, 600000.0);
    assert_eq!(outcome.jenis_izin.as_deref(), Some("IPFR"));
    assert!(outcome.visualization.is_some());
}

#[test]
fn test_calculate_repeat_offense_with_placeholder() {
    let (_dir, mut api) = setup();

    let mut req = request("APT", "Maritim", "Semua");
    req.query.jenis_pelanggaran = JenisPelanggaran::RepeatOffense;
    let outcome = api.calculate(&req);

    assert!(outcome.used_placeholder);
    let result = outcome.result.unwrap();
    assert_eq!(result.indeks, 1.5);
    assert_eq!(result.maks_poin, 5000.0);
    assert_eq!(outcome.notices[0].code, "PLACEHOLDER_ROW");
    assert_eq!(outcome.notices[0].level, NoticeLevel::Warning);
}

#[test]
fn test_export_csv_and_xlsx() {
    let (dir, mut api) = setup();
    let outcome = api.calculate(&request("IPFR", "Maritim", "UHF"));
    let out_dir = dir.path().join("hasil");
    std::fs::create_dir_all(&out_dir).unwrap();

    let csv = api.export_csv(&outcome, &out_dir);
    let csv_path = PathBuf::from(csv.path.expect("CSV 路径"));
    assert_eq!(
        csv_path.file_name().unwrap().to_str(),
        Some("hasil_perhitungan_denda_IPFR.csv")
    );

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("JENIS IZIN"));
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    let total_idx = headers
        .iter()
        .position(|h| h == "TOTAL TAGIHAN DENDA")
        .unwrap();
    assert_eq!(records[0].get(total_idx), Some("600000"));

    let xlsx = api.export_xlsx(&outcome, &out_dir.join("hasil.xlsx"));
    assert!(xlsx.bytes > 0);
    let workbook = ExcelParser.parse_workbook(&out_dir.join("hasil.xlsx")).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Hasil Perhitungan".to_string()]);
}

#[test]
fn test_unknown_file_reports_notice() {
    let (_dir, mut api) = setup();
    let mut req = request("ISR", "Semua", "Semua");
    req.file = "tidak_ada.xlsx".to_string();
    let outcome = api.calculate(&req);
    assert!(!outcome.has_result());
    assert_eq!(outcome.notices[0].code, "FILE_READ_ERROR");
    assert!(outcome.notices[0].is_error());
}
