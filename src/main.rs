// ==========================================
// denda-sim - 命令行入口
// ==========================================
// 输出: stdout 为 JSON 结果，日志输出到 stderr
// 配置顺序: 默认值 → 配置文件 → 环境变量 → 命令行参数
// ==========================================

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use denda_sim::api::{ApiError, CalculationRequest, DendaApi};
use denda_sim::config::AppConfig;
use denda_sim::engine::{DendaQuery, FilterSelection};
use denda_sim::{logging, JenisPelanggaran, ANY_VALUE};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "denda-sim", version, about = "Simulasi perhitungan denda frekuensi radio")]
struct Cli {
    /// 配置文件路径（默认: 用户配置目录/denda-sim/config.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 数据目录（覆盖配置）
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// 界面语言: id / en
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出数据目录中的工作簿
    Files,
    /// 加载工作簿并显示表结构
    Load {
        #[arg(long)]
        file: String,
    },
    /// 计算下拉选项（级联）
    Options {
        #[arg(long)]
        file: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// 计算罚金
    Calculate(CalculateArgs),
}

#[derive(Args, Debug)]
struct SelectionArgs {
    #[arg(long, default_value = ANY_VALUE)]
    jenis_izin: String,
    #[arg(long, default_value = ANY_VALUE)]
    dinas: String,
    #[arg(long, default_value = ANY_VALUE)]
    kategori: String,
    #[arg(long, default_value = ANY_VALUE)]
    band: String,
    #[arg(long, default_value = ANY_VALUE)]
    zona: String,
    /// 期间（JML BULAN）
    #[arg(long, default_value = ANY_VALUE)]
    jml_bulan: String,
}

impl From<SelectionArgs> for FilterSelection {
    fn from(args: SelectionArgs) -> Self {
        FilterSelection {
            jenis_izin: args.jenis_izin,
            dinas: args.dinas,
            kategori: args.kategori,
            band: args.band,
            zona: args.zona,
            jml_bulan: args.jml_bulan,
        }
    }
}

#[derive(Args, Debug)]
struct CalculateArgs {
    #[arg(long)]
    file: String,
    #[command(flatten)]
    selection: SelectionArgs,
    #[arg(long, value_enum, default_value_t = OffenseArg::First)]
    jenis_pelanggaran: OffenseArg,
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    jumlah_frekuensi: i64,
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    jumlah_perangkat: i64,
    /// 导出 CSV（文件或目录）
    #[arg(long)]
    export_csv: Option<PathBuf>,
    /// 导出 XLSX（文件或目录）
    #[arg(long)]
    export_xlsx: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OffenseArg {
    First,
    Repeat,
}

impl From<OffenseArg> for JenisPelanggaran {
    fn from(arg: OffenseArg) -> Self {
        match arg {
            OffenseArg::First => JenisPelanggaran::FirstOffense,
            OffenseArg::Repeat => JenisPelanggaran::RepeatOffense,
        }
    }
}

fn main() -> ExitCode {
    logging::init_with_default("warn");

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let response = match e.downcast::<ApiError>() {
                Ok(api_error) => api_error.to_response(),
                Err(other) => ApiError::Other(other).to_response(),
            };
            match serde_json::to_string_pretty(&response) {
                Ok(text) => println!("{}", text),
                Err(_) => eprintln!("{}: {}", response.code, response.message),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).map_err(ApiError::from)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }

    tracing::info!(version = denda_sim::VERSION, "{}", denda_sim::APP_NAME);
    let mut api = DendaApi::new(config);

    match cli.command {
        Command::Files => print_json(&api.list_files()),
        Command::Load { file } => print_json(&api.load(&file)),
        Command::Options { file, selection } => {
            print_json(&api.filter_options(&file, &selection.into()))
        }
        Command::Calculate(args) => {
            let request = CalculationRequest {
                file: args.file,
                query: DendaQuery {
                    selection: args.selection.into(),
                    jenis_pelanggaran: args.jenis_pelanggaran.into(),
                    jumlah_frekuensi: args.jumlah_frekuensi,
                    jumlah_perangkat: args.jumlah_perangkat,
                },
            };
            let outcome = api.calculate(&request);
            print_json(&outcome)?;

            if let Some(target) = args.export_csv {
                print_json(&api.export_csv(&outcome, &target))?;
            }
            if let Some(target) = args.export_xlsx {
                print_json(&api.export_xlsx(&outcome, &target))?;
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON 序列化失败")?;
    println!("{}", text);
    Ok(())
}
