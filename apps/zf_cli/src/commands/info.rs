// apps/zf_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示车辆类别预设、路面类型注册表和默认配置。

use anyhow::Result;
use clap::Args;
use tracing::info;
use zf_config::{RunConfig, VehiclePreset};
use zf_physics::{road_quality_coefficient, RoadType, VehicleRole};

use crate::scenarios::Scenario;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 显示车辆类别预设
    #[arg(long)]
    pub presets: bool,

    /// 显示路面类型注册表
    #[arg(long)]
    pub roads: bool,

    /// 显示内置场景
    #[arg(long)]
    pub scenarios: bool,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== ZemiFlow 信息 ===");

    let show_all = !args.presets && !args.roads && !args.scenarios && !args.defaults;

    if args.presets || show_all {
        print_presets();
        println!();
    }
    if args.roads || show_all {
        print_road_types();
        println!();
    }
    if args.scenarios || show_all {
        print_scenarios();
        println!();
    }
    if args.defaults || show_all {
        print_default_config()?;
    }

    Ok(())
}

fn print_presets() {
    println!("=== 车辆类别预设 ===");
    println!(
        "{:<8} {:<14} {:>8} {:>10} {:>6} {:>6} {:>12}",
        "名称", "角色", "v_max", "rho_max", "eta", "beta", "lambda_min"
    );
    for preset in VehiclePreset::all() {
        let vc = preset.to_class();
        println!(
            "{:<8} {:<14} {:>8.1} {:>10.1} {:>6.2} {:>6.2} {:>12.2}",
            vc.name, vc.role.to_string(), vc.v_max, vc.rho_max, vc.eta, vc.beta, vc.lambda_min
        );
    }
}

fn print_road_types() {
    println!("=== 路面类型注册表 ===");
    println!(
        "{:<14} {:>6} {:>8} {:>8} {:>8}  描述",
        "类型", "基准", "穿插", "蛇行", "中性"
    );
    for rt in RoadType::all() {
        println!(
            "{:<14} {:>6.2} {:>8.2} {:>8.2} {:>8.2}  {}",
            format!("{:?}", rt),
            rt.base_quality(),
            road_quality_coefficient(*rt, VehicleRole::GapFilling),
            road_quality_coefficient(*rt, VehicleRole::Interweaving),
            road_quality_coefficient(*rt, VehicleRole::Neutral),
            rt.description(),
        );
    }
}

fn print_scenarios() {
    println!("=== 内置场景 ===");
    for scenario in Scenario::all() {
        println!("{:<16} {}", scenario.name(), scenario.description());
    }
}

fn print_default_config() -> Result<()> {
    println!("=== 默认配置 ===");
    let config = RunConfig::default();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
