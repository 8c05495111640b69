// apps/zf_cli/src/commands/run.rs

//! 运行模拟命令
//!
//! 从配置文件或内置场景构建初始条件，运行单类别或多类别求解器，
//! 输出统计摘要，可选将完整结果记录序列化为 JSON。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use zf_config::{ModelKind, RunConfig};
use zf_physics::{
    InitialDensity, LwrSolver, MulticlassInitialDensity, MulticlassLwrSolver,
};

use crate::scenarios::Scenario;

/// 运行模拟参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（JSON）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 内置场景名称
    #[arg(short, long, default_value = "red-light")]
    pub scenario: String,

    /// 结果输出文件（JSON）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 使用单类别模型（覆盖配置）
    #[arg(long)]
    pub single: bool,

    /// 域长 [km]（覆盖配置）
    #[arg(long)]
    pub domain_length: Option<f64>,

    /// 模拟时长 [h]（覆盖配置）
    #[arg(long)]
    pub simulation_time: Option<f64>,

    /// 空间步长 [km]（覆盖配置）
    #[arg(long)]
    pub dx: Option<f64>,

    /// 时间步长 [h]（覆盖配置；缺省由 CFL 条件选择）
    #[arg(long)]
    pub dt: Option<f64>,

    /// CFL 安全系数（覆盖配置）
    #[arg(long)]
    pub cfl: Option<f64>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== ZemiFlow 模拟启动 ===");

    // 加载配置并套用命令行覆盖
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => RunConfig::default(),
    };
    if args.single {
        config.model = ModelKind::Single;
    }
    if let Some(v) = args.domain_length {
        config.numerics.domain_length = v;
    }
    if let Some(v) = args.simulation_time {
        config.numerics.simulation_time = v;
    }
    if let Some(v) = args.dx {
        config.numerics.dx = v;
    }
    if let Some(v) = args.dt {
        config.numerics.dt = Some(v);
    }
    if let Some(v) = args.cfl {
        config.numerics.cfl_factor = v;
    }
    config.validate().context("配置校验失败")?;

    let params = config.numerics.to_params()?;
    let scenario = Scenario::from_name(&args.scenario)?;
    info!("场景: {} ({})", scenario.name(), scenario.description());

    let domain_length = params.domain_length;

    // 路况优先级：显式配置 > 场景自带剖面 > 无修正
    let base_quality = config.road.base_quality();
    let config_quality = move |_x: f64| base_quality;
    let scenario_quality = move |x: f64| scenario.road_quality(x, domain_length).unwrap_or(1.0);
    let has_road_config = config.road.road_type.is_some() || config.road.uniform_quality.is_some();
    let road: Option<&(dyn Fn(f64) -> f64 + Sync)> = if has_road_config {
        Some(&config_quality)
    } else if scenario.road_quality(0.0, domain_length).is_some() {
        Some(&scenario_quality)
    } else {
        None
    };

    let start = Instant::now();

    match config.model {
        ModelKind::Single => {
            // 单类别参数取第一个类别（缺省即私家车预设）
            let classes = config.resolve_classes()?;
            let vc = classes
                .first()
                .cloned()
                .unwrap_or_else(|| zf_config::VehiclePreset::Car.to_class());
            info!("模型: 单类别 LWR ({}, v_max={} km/h)", vc.name, vc.v_max);

            let rho_max = vc.rho_max;
            let init = InitialDensity::profile(move |x| {
                scenario.occupancy(x, domain_length) * rho_max
            });

            let solver = LwrSolver::new(vc.v_max, vc.rho_max)?;
            let result = solver.simulate(&init, &params, road)?;

            report_stats(
                result.grid_x.len(),
                result.grid_t.len(),
                result.params.dt,
                result.density.row(result.grid_t.len() - 1),
                result.velocity.row(result.grid_t.len() - 1),
            );
            if let Some(path) = &args.output {
                save_json(path, &result)?;
            }
        }
        ModelKind::Multiclass => {
            let classes = config.resolve_classes()?;
            let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
            info!("模型: 多类别 LWR ({} 类: {})", classes.len(), names.join(", "));

            // 占有率按类别最大密度缩放后均分
            let n = classes.len() as f64;
            let rho_maxes: Vec<f64> = classes.iter().map(|c| c.rho_max).collect();
            let init = MulticlassInitialDensity::profile(move |x| {
                let occ = scenario.occupancy(x, domain_length);
                rho_maxes.iter().map(|&rm| occ * rm / n).collect()
            });

            let solver = MulticlassLwrSolver::new(classes)?;
            let result = solver.simulate(&init, &params, road)?;

            report_stats(
                result.grid_x.len(),
                result.grid_t.len(),
                result.params.dt,
                result.density.row(result.grid_t.len() - 1),
                result.velocity.row(result.grid_t.len() - 1),
            );
            if let Some(path) = &args.output {
                save_json(path, &result)?;
            }
        }
    }

    info!("=== 模拟完成 ===");
    info!("计算时间: {:.3} s", start.elapsed().as_secs_f64());

    Ok(())
}

/// 输出末时刻统计摘要
fn report_stats(nx: usize, nt: usize, dt: f64, density: &[f64], velocity: &[f64]) {
    let rho_max = density.iter().cloned().fold(0.0_f64, f64::max);
    let rho_min = density.iter().cloned().fold(f64::MAX, f64::min);
    let v_mean = velocity.iter().sum::<f64>() / velocity.len() as f64;

    info!("网格: {} 单元 × {} 时间步, dt={:.6} h", nx, nt, dt);
    info!(
        "末时刻: ρ∈[{:.2}, {:.2}] veh/km, 平均速度 {:.2} km/h",
        rho_min, rho_max, v_mean
    );
}

/// 序列化结果记录到文件
fn save_json<T: serde::Serialize>(path: &PathBuf, result: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("创建输出文件失败: {}", path.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), result)?;
    info!("结果已写入: {}", path.display());
    Ok(())
}
