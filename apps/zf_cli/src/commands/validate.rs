// apps/zf_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 验证运行配置文件的格式与取值范围，并给出数值设置方面的提示。

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info, warn};
use zf_config::RunConfig;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== ZemiFlow 配置验证 ===");

    let mut result = ValidationResult::default();
    validate_config(&args.config, &mut result)?;
    print_validation_result(&result, args.strict)
}

fn validate_config(path: &PathBuf, result: &mut ValidationResult) -> Result<()> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;

    // 先做纯 JSON 解析，把语法错误和语义错误分开报告
    if let Err(e) = serde_json::from_str::<serde_json::Value>(&content) {
        result.add_error(format!("JSON 解析错误: {}", e));
        return Ok(());
    }

    let config: RunConfig = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            result.add_error(format!("配置结构错误: {}", e));
            return Ok(());
        }
    };

    if let Err(e) = config.validate() {
        result.add_error(e.to_string());
        return Ok(());
    }
    println!("  ✓ 配置文件格式有效");

    // 数值设置提示
    if config.numerics.cfl_factor > 0.95 {
        result.add_warning(format!(
            "CFL 系数 {} 接近稳定性上界，建议 ≤ 0.95",
            config.numerics.cfl_factor
        ));
    }
    if let Some(dt) = config.numerics.dt {
        // 固定 dt 时用户自行负责 CFL 条件；给出保守上界提示
        let classes = config.resolve_classes().unwrap_or_default();
        let v_max = classes.iter().map(|c| c.v_max).fold(0.0_f64, f64::max);
        if v_max > 0.0 && dt > config.numerics.dx / v_max {
            result.add_warning(format!(
                "固定 dt={} 超过保守 CFL 上界 dx/v_max={:.6}，可能不稳定",
                dt,
                config.numerics.dx / v_max
            ));
        }
    }
    let nx = (config.numerics.domain_length / config.numerics.dx).floor() as usize + 1;
    if nx > 100_000 {
        result.add_warning(format!("空间网格 {} 单元较大，内存与耗时显著", nx));
    }

    Ok(())
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
