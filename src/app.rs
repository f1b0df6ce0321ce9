use crate::input_path::get_cli_paths;
use anyhow::{Context, Result};
use tidb_slowlog_analysis::{
    config::Config,
    logging::init_logging,
    process::process_slowlog_file,
    slowlog::{NoopPlanDecoder, PlanDecoder},
};
use tracing::{error, info, trace};

pub fn run() -> Result<()> {
    let mut config = Config::load().context("加载配置失败")?;
    init_logging(config.logging_config()?)?;

    let cli = get_cli_paths();
    if let Some(input) = cli.input {
        config.slowlog.input_path = input.display().to_string();
    }
    if let Some(output) = cli.output {
        config.slowlog.output_path = output.display().to_string();
    }
    trace!("运行配置: {:?}", config);

    let input = &config.slowlog.input_path;
    if !std::path::Path::new(input).exists() {
        error!("慢日志文件不存在: {}", input);
        return Ok(());
    }

    let decoder = build_decoder(&config)?;
    let summary = process_slowlog_file(
        input,
        &config.slowlog.output_path,
        config.slowlog.chunk_size,
        decoder,
    )
    .with_context(|| format!("处理慢日志失败: {input}"))?;

    info!(
        "解析完成，共读取 {} 行，输出 {} 条记录到 {}，总耗时: {:.2?}",
        summary.parse.lines,
        summary.exported,
        config.slowlog.output_path,
        summary.elapsed
    );
    Ok(())
}

fn build_decoder(config: &Config) -> Result<Box<dyn PlanDecoder>> {
    if !config.plan_decoder.enabled {
        trace!("未启用执行计划解码");
        return Ok(Box::new(NoopPlanDecoder));
    }

    #[cfg(feature = "plan-decode")]
    {
        info!("执行计划解码已启用: {}", config.plan_decoder.dsn);
        Ok(Box::new(tidb_slowlog_analysis::slowlog::MysqlPlanDecoder::new(
            config.plan_decoder.dsn.clone(),
        )?))
    }

    #[cfg(not(feature = "plan-decode"))]
    {
        tracing::warn!("配置启用了执行计划解码，但编译时未开启 plan-decode 特性，计划字段将留空");
        Ok(Box::new(NoopPlanDecoder))
    }
}
