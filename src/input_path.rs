use std::env;
use std::path::PathBuf;

/// 命令行给出的输入/输出路径
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliPaths {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// 获取慢日志路径和 CSV 输出路径：`slowlog-cli [INPUT] [OUTPUT]`
pub fn get_cli_paths() -> CliPaths {
    parse_args(env::args().skip(1))
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> CliPaths {
    CliPaths {
        input: args.next().map(PathBuf::from),
        output: args.next().map(PathBuf::from),
    }
}
