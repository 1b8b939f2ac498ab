use std::{env, path::PathBuf};

use anyhow::{Context, Result, anyhow};

const USAGE: &str = "usage: bouncer [--config <path>] [--seed <u64>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: PathBuf,
    pub seed: Option<u64>,
}

pub fn args_from_env() -> Result<CliArgs> {
    parse_args(env::args().skip(1))
}

pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config_path = None;
    let mut seed = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                let parsed = value
                    .parse::<u64>()
                    .with_context(|| format!("--seed expects an unsigned integer, got '{value}'"))?;
                seed = Some(parsed);
            }
            other => {
                return Err(anyhow!("unknown argument: {other}. {USAGE}"));
            }
        }
    }

    Ok(CliArgs {
        config_path: config_path.unwrap_or_else(|| PathBuf::from("./bouncer.jsonc")),
        seed,
    })
}
