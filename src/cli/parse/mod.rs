//! Parse command - runs the command parser over a file or stdin

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use crate::config::AppConfig;
use crate::domain::{CommandParser, ParseResult};
use crate::infrastructure::services::PARSE_FAILURE;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// File holding the command text; stdin when omitted
    pub file: Option<PathBuf>,
}

pub async fn run(args: ParseArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    let command = read_command(args.file.as_ref())?;

    let result = parse(&CommandParser::new(config.parser), &command)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn read_command(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn parse(parser: &CommandParser, command: &str) -> anyhow::Result<ParseResult> {
    match parser.parse(command) {
        Some(result) => Ok(result),
        None => bail!(PARSE_FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_command_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "curl https://x.example/run -d '{{\"query\":\"\"}}'").unwrap();

        let command = read_command(Some(&file.path().to_path_buf())).unwrap();
        let result = parse(&CommandParser::default(), &command).unwrap();

        assert_eq!(result.input_field, "query");
        assert_eq!(result.endpoint.as_deref(), Some("https://x.example/run"));
    }

    #[test]
    fn test_unparseable_command_is_error() {
        let error = parse(&CommandParser::default(), "hello").unwrap_err();
        assert_eq!(error.to_string(), PARSE_FAILURE);
    }

    #[test]
    fn test_missing_file_is_error() {
        let missing = PathBuf::from("/definitely/not/here.txt");
        assert!(read_command(Some(&missing)).is_err());
    }
}
