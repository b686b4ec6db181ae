//! TOML parser with helpful error messages

use super::{ConfigError, GraftConfig};
use std::path::Path;

/// Load and validate graft.toml from disk
pub fn load_config(path: &Path) -> Result<GraftConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&content, &path.display().to_string())
}

/// Parse graft.toml content from string
pub fn parse_config_str(content: &str) -> Result<GraftConfig, ConfigError> {
    parse(content, "<string>")
}

fn parse(content: &str, origin: &str) -> Result<GraftConfig, ConfigError> {
    let config: GraftConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        origin: origin.to_string(),
        message: enhance_toml_error(&e, content),
    })?;

    config.validate()?;
    Ok(config)
}

/// Enhance TOML parsing errors with the lines around the failure
fn enhance_toml_error(error: &toml::de::Error, content: &str) -> String {
    let message = error.message().to_string();

    let line_hint = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    match line_hint {
        Some(line_num) => format!(
            "error at line {}:\n{}\n\n{}",
            line_num,
            get_line_context(content, line_num),
            message
        ),
        None => message,
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &GraftConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::invalid(e.to_string()))
}

/// Write the starter configuration to `path`.
pub fn write_template(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    std::fs::write(path, GraftConfig::template()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
