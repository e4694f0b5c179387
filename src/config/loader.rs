//! Configuration loading from disk, with an interactive fallback.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::is_usable;

/// Prompt shown when no usable configuration is found.
pub const BACKEND_PROMPT: &str = "Write backend (example: http://127.0.0.1:80): ";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no backend provided before end of input")]
    MissingBackend,
}

/// Load and parse configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Write configuration as indented JSON.
pub fn save_config(path: &Path, config: &ProxyConfig) -> Result<(), ConfigError> {
    let mut content = serde_json::to_string_pretty(config)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

/// Load the configuration at `path`, prompting on stdin/stdout when it is
/// missing or unusable.
pub fn load_or_create(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    load_or_create_with(path, &mut input, &mut output)
}

/// Same as [`load_or_create`] with explicit console streams.
pub fn load_or_create_with<R, W>(
    path: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<ProxyConfig, ConfigError>
where
    R: BufRead,
    W: Write,
{
    match load_config(path) {
        Ok(config) if is_usable(&config) => return Ok(config),
        Ok(_) => tracing::warn!(path = %path.display(), "Config has no backend"),
        Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Config file not found");
        }
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Config unusable"),
    }

    let config = ProxyConfig::new(prompt_backend(input, output)?);

    if let Err(e) = save_config(path, &config) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to persist config");
    }

    Ok(config)
}

fn prompt_backend<R, W>(input: &mut R, output: &mut W) -> Result<String, ConfigError>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{BACKEND_PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ConfigError::MissingBackend);
        }

        let backend = line.trim();
        if !backend.is_empty() {
            return Ok(backend.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(path: &Path, typed: &str) -> (Result<ProxyConfig, ConfigError>, String) {
        let mut input = Cursor::new(typed.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = load_or_create_with(path, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        save_config(&path, &ProxyConfig::new("http://example.com")).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.backend, "http://example.com");
    }

    #[test]
    fn saved_file_is_indented() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        save_config(&path, &ProxyConfig::new("http://example.com")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"backend\": \"http://example.com\"\n}\n");
    }

    #[test]
    fn existing_config_skips_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"backend": "http://10.0.0.1:8080"}"#).unwrap();

        let (result, printed) = run(&path, "");

        assert_eq!(result.unwrap().backend, "http://10.0.0.1:8080");
        assert!(printed.is_empty());
    }

    #[test]
    fn missing_file_prompts_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let (result, printed) = run(&path, "  http://127.0.0.1:3000 \n");

        assert_eq!(result.unwrap().backend, "http://127.0.0.1:3000");
        assert_eq!(printed, BACKEND_PROMPT);
        assert_eq!(load_config(&path).unwrap().backend, "http://127.0.0.1:3000");
    }

    #[test]
    fn malformed_file_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let (result, _) = run(&path, "http://backend\n");

        assert_eq!(result.unwrap().backend, "http://backend");
        assert_eq!(load_config(&path).unwrap().backend, "http://backend");
    }

    #[test]
    fn empty_backend_prompts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"backend": ""}"#).unwrap();

        let (result, _) = run(&path, "http://backend\n");

        assert_eq!(result.unwrap().backend, "http://backend");
    }

    #[test]
    fn blank_answers_are_asked_again() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let (result, printed) = run(&path, "\n   \nhttp://backend\n");

        assert_eq!(result.unwrap().backend, "http://backend");
        assert_eq!(printed.matches(BACKEND_PROMPT).count(), 3);
    }

    #[test]
    fn end_of_input_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let (result, _) = run(&path, "\n");

        assert!(matches!(result, Err(ConfigError::MissingBackend)));
        assert!(!path.exists());
    }

    #[test]
    fn persist_failure_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing-dir").join("config.json");

        let (result, _) = run(&path, "http://backend\n");

        assert_eq!(result.unwrap().backend, "http://backend");
        assert!(!path.exists());
    }
}
