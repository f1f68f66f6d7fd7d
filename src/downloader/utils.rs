// Helper functions for strategy implementations

use std::io::ErrorKind;
use std::process::{Output, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};
use tracing::warn;

use super::errors::EngineError;
use super::models::EngineConfig;

/// Run a command to completion, capturing stdout/stderr, killing it after `timeout_secs`.
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<Output, EngineError> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                EngineError::ToolNotFound(format!("{}: {}", program, e))
            }
            _ => EngineError::Io(format!("Failed to start {}: {}", program, e)),
        })?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| EngineError::Io(format!("Failed to capture stdout from {}", program)))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| EngineError::Io(format!("Failed to capture stderr from {}", program)))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status = status_res?;
            let stdout = stdout_task
                .await
                .map_err(|e| EngineError::Io(format!("stdout task failed: {}", e)))??;
            let stderr = stderr_task
                .await
                .map_err(|e| EngineError::Io(format!("stderr task failed: {}", e)))??;
            Ok(Output { status, stdout, stderr })
        }
        Err(_) => {
            warn!(program, timeout_secs, "engine process timed out, killing it");
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(EngineError::Timeout(timeout_secs))
        }
    }
}

/// Turn a failed process output into an EngineError, preferring stderr
pub fn output_error(output: &Output) -> EngineError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        return EngineError::from_engine_output(&stderr);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        return EngineError::from_engine_output(&stdout);
    }
    EngineError::Unknown(format!("engine exited with {}", output.status))
}

/// Network arguments shared by every yt-dlp invocation
pub fn network_args(config: &EngineConfig) -> Vec<String> {
    let mut args = vec![
        "--socket-timeout".to_string(),
        "30".to_string(),
        "--retries".to_string(),
        "3".to_string(),
        "--user-agent".to_string(),
        config.user_agent.clone(),
    ];

    if let Some(proxy) = &config.proxy {
        args.push("--proxy".to_string());
        args.push(proxy.clone());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_tool_not_found() {
        let result = run_output_with_timeout("definitely-not-a-real-binary-4711", &[], 5).await;
        assert!(matches!(result, Err(EngineError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let args = vec!["-c".to_string(), "sleep 10".to_string()];
        let result = run_output_with_timeout("sh", &args, 1).await;
        assert_eq!(result.unwrap_err(), EngineError::Timeout(1));
    }

    #[tokio::test]
    async fn test_failed_output_is_classified() {
        let args = vec![
            "-c".to_string(),
            "echo 'ERROR: Video unavailable' >&2; exit 1".to_string(),
        ];
        let output = run_output_with_timeout("sh", &args, 5).await.unwrap();
        assert!(!output.status.success());
        assert!(matches!(output_error(&output), EngineError::NotFound(_)));
    }

    #[test]
    fn test_network_args_with_proxy() {
        let config = EngineConfig {
            proxy: Some("socks5://127.0.0.1:1080".to_string()),
            ..EngineConfig::default()
        };
        let args = network_args(&config);
        let pos = args.iter().position(|a| a == "--proxy").unwrap();
        assert_eq!(args[pos + 1], "socks5://127.0.0.1:1080");
        assert!(args.contains(&"--user-agent".to_string()));
    }
}
