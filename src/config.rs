use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::error::{Error, Result};

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    timeout: Option<String>,
}

pub(crate) fn load_config(url: Option<String>, timeout: Option<Duration>) -> Result<ClientConfig> {
    load_config_from(url, timeout, |name| std::env::var(name).ok(), &rc_candidates())
}

/// Resolves the configuration with `env` standing in for the process
/// environment and `rc_paths` for the rc file search order.
fn load_config_from(
    url: Option<String>,
    timeout: Option<Duration>,
    env: impl Fn(&str) -> Option<String>,
    rc_paths: &[PathBuf],
) -> Result<ClientConfig> {
    let mut url = url.or_else(|| env("CARBONINTENSITY_URL"));
    let mut timeout_text = env("CARBONINTENSITY_TIMEOUT");

    if url.is_none() || (timeout.is_none() && timeout_text.is_none()) {
        if let Some(rc_path) = rc_paths.iter().find(|p| p.exists()) {
            let cfg = read_rc(rc_path)?;
            if url.is_none() {
                url = cfg.url;
            }
            if timeout_text.is_none() {
                timeout_text = cfg.timeout;
            }
        }
    }

    let defaults = ClientConfig::default();
    let timeout = match (timeout, timeout_text) {
        (Some(t), _) => Some(t),
        (None, Some(text)) => parse_timeout(&text)?,
        (None, None) => defaults.timeout,
    };

    Ok(ClientConfig {
        url: url.unwrap_or(defaults.url),
        timeout,
    })
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                continue;
            }
            match k.trim() {
                "url" => cfg.url = Some(v.to_string()),
                "timeout" => cfg.timeout = Some(v.to_string()),
                _ => {}
            }
        }
    }

    cfg
}

/// Whole seconds; `0` disables the timeout.
fn parse_timeout(text: &str) -> Result<Option<Duration>> {
    let secs: u64 = text
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid timeout {text:?}; expected whole seconds")))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) CARBONINTENSITY_RC (explicit)
    // 2) ./.carbonintensityrc
    // 3) ~/.carbonintensityrc
    if let Ok(p) = std::env::var("CARBONINTENSITY_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".carbonintensityrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".carbonintensityrc"));
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rc_reads_url_and_timeout() {
        let cfg = parse_rc(
            "# local stub\nurl: \"http://localhost:8080\"\ntimeout: 5\nunknown: x\n",
        );
        assert_eq!(
            cfg,
            RcConfig {
                url: Some("http://localhost:8080".to_string()),
                timeout: Some("5".to_string()),
            }
        );
    }

    #[test]
    fn rc_url_keeps_scheme_colon() {
        let cfg = parse_rc("url: https://api.carbonintensity.org.uk\n");
        assert_eq!(cfg.url.as_deref(), Some("https://api.carbonintensity.org.uk"));
    }

    #[test]
    fn rc_skips_empty_values() {
        assert_eq!(parse_rc("url:\ntimeout: ''\n"), RcConfig::default());
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(parse_timeout("30").unwrap(), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout(" 0 ").unwrap(), None);
        assert!(matches!(parse_timeout("soon"), Err(Error::Config(_))));
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_rc(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join(".carbonintensityrc");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn explicit_arguments_win() {
        let dir = tempfile::tempdir().unwrap();
        let rc = write_rc(&dir, "url: http://rc\ntimeout: 9\n");
        let env = |name: &str| match name {
            "CARBONINTENSITY_URL" => Some("http://env".to_string()),
            "CARBONINTENSITY_TIMEOUT" => Some("7".to_string()),
            _ => None,
        };

        let cfg = load_config_from(
            Some("http://127.0.0.1:1".to_string()),
            Some(Duration::from_secs(2)),
            env,
            &[rc],
        )
        .unwrap();

        assert_eq!(cfg.url, "http://127.0.0.1:1");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn env_url_beats_rc_url() {
        let dir = tempfile::tempdir().unwrap();
        let rc = write_rc(&dir, "url: http://rc\n");
        let env = |name: &str| (name == "CARBONINTENSITY_URL").then(|| "http://env".to_string());

        let cfg = load_config_from(None, None, env, &[rc]).unwrap();

        assert_eq!(cfg.url, "http://env");
        assert_eq!(cfg.timeout, ClientConfig::default().timeout);
    }

    #[test]
    fn rc_timeout_used_when_env_has_none() {
        let dir = tempfile::tempdir().unwrap();
        let rc = write_rc(&dir, "# local\nurl: 'http://rc:8080'\ntimeout: 12\n");

        let cfg = load_config_from(None, None, no_env, &[rc]).unwrap();

        assert_eq!(cfg.url, "http://rc:8080");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(12)));
    }

    #[test]
    fn first_existing_rc_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let rc = write_rc(&dir, "timeout: 0\n");

        let cfg = load_config_from(None, None, no_env, &[missing, rc]).unwrap();

        assert_eq!(cfg.url, crate::client::DEFAULT_URL);
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn defaults_without_env_or_rc() {
        let cfg = load_config_from(None, None, no_env, &[]).unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn invalid_rc_timeout_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let rc = write_rc(&dir, "timeout: soon\n");

        assert!(matches!(
            load_config_from(None, None, no_env, &[rc]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn read_rc_round_trips_file() {
        let dir = tempfile::tempdir().unwrap();
        let rc = write_rc(&dir, "url: http://localhost:8080\ntimeout: 5\n");

        assert_eq!(
            read_rc(&rc).unwrap(),
            RcConfig {
                url: Some("http://localhost:8080".to_string()),
                timeout: Some("5".to_string()),
            }
        );
    }

    #[test]
    fn unreadable_rc_is_config_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            read_rc(&dir.path().join("absent")),
            Err(Error::Config(_))
        ));
        // A directory exists but cannot be read as a file.
        assert!(matches!(read_rc(dir.path()), Err(Error::Config(_))));
        assert!(matches!(
            load_config_from(None, None, no_env, &[dir.path().to_path_buf()]),
            Err(Error::Config(_))
        ));
    }
}
