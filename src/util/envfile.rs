use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, and a
/// value wrapped in matching single or double quotes is unquoted.
pub fn parse_env_text(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (idx, line) in content.lines().enumerate() {
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = s.split_once('=') {
            let key = key.trim();
            let mut val = val.trim().to_string();
            if val.len() >= 2
                && ((val.starts_with('"') && val.ends_with('"'))
                    || (val.starts_with('\'') && val.ends_with('\'')))
            {
                val = val[1..val.len() - 1].to_string();
            }
            map.insert(key.to_string(), val);
        } else {
            log::warn!("ignoring .env line {} without '=': {}", idx + 1, line);
        }
    }
    map
}

/// Parse a `.env` file in the current working directory, if present.
/// Does not modify the process environment.
pub fn parse_env_file() -> Result<HashMap<String, String>> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(HashMap::new());
    }
    Ok(parse_env_text(&fs::read_to_string(path)?))
}

/// Load `.env` from the current working directory into the process environment.
/// Variables that are already set win.
pub fn load_dotenv_if_present() -> Result<()> {
    for (k, v) in parse_env_file()? {
        if std::env::var_os(&k).is_none() {
            unsafe {
                std::env::set_var(&k, &v);
            }
        }
    }
    Ok(())
}

/// Generate a .env.template file with placeholder values and comments.
pub fn write_env_template(path: &str) -> Result<()> {
    let mut f = fs::File::create(path)?;
    let template = r#"# safetynet environment configuration template
# Copy this file to .env and adjust. Command line flags take precedence.

# Data document with persons, firestations and medicalrecords
SAFETYNET_DATA=data.json

# Output: json | csv, and an optional file instead of stdout
#SAFETYNET_FORMAT=json
#SAFETYNET_OUT=report.json

# Oldest age (inclusive) counted as a child
#SAFETYNET_MAX_CHILD_AGE=18

# Text matching per site: exact | ignore_case | folded
#SAFETYNET_ADDRESS_MATCH=exact
#SAFETYNET_NAME_MATCH=exact
#SAFETYNET_CITY_MATCH=ignore_case
#SAFETYNET_LAST_NAME_MATCH=ignore_case

# Logging
#RUST_LOG=info
#SAFETYNET_TRACING=1
"#;
    f.write_all(template.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_comments_and_blanks() {
        let map = parse_env_text(
            "# comment\n\nSAFETYNET_DATA=\"/srv/data.json\"\nSAFETYNET_FORMAT = csv\nBROKEN\nQ='x'\n",
        );
        assert_eq!(map.get("SAFETYNET_DATA").map(String::as_str), Some("/srv/data.json"));
        assert_eq!(map.get("SAFETYNET_FORMAT").map(String::as_str), Some("csv"));
        assert_eq!(map.get("Q").map(String::as_str), Some("x"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn template_parses_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env.template");
        write_env_template(path.to_str().unwrap()).unwrap();
        let map = parse_env_text(&fs::read_to_string(&path).unwrap());
        assert_eq!(map.get("SAFETYNET_DATA").map(String::as_str), Some("data.json"));
    }
}
