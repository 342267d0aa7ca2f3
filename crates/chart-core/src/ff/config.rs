//! Feature configuration lines and parameter errors.
//!
//! A line names the feature type followed by `key=value` tokens:
//!
//! ```text
//! NonTermMinSpan name=ntms min-span=3 tuneable=false
//! ```

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("empty feature line")]
    EmptyLine,
    #[error("malformed token {token:?} in feature line (expected key=value)")]
    Malformed { token: String },
    #[error("unknown feature type {0:?}")]
    UnknownFeature(String),
    #[error("feature {feature}: unknown parameter {key:?}")]
    UnknownParameter { feature: String, key: String },
    #[error("feature {feature}: invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        feature: String,
        key: String,
        value: String,
        reason: String,
    },
    #[error("feature {feature}: num-features={requested} but the feature has {fixed} dense scores")]
    WidthMismatch {
        feature: String,
        requested: usize,
        fixed: usize,
    },
    #[error("duplicate feature name {0:?}")]
    DuplicateName(String),
}

/// A parsed feature configuration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLine {
    pub feature_type: String,
    params: Vec<(String, String)>,
}

impl FeatureLine {
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let mut tokens = line.split_whitespace();
        let feature_type = tokens.next().ok_or(ConfigError::EmptyLine)?.to_string();
        let params = tokens
            .map(|token| match token.split_once('=') {
                Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
                _ => Err(ConfigError::Malformed {
                    token: token.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            feature_type,
            params,
        })
    }

    /// Parameters in the order written.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse `value` as `T`, mapping failures to [`ConfigError::InvalidValue`].
pub fn scan<T>(feature: &str, key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        feature: feature.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Lenient boolean parse: `true`/`false`/`1`/`0`.
pub fn scan_bool(feature: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            feature: feature.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let line = FeatureLine::parse("NonTermMinSpan name=ntms  min-span=3").unwrap();
        assert_eq!(line.feature_type, "NonTermMinSpan");
        let params: Vec<_> = line.params().collect();
        assert_eq!(params, vec![("name", "ntms"), ("min-span", "3")]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(FeatureLine::parse("   "), Err(ConfigError::EmptyLine));
        assert_eq!(
            FeatureLine::parse("NonTermMinSpan min-span"),
            Err(ConfigError::Malformed {
                token: "min-span".to_string()
            })
        );
        assert!(FeatureLine::parse("F =3").is_err());
    }

    #[test]
    fn test_scan() {
        assert_eq!(scan::<usize>("F", "k", "12"), Ok(12));
        let err = scan::<usize>("F", "k", "-1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("feature F"));
        assert_eq!(scan_bool("F", "k", "1"), Ok(true));
        assert!(scan_bool("F", "k", "yes").is_err());
    }
}
