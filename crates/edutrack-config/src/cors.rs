use std::env;

/// Allowed CORS origins.
///
/// `ALLOWED_ORIGINS` is a comma-separated list. When it is unset, empty, or
/// contains `*`, every origin is allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Self {
        let allowed_origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if allowed_origins.is_empty() {
            return Self::default();
        }

        Self { allowed_origins }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_permissive() {
        assert!(CorsConfig::parse("").allows_any_origin());
        assert!(CorsConfig::parse(" , ").allows_any_origin());
    }

    #[test]
    fn test_origin_list() {
        let config = CorsConfig::parse("http://localhost:5173, https://school.example");
        assert!(!config.allows_any_origin());
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:5173", "https://school.example"]
        );
    }

    #[test]
    fn test_wildcard_in_list() {
        assert!(CorsConfig::parse("https://school.example,*").allows_any_origin());
    }
}
