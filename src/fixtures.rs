#[cfg(test)]
pub mod test {
    use serde::Deserialize;

    use crate::env::EnvMap;

    /// Owned `(key, value)` pairs, as `std::env::vars()` would yield them.
    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn env(pairs: &[(&str, &str)]) -> EnvMap {
        vars(pairs).into_iter().collect()
    }

    /// An environment with one variable per coercion shape.
    pub fn sample_env() -> EnvMap {
        env(&[
            ("APP_PORT", "8080"),
            ("APP_DEBUG", "TRUE"),
            ("APP_ZERO", "0"),
            ("APP_NAME", "my app"),
            ("APP_HOSTS", "a.example, b.example ,c.example"),
            ("APP_LIST", "x,y,z"),
            ("APP_LIMITS", r#"{max:10,name:"a value"}"#),
            ("APP_BUDGET", "1_000,000.5"),
            ("NEXT_PUBLIC_CLIENT_KEY", "the-key"),
            ("NEXT_PUBLIC_CLIENT_AGE", "key-age"),
            ("NEXT_PUBLIC_CLIENT_EXP", "key-expires"),
        ])
    }

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
        #[serde(default)]
        pub debug: bool,
        #[serde(default)]
        pub tags: Vec<String>,
    }

    #[test]
    fn sample_env_has_distinct_keys() {
        assert_eq!(sample_env().len(), 11);
    }
}
