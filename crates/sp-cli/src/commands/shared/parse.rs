use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an optional enum argument.
pub fn parse_opt_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

#[cfg(test)]
mod tests {
    use sp_core::enums::{SessionFormat, SessionSort, SessionStatus};

    use super::{parse_enum, parse_opt_enum};

    #[test]
    fn parses_snake_case_enum() {
        let status: SessionStatus = parse_enum("approved", "status").expect("status should parse");
        assert_eq!(status, SessionStatus::Approved);
    }

    #[test]
    fn parses_mixed_case() {
        let format: SessionFormat = parse_enum("Workshop", "kind").expect("kind should parse");
        assert_eq!(format, SessionFormat::Workshop);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<SessionSort>("popular", "sort").expect_err("should fail");
        assert!(err.to_string().contains("invalid sort 'popular'"));
    }

    #[test]
    fn optional_none_passes_through() {
        let sort = parse_opt_enum::<SessionSort>(None, "sort").expect("none is fine");
        assert_eq!(sort, None);
    }
}
