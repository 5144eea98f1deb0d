//! Small helpers.

/// Expand `${VAR}` references from the environment.
///
/// Unset variables expand to the empty string with a warning, so a missing
/// credential shows up in the logs instead of inside a request header.
pub fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => tracing::warn!("environment variable {name} is not set"),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(expand_env_vars("model = \"qwen-plus\""), "model = \"qwen-plus\"");
    }

    #[test]
    fn unset_variable_expands_empty() {
        assert_eq!(expand_env_vars("key = \"${DEEPSPACE_TEST_UNSET}\""), "key = \"\"");
    }

    #[test]
    fn unterminated_reference_is_kept() {
        assert_eq!(expand_env_vars("key = ${OOPS"), "key = ${OOPS");
    }

    #[test]
    fn set_variable_expands() {
        // set_var is unsafe with concurrent env access; scoped to this test.
        unsafe { std::env::set_var("DEEPSPACE_TEST_KEY", "sk-123") };
        assert_eq!(expand_env_vars("${DEEPSPACE_TEST_KEY}"), "sk-123");
    }
}
