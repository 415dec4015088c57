// Level abbreviation: the two most common levels shrink to one character.

/// Abbreviate a plain level token for the packed form.
pub fn compress_level(level: &str) -> &str {
    match level {
        "INFO" => "1",
        "ERROR" => "0",
        other => other,
    }
}

/// Expand a packed level code back to its plain token.
pub fn expand_level(code: &str) -> &str {
    match code {
        "1" => "INFO",
        "0" => "ERROR",
        other => other,
    }
}
