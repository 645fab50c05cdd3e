//! Shareable poll links.

/// `<base>/poll/<id>`, tolerating a trailing slash on `base`.
pub fn share_url(base: &str, poll_id: &str) -> String {
    format!("{}/poll/{}", base.trim_end_matches('/'), poll_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slash() {
        assert_eq!(share_url("https://hang.example/", "abc"), "https://hang.example/poll/abc");
        assert_eq!(share_url("http://localhost:8080", "abc"), "http://localhost:8080/poll/abc");
    }
}
