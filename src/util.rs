pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::urljoin;

    #[test]
    fn joins_without_doubling_slashes() {
        assert_eq!(urljoin("http://h/", "/intensity"), "http://h/intensity");
        assert_eq!(urljoin("http://h", "intensity"), "http://h/intensity");
        assert_eq!(urljoin("http://h/api", "/intensity"), "http://h/api/intensity");
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(urljoin("http://h", "https://other/x"), "https://other/x");
    }
}
