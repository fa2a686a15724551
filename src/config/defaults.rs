//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn source() -> PathBuf {
        "generator".into()
    }

    pub fn output() -> PathBuf {
        ".".into()
    }

    pub fn languages() -> Vec<String> {
        vec!["de".into(), "en".into()]
    }

    pub mod files {
        use std::path::PathBuf;

        pub fn tags() -> PathBuf {
            "tags.json".into()
        }

        pub fn template() -> PathBuf {
            "template.html".into()
        }

        pub fn projects_template() -> PathBuf {
            "projects_template.html".into()
        }
    }
}
