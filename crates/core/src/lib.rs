#![forbid(unsafe_code)]

pub mod ids {
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct UserId(String);

    impl UserId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, UserIdError> {
            let value = value.into();
            validate_user_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum UserIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    impl std::fmt::Display for UserIdError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Empty => write!(f, "user id is empty"),
                Self::TooLong => write!(f, "user id exceeds 128 bytes"),
                Self::InvalidFirstChar => {
                    write!(f, "user id must start with an ascii letter or digit")
                }
                Self::InvalidChar { ch, index } => {
                    write!(f, "user id contains {ch:?} at byte {index}")
                }
            }
        }
    }

    impl std::error::Error for UserIdError {}

    fn validate_user_id(value: &str) -> Result<(), UserIdError> {
        if value.is_empty() {
            return Err(UserIdError::Empty);
        }
        if value.len() > 128 {
            return Err(UserIdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(UserIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(UserIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            // Mail-shaped principals ("alice@example.com") are common owners.
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-' | '@') {
                continue;
            }
            return Err(UserIdError::InvalidChar { ch, index });
        }
        Ok(())
    }
}

pub mod paths {
    /// A resource path as the protocol addresses it: relative, `/`-separated,
    /// stored without a trailing separator.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct DavPath(String);

    impl DavPath {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, DavPathError> {
            let mut value = value.into();
            if value.ends_with('/') {
                value.pop();
            }
            validate_path(&value)?;
            Ok(Self(value))
        }

        pub fn join(&self, segment: &str) -> Result<Self, DavPathError> {
            if segment.is_empty() {
                return Err(DavPathError::EmptySegment);
            }
            Self::try_new(format!("{}/{segment}", self.0))
        }

        /// True when `other` lies strictly below `self`. The check requires a
        /// separator immediately after the prefix: `foo` covers `foo/bar` but
        /// never the sibling `foobar`.
        pub fn is_ancestor_of(&self, other: &DavPath) -> bool {
            other.0.len() > self.0.len()
                && other.0.as_bytes()[self.0.len()] == b'/'
                && other.0.starts_with(self.0.as_str())
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum DavPathError {
        Empty,
        TooLong,
        Absolute,
        EmptySegment,
        InvalidChar { ch: char, index: usize },
    }

    impl std::fmt::Display for DavPathError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Empty => write!(f, "path is empty"),
                Self::TooLong => write!(f, "path exceeds 4096 bytes"),
                Self::Absolute => write!(f, "path must be relative"),
                Self::EmptySegment => write!(f, "path contains an empty segment"),
                Self::InvalidChar { ch, index } => {
                    write!(f, "path contains {ch:?} at byte {index}")
                }
            }
        }
    }

    impl std::error::Error for DavPathError {}

    fn validate_path(value: &str) -> Result<(), DavPathError> {
        if value.is_empty() {
            return Err(DavPathError::Empty);
        }
        if value.len() > 4096 {
            return Err(DavPathError::TooLong);
        }
        if value.starts_with('/') {
            return Err(DavPathError::Absolute);
        }
        for (index, ch) in value.char_indices() {
            if ch.is_ascii_control() {
                return Err(DavPathError::InvalidChar { ch, index });
            }
        }
        if value.split('/').any(str::is_empty) {
            return Err(DavPathError::EmptySegment);
        }
        Ok(())
    }
}

pub mod model {
    use std::collections::BTreeMap;

    /// Stored properties of one resource: namespace-qualified name to opaque
    /// value. Neither side of the mapping is ever parsed here.
    pub type PropertyMap = BTreeMap<String, String>;

    /// One PROPPATCH mutation: a concrete value or the removal sentinel.
    /// An explicit variant keeps "remove" distinct from "set to empty string".
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum PropertyUpdate {
        Value(String),
        Remove,
    }
}

#[cfg(test)]
mod tests {
    use super::ids::{UserId, UserIdError};
    use super::paths::{DavPath, DavPathError};

    #[test]
    fn user_id_accepts_common_shapes() {
        for raw in ["alice", "dummy_user_42", "alice@example.com", "a.b-c_d"] {
            let user = UserId::try_new(raw).expect("user id");
            assert_eq!(user.as_str(), raw);
        }
    }

    #[test]
    fn user_id_rejects_bad_input() {
        assert_eq!(UserId::try_new(""), Err(UserIdError::Empty));
        assert_eq!(UserId::try_new("-alice"), Err(UserIdError::InvalidFirstChar));
        assert_eq!(
            UserId::try_new("al ice"),
            Err(UserIdError::InvalidChar { ch: ' ', index: 2 })
        );
        assert_eq!(UserId::try_new("a".repeat(129)), Err(UserIdError::TooLong));
    }

    #[test]
    fn dav_path_strips_trailing_separator() {
        let bare = DavPath::try_new("calendars/foo").expect("path");
        let trailing = DavPath::try_new("calendars/foo/").expect("path");
        assert_eq!(bare, trailing);
        assert_eq!(trailing.as_str(), "calendars/foo");
    }

    #[test]
    fn dav_path_rejects_malformed_input() {
        assert_eq!(DavPath::try_new(""), Err(DavPathError::Empty));
        assert_eq!(DavPath::try_new("/"), Err(DavPathError::Empty));
        assert_eq!(DavPath::try_new("/abs/path"), Err(DavPathError::Absolute));
        assert_eq!(DavPath::try_new("a//b"), Err(DavPathError::EmptySegment));
        assert_eq!(
            DavPath::try_new("a\tb"),
            Err(DavPathError::InvalidChar { ch: '\t', index: 1 })
        );
    }

    #[test]
    fn ancestor_requires_separator_boundary() {
        let foo = DavPath::try_new("foo").expect("path");
        let child = DavPath::try_new("foo/bar").expect("path");
        let deep = DavPath::try_new("foo/bar/baz").expect("path");
        let sibling = DavPath::try_new("foobar").expect("path");

        assert!(foo.is_ancestor_of(&child));
        assert!(foo.is_ancestor_of(&deep));
        assert!(!foo.is_ancestor_of(&sibling));
        assert!(!foo.is_ancestor_of(&foo));
        assert!(!child.is_ancestor_of(&foo));
    }

    #[test]
    fn join_appends_one_segment() {
        let base = DavPath::try_new("calendars/foo").expect("path");
        let joined = base.join("bar").expect("join");
        assert_eq!(joined.as_str(), "calendars/foo/bar");
        assert!(base.is_ancestor_of(&joined));
        assert!(base.join("").is_err());
    }
}
