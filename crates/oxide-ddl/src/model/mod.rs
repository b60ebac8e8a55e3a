//! Schema representation types.
//!
//! A [`Database`] owns ordered [`Table`]s; a table owns ordered
//! [`Column`]s, its [`Index`]es and its [`ForeignKey`]s. Every name lookup
//! takes an explicit case-sensitivity switch.

mod column;
mod database;
mod default_value;
mod foreign_key;
mod index;
mod table;

pub use column::Column;
pub use database::Database;
pub use default_value::DefaultValue;
pub use foreign_key::{ForeignKey, ForeignKeyAction, Reference};
pub use index::Index;
pub use table::Table;

/// Compares two identifiers.
#[must_use]
pub fn names_equal(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(b)
    }
}

/// Compares two identifier lists element-wise.
#[must_use]
pub fn name_lists_equal<A, B>(a: &[A], b: &[B], case_sensitive: bool) -> bool
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| names_equal(x.as_ref(), y.as_ref(), case_sensitive))
}

/// Compares two optional names; an absent name on either side matches.
pub(crate) fn optional_names_match(
    a: Option<&str>,
    b: Option<&str>,
    case_sensitive: bool,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => names_equal(a, b, case_sensitive),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_equal() {
        assert!(names_equal("Users", "USERS", false));
        assert!(!names_equal("Users", "USERS", true));
    }

    #[test]
    fn test_name_lists_equal() {
        assert!(name_lists_equal(&["a", "B"], &["A".to_string(), "b".to_string()], false));
        assert!(!name_lists_equal(&["a", "b"], &["b", "a"], false));
        assert!(!name_lists_equal(&["a"], &["a", "b"], false));
    }

    #[test]
    fn test_optional_names_match() {
        assert!(optional_names_match(None, Some("fk_1"), true));
        assert!(optional_names_match(Some("FK_1"), Some("fk_1"), false));
        assert!(!optional_names_match(Some("fk_1"), Some("fk_2"), false));
    }
}
