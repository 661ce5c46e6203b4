//! Doc-comment annotation of generated TOML.
//!
//! Field docs come from the `documented` derives on the config structs and
//! are written as `#` comments above the matching TOML keys.

use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{ArrayOfTables, Decor, Item, RawString, Table};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Appends every line of `docs` to the comment prefix held by `decor`.
pub fn append_docs_as_toml_comments(decor: &mut Decor, docs: &str) {
    let comments: String = docs
        .lines()
        .map(|line| {
            if line.is_empty() {
                "#\n".to_string()
            } else {
                format!("# {line}\n")
            }
        })
        .collect();

    let prefix = match decor.prefix().and_then(RawString::as_str) {
        None | Some("") => comments,
        Some(existing) if existing.ends_with('\n') => format!("{existing}{comments}"),
        Some(existing) => format!("{existing}\n{comments}"),
    };
    decor.set_prefix(prefix);
}

/// Annotates the keys of `table` with the field docs of `T`.
///
/// Nested tables also get the container docs of `T` unless `is_root` is set.
pub fn annotate_toml_table<T>(table: &mut Table, is_root: bool) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if !is_root {
        append_docs_as_toml_comments(table.decor_mut(), T::DOCS);
    }

    for (mut key, item) in table.iter_mut() {
        let name = key.get().to_string();
        let Ok(docs) = T::get_field_docs(&name) else {
            warn!(
                "Field '{}' has no documentation on '{}'",
                name,
                type_name::<T>()
            );
            continue;
        };

        match item {
            Item::None => return Err(ConfigError::UnexpectedTomlItem(name)),
            Item::Value(_) => append_docs_as_toml_comments(key.leaf_decor_mut(), docs),
            Item::Table(sub_table) => append_docs_as_toml_comments(sub_table.decor_mut(), docs),
            Item::ArrayOfTables(array) => {
                if let Some(first) = array.iter_mut().next() {
                    append_docs_as_toml_comments(first.decor_mut(), docs);
                }
            }
        }
    }

    Ok(())
}

/// Annotates the entries of an array of tables with the field docs of `T`.
///
/// All entries share a shape, so only the first one is documented.
pub fn annotate_toml_array_of_tables<T>(array: &mut ArrayOfTables) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if let Some(first) = array.iter_mut().next() {
        annotate_toml_table::<T>(first, true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_append_docs_as_toml_comments() {
        let mut decor = Decor::new("", "");
        append_docs_as_toml_comments(&mut decor, "Bound parameter ceiling");

        let prefix = decor.prefix().and_then(|p| p.as_str()).unwrap();
        assert_eq!(prefix, "# Bound parameter ceiling\n");
    }

    #[test]
    fn test_append_docs_keeps_existing_prefix() {
        let mut decor = Decor::new("# existing", "");
        append_docs_as_toml_comments(&mut decor, "Line 1\n\nLine 2");

        let prefix = decor.prefix().and_then(|p| p.as_str()).unwrap();
        assert_eq!(prefix, "# existing\n# Line 1\n#\n# Line 2\n");
    }

    #[test]
    fn test_annotate_toml_document() {
        let config = Config::default_config();
        let doc = config.to_annotated_document().unwrap().to_string();

        assert!(doc.contains("# SQL dialect"));
        assert!(doc.contains("# Columns that filters"));
        assert!(doc.contains("[[tables]]"));
    }
}
