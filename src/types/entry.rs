use crate::identity::stable_entry_id;

/// Closed set of result origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A hierarchical corpus entry addressed by its path.
    PathEntry,
    /// A named, executable command.
    Command,
    /// An addressable in-memory object.
    LiveObject,
    /// Text extracted from a live object, matched against its contents.
    TextMatch,
}

/// Stable identifier of a corpus entry; unique within the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

/// One indexable item as seen by a search session.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    /// Hierarchical location, always normalized to forward slashes.
    pub path: String,
    /// The text sessions match and score against.
    pub display_name: String,
    /// The full name including any extension, used for extension gating.
    pub display_name_with_extension: String,
    pub kind: EntryKind,
    /// Fixed at creation from the triggering query's case rule.
    pub ignore_case_at_creation: bool,
}

impl Entry {
    /// Build an entry for a corpus path resolved from the index.
    #[must_use]
    pub fn path_entry(id: EntryId, path: impl Into<String>, ignore_case: bool) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(path.as_str()).to_string();
        let display_name = file_stem(&name).to_string();
        Self {
            id,
            path,
            display_name,
            display_name_with_extension: name,
            kind: EntryKind::PathEntry,
            ignore_case_at_creation: ignore_case,
        }
    }

    /// Build an entry for a named command supplied by the command provider.
    #[must_use]
    pub fn command(name: impl Into<String>, ignore_case: bool) -> Self {
        let name = name.into();
        Self {
            id: stable_entry_id(&name),
            path: name.clone(),
            display_name: name.clone(),
            display_name_with_extension: name,
            kind: EntryKind::Command,
            ignore_case_at_creation: ignore_case,
        }
    }

    /// Build an entry for an in-memory object, matched by its name.
    #[must_use]
    pub fn live_object(id: u64, name: impl Into<String>, ignore_case: bool) -> Self {
        let name = name.into();
        Self {
            id: EntryId(id),
            path: name.clone(),
            display_name: name.clone(),
            display_name_with_extension: name,
            kind: EntryKind::LiveObject,
            ignore_case_at_creation: ignore_case,
        }
    }

    /// Build an entry matched against text extracted from an object.
    ///
    /// The object's name stays the address; the extracted blob is what the
    /// session filters and scores.
    #[must_use]
    pub fn text_match(
        id: u64,
        name: impl Into<String>,
        text: impl Into<String>,
        ignore_case: bool,
    ) -> Self {
        let text = text.into();
        Self {
            id: EntryId(id),
            path: name.into(),
            display_name: text.clone(),
            display_name_with_extension: text,
            kind: EntryKind::TextMatch,
            ignore_case_at_creation: ignore_case,
        }
    }
}

/// Name without its extension; dotfiles keep their full name.
pub(crate) fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(index) => &name[..index],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_entries_split_name_and_stem() {
        let entry = Entry::path_entry(EntryId(1), "Assets/Foo/Player.cs", true);
        assert_eq!(entry.display_name, "Player");
        assert_eq!(entry.display_name_with_extension, "Player.cs");
        assert_eq!(entry.kind, EntryKind::PathEntry);
        assert!(entry.ignore_case_at_creation);
    }

    #[test]
    fn commands_use_the_full_name_everywhere() {
        let entry = Entry::command("File/Save Project", false);
        assert_eq!(entry.path, "File/Save Project");
        assert_eq!(entry.display_name, "File/Save Project");
        assert_eq!(entry.kind, EntryKind::Command);
    }

    #[test]
    fn text_matches_keep_the_object_name_as_address() {
        let entry = Entry::text_match(7, "Dialog", "Hello,World,", true);
        assert_eq!(entry.path, "Dialog");
        assert_eq!(entry.display_name, "Hello,World,");
        assert_eq!(entry.kind, EntryKind::TextMatch);
    }

    #[test]
    fn stems_ignore_leading_dots() {
        assert_eq!(file_stem("Player.cs"), "Player");
        assert_eq!(file_stem(".gitignore"), ".gitignore");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("README"), "README");
    }
}
