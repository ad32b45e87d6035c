//! Profile file sources
//!
//! The registry fills itself from one or more providers. Each provider lists
//! resource names and opens them as byte streams; the registry decides which
//! names are profile files.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

/// Source of bundled profile files
pub trait ResourceProvider: Send + Sync {
    /// Short label for log lines
    fn describe(&self) -> String;

    /// Names of all resources this provider can open
    fn list(&self) -> io::Result<Vec<String>>;

    /// Open one resource by a name returned from `list`
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

const COINS_LITE: &str = include_str!("../resources/validator/coins-2.0-lite.profile");
const COINS_LITE_EXTENDED: &str = include_str!("../resources/validator/coins-2.0-lite-extended.profile");

/// Profiles compiled into the library (or supplied in memory)
#[derive(Debug, Clone)]
pub struct BundledResources {
    entries: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl BundledResources {
    /// The profiles shipped with this crate
    pub fn coins() -> Self {
        Self {
            entries: vec![
                (Cow::Borrowed("coins-2.0-lite.profile"), Cow::Borrowed(COINS_LITE)),
                (Cow::Borrowed("coins-2.0-lite-extended.profile"), Cow::Borrowed(COINS_LITE_EXTENDED)),
            ],
        }
    }

    /// In-memory resources, keyed by file name
    pub fn from_entries<I, N, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, content)| (Cow::Owned(name.into()), Cow::Owned(content.into())))
                .collect(),
        }
    }
}

impl Default for BundledResources {
    fn default() -> Self {
        Self::coins()
    }
}

impl ResourceProvider for BundledResources {
    fn describe(&self) -> String {
        format!("bundled ({} files)", self.entries.len())
    }

    fn list(&self) -> io::Result<Vec<String>> {
        Ok(self.entries.iter().map(|(name, _)| name.to_string()).collect())
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, content)| Box::new(content.as_bytes()) as Box<dyn Read + '_>)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no bundled resource {}", name)))
    }
}

/// Files directly inside a directory (not recursive)
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceProvider for DirectoryResources {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(self.root.join(name))?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn read_all(provider: &dyn ResourceProvider, name: &str) -> String {
        let mut content = String::new();
        provider.open(name).unwrap().read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_bundled_resources_list_and_open() {
        let bundled = BundledResources::coins();
        let names = bundled.list().unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.ends_with(".profile")));
        assert!(read_all(&bundled, &names[0]).contains("ProfileName"));
    }

    #[test]
    fn test_bundled_open_unknown_name() {
        let bundled = BundledResources::from_entries(vec![("a.profile", "ProfileName A")]);
        let err = bundled.open("b.profile").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_directory_resources_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("b.profile")).unwrap();
        writeln!(file, "ProfileName B").unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        fs::create_dir(dir.path().join("nested.profile")).unwrap();

        let provider = DirectoryResources::new(dir.path());
        assert_eq!(provider.list().unwrap(), vec!["a.txt", "b.profile"]);
        assert_eq!(read_all(&provider, "b.profile"), "ProfileName B\n");
    }

    #[test]
    fn test_directory_resources_missing_root() {
        let provider = DirectoryResources::new("/definitely/not/here");
        assert!(provider.list().is_err());
        assert!(provider.describe().contains("/definitely/not/here"));
    }
}
