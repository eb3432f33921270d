//! Reads a directory of YAML files into a resource list

use crate::resource::{KubeObject, ResourceList};
use crate::utils::{KrmError, KrmResult};
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

pub fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Dot-prefixed entry below the walk root
pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// `path` relative to `root`, always `/`-separated
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `root` in file name order and load every YAML document.
///
/// Each object is annotated with the file it came from and its position in
/// that file. Hidden files and directories are skipped.
pub fn read_dir(root: &Path) -> KrmResult<ResourceList> {
    let mut items = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            KrmError::io(path, e.into())
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() || !is_yaml_file(path) {
            continue;
        }

        let relative = relative_path(root, path);
        let objects = read_file(path, &relative)?;
        tracing::debug!(file = %relative, objects = objects.len(), "read file");
        items.extend(objects);
    }

    crate::log_info!("Read {} resource(s) from {}", items.len(), root.display());
    Ok(ResourceList::new(items))
}

fn read_file(path: &Path, relative: &str) -> KrmResult<Vec<KubeObject>> {
    let content = fs::read_to_string(path).map_err(|e| KrmError::io(path, e))?;
    let mut objects = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(&content).enumerate() {
        let value = Value::deserialize(document)
            .map_err(|e| KrmError::parse(format!("{} document {}", relative, index), e))?;

        let mut object = match value {
            Value::Mapping(mapping) => KubeObject::from_mapping(mapping),
            Value::Null => continue,
            _ => {
                crate::log_warn!(
                    "Skipping document {} in {}: not a mapping",
                    index,
                    relative
                );
                continue;
            }
        };

        object.set_location(relative, index);
        objects.push(object);
    }

    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{INDEX_ANNOTATION, INTERNAL_PATH_ANNOTATION, PATH_ANNOTATION};

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_reads_nested_multi_document_files() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "prod/app.yaml",
            "apiVersion: v1\nkind: Service\nmetadata:\n  name: web\n---\napiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n",
        );
        write(
            dir.path(),
            "ns.yml",
            "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: prod\n",
        );
        write(dir.path(), "README.md", "# not yaml");

        let list = read_dir(dir.path()).unwrap();
        assert_eq!(list.items.len(), 3);

        // ns.yml sorts before prod/
        assert_eq!(list.items[0].annotation(PATH_ANNOTATION), Some("ns.yml"));
        assert_eq!(list.items[1].annotation(PATH_ANNOTATION), Some("prod/app.yaml"));
        assert_eq!(list.items[1].annotation(INDEX_ANNOTATION), Some("0"));
        assert_eq!(list.items[2].kind(), Some("Deployment"));
        assert_eq!(list.items[2].annotation(INDEX_ANNOTATION), Some("1"));
        assert_eq!(
            list.items[2].annotation(INTERNAL_PATH_ANNOTATION),
            Some("prod/app.yaml")
        );
    }

    #[test]
    fn test_skips_empty_and_scalar_documents() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "mixed.yaml",
            "---\n---\njust a string\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\n",
        );
        let list = read_dir(dir.path()).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name(), Some("c"));
    }

    #[test]
    fn test_skips_hidden_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            ".git/config.yaml",
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: hidden\n",
        );
        assert!(read_dir(dir.path()).unwrap().items.is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.yaml", "key: [unclosed\n");
        let err = read_dir(dir.path()).unwrap_err();
        assert!(matches!(err, KrmError::Parse { .. }));
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let err = read_dir(Path::new("/no/such/krm/dir")).unwrap_err();
        assert!(matches!(err, KrmError::Io { .. }));
    }
}
