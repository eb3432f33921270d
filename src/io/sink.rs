//! Writes a resource list back to a directory of YAML files

use super::source::{is_hidden, is_yaml_file};
use crate::engine::{Bucket, bucket_by_path};
use crate::resource::{KubeObject, ResourceList};
use crate::utils::dryrun;
use crate::utils::{KrmError, KrmResult};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default)]
pub struct SinkOptions {
    /// Replace YAML files already present in the output directory
    pub overwrite: bool,
    /// Log what would be written without touching the filesystem
    pub dry_run: bool,
}

/// Output path for an object: its path annotation, or
/// `<namespace>/<kind>_<name>.yaml` when it has none.
///
/// The result is normalized to `/`-joined components so every spelling of
/// one file lands in the same bucket.
pub fn output_path(object: &KubeObject) -> KrmResult<String> {
    let raw = match object.source_path() {
        Some(path) => path.to_string(),
        None => default_path(object)?,
    };

    let mut parts = Vec::new();
    for component in Path::new(&raw).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            _ => {
                return Err(KrmError::key_derivation(
                    object.describe(),
                    format!("path {:?} must be relative and stay inside the output directory", raw),
                ));
            }
        }
    }
    if parts.is_empty() {
        return Err(KrmError::key_derivation(
            object.describe(),
            format!("path {:?} does not name a file", raw),
        ));
    }

    Ok(parts.join("/"))
}

fn default_path(object: &KubeObject) -> KrmResult<String> {
    let kind = object
        .kind()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| KrmError::key_derivation(object.describe(), "missing kind"))?;
    let name = object
        .name()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| KrmError::key_derivation(object.describe(), "missing metadata.name"))?;

    let file = format!("{}_{}.yaml", kind.to_lowercase(), name);
    Ok(match object.namespace() {
        Some(ns) if !ns.is_empty() => format!("{}/{}", ns, file),
        _ => file,
    })
}

/// Position of an object within its file; unreadable values count as unset
pub fn output_order(object: &KubeObject) -> Option<i64> {
    let raw = object.source_index()?;
    match raw.trim().parse() {
        Ok(index) => Some(index),
        Err(_) => {
            crate::log_warn!(
                "Ignoring non-numeric index {:?} on {}",
                raw,
                object.describe()
            );
            None
        }
    }
}

/// Serialize one bucket as a multi-document YAML file, without the
/// bookkeeping annotations
fn render(bucket: &Bucket<&KubeObject>) -> KrmResult<String> {
    let mut documents = Vec::with_capacity(bucket.members.len());
    for object in &bucket.members {
        let mut object = (*object).clone();
        object.clear_location();
        documents.push(object.to_yaml()?);
    }
    Ok(documents.join("---\n"))
}

fn existing_yaml_files(root: &Path) -> KrmResult<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    // Hidden entries are never read, so they are never replaced either.
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            KrmError::io(path, e.into())
        })?;
        if entry.file_type().is_file() && is_yaml_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Write `list.items` under `root`, one file per output path. Returns the
/// files written (or that would be written in dry-run mode).
pub fn write_dir(list: &ResourceList, root: &Path, options: SinkOptions) -> KrmResult<Vec<PathBuf>> {
    let buckets = bucket_by_path(list.items.iter(), |o| output_path(o), |o| output_order(o))?;

    let stale = existing_yaml_files(root)?;
    if !stale.is_empty() && !options.overwrite {
        return Err(KrmError::configuration(format!(
            "output directory {} already contains YAML files; pass --overwrite to replace them",
            root.display()
        )));
    }

    let targets: Vec<PathBuf> = buckets.iter().map(|b| root.join(&b.path)).collect();

    for path in &stale {
        dryrun::exec_unless_dry_run(
            options.dry_run,
            &format!("Remove {}", path.display()),
            || fs::remove_file(path).map_err(|e| KrmError::io(path, e)),
        )?;
    }

    for (bucket, target) in buckets.iter().zip(&targets) {
        let content = render(bucket)?;
        let action = format!(
            "Write {} ({} document(s))",
            target.display(),
            bucket.members.len()
        );
        dryrun::exec_unless_dry_run(options.dry_run, &action, || {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| KrmError::io(parent, e))?;
            }
            fs::write(target, content).map_err(|e| KrmError::io(target, e))
        })?;
        tracing::debug!(file = %target.display(), documents = bucket.members.len(), "wrote file");
    }

    if options.dry_run {
        dryrun::log_no_changes();
        return Ok(targets);
    }

    crate::log_info!(
        "Wrote {} resource(s) to {} file(s) under {}",
        list.items.len(),
        targets.len(),
        root.display()
    );
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_dir;
    use crate::resource::{
        INDEX_ANNOTATION, INTERNAL_INDEX_ANNOTATION, INTERNAL_PATH_ANNOTATION, PATH_ANNOTATION,
    };

    fn with_location(mut object: KubeObject, path: &str, index: Option<&str>) -> KubeObject {
        object.set_annotation(PATH_ANNOTATION, path);
        if let Some(index) = index {
            object.set_annotation(INDEX_ANNOTATION, index);
        }
        object
    }

    #[test]
    fn test_default_path() {
        let mut deployment = KubeObject::from_yaml(
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: prod\n",
        )
        .unwrap();
        assert_eq!(output_path(&deployment).unwrap(), "prod/deployment_web.yaml");

        deployment.set_annotation(PATH_ANNOTATION, "custom/place.yaml");
        assert_eq!(output_path(&deployment).unwrap(), "custom/place.yaml");

        let role = KubeObject::new("rbac.authorization.k8s.io/v1", "ClusterRole", "viewer");
        assert_eq!(output_path(&role).unwrap(), "clusterrole_viewer.yaml");
    }

    #[test]
    fn test_escaping_paths_rejected() {
        for path in ["../outside.yaml", "/etc/passwd", "a/../../b.yaml"] {
            let object = with_location(KubeObject::new("v1", "Pod", "p"), path, None);
            let err = output_path(&object).unwrap_err();
            assert!(matches!(err, KrmError::KeyDerivation { .. }), "{}", path);
        }
    }

    #[test]
    fn test_output_order() {
        let object = with_location(KubeObject::new("v1", "Pod", "p"), "a.yaml", Some("3"));
        assert_eq!(output_order(&object), Some(3));

        let object = with_location(KubeObject::new("v1", "Pod", "p"), "a.yaml", Some("three"));
        assert_eq!(output_order(&object), None);
    }

    #[test]
    fn test_writes_buckets_in_index_order() {
        let dir = tempfile::tempdir().unwrap();
        let list = ResourceList::new(vec![
            with_location(KubeObject::new("v1", "ConfigMap", "two"), "app/cm.yaml", Some("2")),
            with_location(KubeObject::new("v1", "ConfigMap", "zero"), "app/cm.yaml", Some("0")),
            KubeObject::new("v1", "Namespace", "prod"),
            with_location(KubeObject::new("v1", "ConfigMap", "one"), "app/cm.yaml", Some("1")),
        ]);

        let written = write_dir(&list, dir.path(), SinkOptions::default()).unwrap();
        assert_eq!(written.len(), 2);

        let content = fs::read_to_string(dir.path().join("app/cm.yaml")).unwrap();
        let zero = content.find("name: zero").unwrap();
        let one = content.find("name: one").unwrap();
        let two = content.find("name: two").unwrap();
        assert!(zero < one && one < two);
        assert_eq!(content.matches("---").count(), 2);
        assert!(!content.contains(PATH_ANNOTATION));
        assert!(!content.contains("annotations"));

        assert!(dir.path().join("namespace_prod.yaml").exists());
    }

    #[test]
    fn test_refuses_non_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("old.yaml"), "kind: Old\n").unwrap();
        let list = ResourceList::new(vec![KubeObject::new("v1", "Pod", "p")]);

        let err = write_dir(&list, dir.path(), SinkOptions::default()).unwrap_err();
        assert!(matches!(err, KrmError::Configuration(_)));

        let options = SinkOptions {
            overwrite: true,
            dry_run: false,
        };
        write_dir(&list, dir.path(), options).unwrap();
        assert!(!dir.path().join("old.yaml").exists());
        assert!(dir.path().join("pod_p.yaml").exists());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let list = ResourceList::new(vec![KubeObject::new("v1", "Pod", "p")]);
        let options = SinkOptions {
            overwrite: false,
            dry_run: true,
        };
        let planned = write_dir(&list, dir.path(), options).unwrap();
        assert_eq!(planned, vec![dir.path().join("pod_p.yaml")]);
        assert!(!planned[0].exists());
    }

    #[test]
    fn test_equivalent_path_spellings_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = ResourceList::new(vec![
            with_location(KubeObject::new("v1", "ConfigMap", "dotted"), "./app.yaml", Some("0")),
            with_location(KubeObject::new("v1", "ConfigMap", "plain"), "app.yaml", Some("1")),
            with_location(KubeObject::new("v1", "ConfigMap", "double"), "nested//cm.yaml", None),
            with_location(KubeObject::new("v1", "ConfigMap", "single"), "nested/cm.yaml", Some("1")),
        ]);

        let written = write_dir(&list, dir.path(), SinkOptions::default()).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("app.yaml"), dir.path().join("nested/cm.yaml")]
        );

        let read_back = read_dir(dir.path()).unwrap();
        let names: Vec<_> = read_back.items.iter().filter_map(|o| o.name()).collect();
        assert_eq!(names, vec!["dotted", "plain", "double", "single"]);
    }

    #[test]
    fn test_hidden_yaml_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".github/workflows/ci.yaml");
        fs::create_dir_all(hidden.parent().unwrap()).unwrap();
        fs::write(&hidden, "name: ci\n").unwrap();

        let list = ResourceList::new(vec![KubeObject::new("v1", "Pod", "p")]);
        write_dir(&list, dir.path(), SinkOptions::default()).unwrap();
        assert!(hidden.exists());

        let options = SinkOptions {
            overwrite: true,
            dry_run: false,
        };
        write_dir(&list, dir.path(), options).unwrap();
        assert!(hidden.exists());
        assert!(dir.path().join("pod_p.yaml").exists());
    }

    #[test]
    fn test_internal_annotations_place_and_order_items() {
        let internal = |name: &str, index: &str| {
            let mut object = KubeObject::new("v1", "ConfigMap", name);
            object.set_annotation(INTERNAL_PATH_ANNOTATION, "pkg/cm.yaml");
            object.set_annotation(INTERNAL_INDEX_ANNOTATION, index);
            object
        };
        let dir = tempfile::tempdir().unwrap();
        let list = ResourceList::new(vec![internal("second", "1"), internal("first", "0")]);

        let written = write_dir(&list, dir.path(), SinkOptions::default()).unwrap();
        assert_eq!(written, vec![dir.path().join("pkg/cm.yaml")]);

        let content = fs::read_to_string(&written[0]).unwrap();
        assert!(content.find("name: first").unwrap() < content.find("name: second").unwrap());
        assert!(!content.contains("config.kubernetes.io"));
    }
}
