use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde_json::Value;

/// In-memory index of the pre-built documentation tree.
///
/// `<docs_dir>/index.json` is a JSON object mapping slash-separated service
/// paths (for example `"/compute/v2"`) to arbitrary per-service metadata.
/// The catalog keeps the index object verbatim for the index endpoint and
/// additionally materializes a nested segment map so request paths resolve
/// one segment at a time.
#[derive(Debug)]
pub struct DocsCatalog {
    index: Value,
    root: SegmentNode,
}

#[derive(Debug, Default)]
struct SegmentNode {
    service: Option<Value>,
    children: HashMap<String, SegmentNode>,
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

impl DocsCatalog {
    pub fn load(docs_dir: &Path) -> anyhow::Result<Self> {
        let index_path = docs_dir.join("index.json");
        let raw = fs::read_to_string(&index_path)
            .with_context(|| format!("failed to read docs index '{}'", index_path.display()))?;
        let index: Value = serde_json::from_str(&raw)
            .with_context(|| format!("docs index '{}' is not valid JSON", index_path.display()))?;

        let entries = index
            .as_object()
            .context("docs index must be a JSON object keyed by service path")?;

        let mut root = SegmentNode::default();
        for (key, info) in entries {
            let mut node = &mut root;
            let mut placed = false;
            for segment in segments(key) {
                node = node.children.entry(segment.to_string()).or_default();
                placed = true;
            }
            if !placed {
                anyhow::bail!("docs index key '{key}' has no path segments");
            }
            node.service = Some(info.clone());
        }

        Ok(Self { index, root })
    }

    /// The full index object, exactly as read from disk.
    pub fn index(&self) -> &Value {
        &self.index
    }

    pub fn service_count(&self) -> usize {
        self.index.as_object().map(|m| m.len()).unwrap_or(0)
    }

    /// Resolve a request path to a service entry.
    ///
    /// Empty segments are dropped, so trailing slashes are insignificant.
    /// A walk that exhausts the map, stops on an intermediate node, or
    /// leaves unconsumed trailing segments misses.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for segment in segments(path) {
            node = node.children.get(segment)?;
        }
        node.service.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    use serde_json::json;

    use super::*;

    fn docs_dir_with_index(index: &Value) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("docserver_catalog_{suffix}"));
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(
            dir.join("index.json"),
            serde_json::to_string(index).expect("serialize index"),
        )
        .expect("write index");
        dir
    }

    fn sample_index() -> Value {
        json!({
            "/compute/v2": {"name": "Compute API", "version": "v2"},
            "/compute/v2.1": {"name": "Compute API", "version": "v2.1"},
            "/identity/v3": {"name": "Identity API", "version": "v3"},
        })
    }

    #[test]
    fn keeps_the_index_object_verbatim() {
        let index = sample_index();
        let dir = docs_dir_with_index(&index);

        let catalog = DocsCatalog::load(&dir).expect("load");
        assert_eq!(catalog.index(), &index);
        assert_eq!(catalog.service_count(), 3);

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn resolves_nested_service_paths() {
        let dir = docs_dir_with_index(&sample_index());
        let catalog = DocsCatalog::load(&dir).expect("load");

        assert_eq!(
            catalog.lookup("compute/v2"),
            Some(&json!({"name": "Compute API", "version": "v2"}))
        );
        assert_eq!(
            catalog.lookup("identity/v3/"),
            Some(&json!({"name": "Identity API", "version": "v3"}))
        );

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn misses_on_intermediate_unknown_and_overlong_paths() {
        let dir = docs_dir_with_index(&sample_index());
        let catalog = DocsCatalog::load(&dir).expect("load");

        // "compute" is only an intermediate node.
        assert_eq!(catalog.lookup("compute"), None);
        assert_eq!(catalog.lookup("object-store/v1"), None);
        assert_eq!(catalog.lookup("compute/v2/servers"), None);
        assert_eq!(catalog.lookup(""), None);

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn services_may_nest_under_other_services() {
        let index = json!({
            "/compute": {"name": "Compute root"},
            "/compute/v2": {"name": "Compute v2"},
        });
        let dir = docs_dir_with_index(&index);
        let catalog = DocsCatalog::load(&dir).expect("load");

        assert_eq!(catalog.lookup("compute"), Some(&json!({"name": "Compute root"})));
        assert_eq!(catalog.lookup("compute/v2"), Some(&json!({"name": "Compute v2"})));

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn rejects_missing_index_file() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("docserver_catalog_empty_{suffix}"));
        fs::create_dir_all(&dir).expect("mkdir");

        let err = DocsCatalog::load(&dir).expect_err("must fail");
        assert!(err.to_string().contains("failed to read docs index"), "{err}");

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn rejects_non_object_index() {
        let dir = docs_dir_with_index(&json!(["not", "an", "object"]));

        let err = DocsCatalog::load(&dir).expect_err("must fail");
        assert!(err.to_string().contains("JSON object"), "{err}");

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn rejects_index_key_without_segments() {
        let dir = docs_dir_with_index(&json!({"/": {"name": "root"}}));

        let err = DocsCatalog::load(&dir).expect_err("must fail");
        assert!(err.to_string().contains("no path segments"), "{err}");

        fs::remove_dir_all(dir).expect("cleanup");
    }
}
