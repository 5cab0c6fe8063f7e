//! File system based repository implementation

use async_trait::async_trait;
use path_absolutize::Absolutize;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use verdict_core::RuleSet;
use verdict_parser::RuleSetParser;

use crate::{error::RepositoryError, traits::RuleSetRepository, RepositoryResult};

/// File system based repository
///
/// Loads rule sets from YAML files below a root directory. A file may hold
/// several `ruleset:` documents separated by `---`.
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    /// Root path of the repository
    root_path: PathBuf,
}

impl FileSystemRepository {
    /// Create a new file system repository
    ///
    /// # Example
    /// ```no_run
    /// use verdict_repository::FileSystemRepository;
    ///
    /// let repo = FileSystemRepository::new("rulesets").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(root_path: P) -> RepositoryResult<Self> {
        let path = root_path.as_ref();

        if !path.is_dir() {
            return Err(RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let abs_path = path
            .absolutize()
            .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        Ok(Self {
            root_path: abs_path,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn is_yaml(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        )
    }

    /// Load every rule set of one file
    async fn load_file(&self, path: &Path) -> RepositoryResult<(Vec<RuleSet>, String)> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|_| RepositoryError::NotFound {
                path: path.display().to_string(),
            })?;
        let rule_sets = RuleSetParser::parse_all(&content)?;
        Ok((rule_sets, content))
    }

    /// Join a relative identifier onto the root, refusing to leave it
    fn resolve(&self, identifier: &str) -> RepositoryResult<PathBuf> {
        let relative = Path::new(identifier);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            tracing::warn!("Rejected rule-set path outside the repository: {}", identifier);
            return Err(RepositoryError::InvalidPath {
                path: relative.to_path_buf(),
            });
        }
        Ok(self.root_path.join(relative))
    }

    /// Load by relative path; the file's first rule set wins
    async fn load_path(&self, identifier: &str) -> RepositoryResult<(RuleSet, String)> {
        let path = self.resolve(identifier)?;
        let (rule_sets, content) = self.load_file(&path).await?;
        let rule_set = rule_sets
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::NotFound {
                path: path.display().to_string(),
            })?;
        Ok((rule_set, content))
    }

    /// Search the tree for a rule set with the given id
    async fn find_by_id(&self, id: &str) -> RepositoryResult<(RuleSet, String)> {
        for path in self.yaml_files().await? {
            let Ok(content) = fs::read_to_string(&path).await else {
                continue;
            };
            // Quick check without full parsing
            if !content.contains(id) {
                continue;
            }

            match RuleSetParser::parse_all(&content) {
                Ok(rule_sets) => {
                    if let Some(rule_set) = rule_sets.into_iter().find(|r| r.id() == id) {
                        tracing::debug!("Rule set '{}' found in {}", id, path.display());
                        return Ok((rule_set, content));
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping unparsable file {}: {}", path.display(), e);
                }
            }
        }

        Err(RepositoryError::IdNotFound { id: id.to_string() })
    }

    /// All YAML files below the root, in path order
    async fn yaml_files(&self) -> RepositoryResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.collect_yaml_files(&self.root_path, &mut files).await?;
        files.sort();
        Ok(files)
    }

    /// Recursively collect YAML files
    #[allow(clippy::only_used_in_recursion)]
    fn collect_yaml_files<'a>(
        &'a self,
        dir: &'a Path,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = RepositoryResult<()>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut entries = fs::read_dir(dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();

                if path.is_dir() {
                    self.collect_yaml_files(&path, files).await?;
                } else if Self::is_yaml(&path) {
                    files.push(path);
                }
            }

            Ok(())
        })
    }
}

#[async_trait]
impl RuleSetRepository for FileSystemRepository {
    async fn load(&self, identifier: &str) -> RepositoryResult<(RuleSet, String)> {
        let (rule_set, content) = if Self::is_yaml(Path::new(identifier)) {
            self.load_path(identifier).await?
        } else {
            self.find_by_id(identifier).await?
        };

        tracing::info!(
            "Loaded rule set '{}' version {} ({} rules, {} gates, {} faults)",
            rule_set.id(),
            rule_set.version(),
            rule_set.rules().len(),
            rule_set.gates().len(),
            rule_set.faults().len()
        );

        Ok((rule_set, content))
    }

    async fn exists(&self, identifier: &str) -> RepositoryResult<bool> {
        if Self::is_yaml(Path::new(identifier)) {
            return Ok(self.resolve(identifier)?.is_file());
        }
        match self.find_by_id(identifier).await {
            Ok(_) => Ok(true),
            Err(RepositoryError::IdNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn list(&self) -> RepositoryResult<Vec<String>> {
        let mut ids = Vec::new();
        for path in self.yaml_files().await? {
            match self.load_file(&path).await {
                Ok((rule_sets, _)) => ids.extend(rule_sets.iter().map(|r| r.id().to_string())),
                Err(e) => tracing::warn!("Skipping unparsable file {}: {}", path.display(), e),
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
