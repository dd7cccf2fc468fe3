//! pom.xml retargeting.
//!
//! Editing is textual: version tags are rewritten with regexes and the whole
//! `<build>` section is replaced by a pinned compiler + OpenRewrite setup.
//! A descriptor that does not use the expected tag syntax is left as-is.
//! The [`BuildDescriptor`] trait keeps the orchestrator independent of that
//! choice.

use crate::error::{CoreError, Result};
use modernizer_maven::{BuiltinStage, MavenConfig, ToolRunner};
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Build descriptor file name.
pub const DESCRIPTOR_FILE: &str = "pom.xml";

/// Property tags rewritten to the target release.
pub const TRACKED_VERSION_TAGS: [&str; 4] = [
    "maven.compiler.source",
    "maven.compiler.target",
    "java.version",
    "maven.compiler.release",
];

/// Property required for `--release` (and switch pattern matching on Object).
pub const RELEASE_TAG: &str = "maven.compiler.release";

/// Default Java release targeted.
pub const DEFAULT_JAVA_RELEASE: &str = "25";

pub const COMPILER_PLUGIN_VERSION: &str = "3.14.1";
pub const REWRITE_PLUGIN_VERSION: &str = "6.2.0";
pub const REWRITE_MIGRATE_JAVA_VERSION: &str = "3.2.0";

/// Recipes activated in the injected rewrite-maven-plugin configuration.
pub const ACTIVE_RECIPES: [&str; 2] = [
    "org.openrewrite.java.migrate.UpgradeToJava21",
    "org.openrewrite.java.format.AutoFormat",
];

/// Editable build descriptor.
pub trait BuildDescriptor: Sized {
    /// Read the descriptor at `path`.
    fn load(path: &Path) -> Result<Self>;

    /// Set every occurrence of `tag` to `value`. Returns the number of
    /// occurrences rewritten; absent tags stay absent.
    fn set_version(&mut self, tag: &str, value: &str) -> Result<usize>;

    /// Add `tag` with `value` to the properties section if it is missing.
    /// Returns whether the property was inserted.
    fn ensure_property(&mut self, tag: &str, value: &str) -> bool;

    /// Drop any existing build section and install `block` as the only one.
    fn replace_build_block(&mut self, block: &str) -> Result<()>;

    /// Write the descriptor back to where it was loaded from.
    fn save(&self) -> Result<()>;
}

/// Regex-backed pom.xml.
#[derive(Debug, Clone)]
pub struct PomDescriptor {
    path: PathBuf,
    content: String,
}

impl PomDescriptor {
    /// Wrap in-memory content (not yet saved).
    pub fn from_content(path: &Path, content: &str) -> Self {
        PomDescriptor {
            path: path.to_path_buf(),
            content: content.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl BuildDescriptor for PomDescriptor {
    fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Ok(PomDescriptor {
            path: path.to_path_buf(),
            content,
        })
    }

    fn set_version(&mut self, tag: &str, value: &str) -> Result<usize> {
        let escaped = regex::escape(tag);
        let pattern = Regex::new(&format!("<{escaped}>.*?</{escaped}>"))?;
        let count = pattern.find_iter(&self.content).count();
        if count > 0 {
            let replacement = format!("<{tag}>{value}</{tag}>");
            self.content = pattern
                .replace_all(&self.content, NoExpand(&replacement))
                .into_owned();
        }
        Ok(count)
    }

    fn ensure_property(&mut self, tag: &str, value: &str) -> bool {
        if self.content.contains(&format!("<{tag}>")) {
            return false;
        }
        if !self.content.contains("</properties>") {
            warn!(
                path = %self.path.display(),
                tag,
                "No </properties> anchor, property not inserted"
            );
            return false;
        }
        self.content = self.content.replacen(
            "</properties>",
            &format!("    <{tag}>{value}</{tag}>\n    </properties>"),
            1,
        );
        true
    }

    fn replace_build_block(&mut self, block: &str) -> Result<()> {
        let existing_build = Regex::new(r"(?s)\s*<build>.*?</build>")?;
        let blank_runs = Regex::new(r"\n{3,}")?;

        let stripped = existing_build.replace_all(&self.content, "");
        let collapsed = blank_runs.replace_all(&stripped, "\n\n");

        self.content = match collapsed.rfind("</project>") {
            Some(idx) => {
                let (head, tail) = collapsed.split_at(idx);
                format!("{}\n\n{}\n{}\n", head.trim_end(), block.trim_end(), tail.trim_end())
            }
            None => {
                warn!(
                    path = %self.path.display(),
                    "No </project> closing tag, appending build block at end"
                );
                format!("{}\n\n{}\n", collapsed.trim_end(), block.trim_end())
            }
        };
        Ok(())
    }

    fn save(&self) -> Result<()> {
        std::fs::write(&self.path, &self.content).map_err(|e| CoreError::io(&self.path, e))
    }
}

/// The pinned build section: maven-compiler-plugin with the target release
/// and preview features, and rewrite-maven-plugin with the migration recipes.
pub fn build_block(release: &str) -> String {
    let recipes: String = ACTIVE_RECIPES
        .iter()
        .map(|r| format!("                        <recipe>{r}</recipe>\n"))
        .collect();

    format!(
        r#"    <build>
        <plugins>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-compiler-plugin</artifactId>
                <version>{COMPILER_PLUGIN_VERSION}</version>
                <configuration>
                    <release>{release}</release>
                    <compilerArgs>
                        <arg>--enable-preview</arg>
                    </compilerArgs>
                </configuration>
            </plugin>
            <plugin>
                <groupId>org.openrewrite.maven</groupId>
                <artifactId>rewrite-maven-plugin</artifactId>
                <version>{REWRITE_PLUGIN_VERSION}</version>
                <configuration>
                    <activeRecipes>
{recipes}                    </activeRecipes>
                </configuration>
                <dependencies>
                    <dependency>
                        <groupId>org.openrewrite.recipe</groupId>
                        <artifactId>rewrite-migrate-java</artifactId>
                        <version>{REWRITE_MIGRATE_JAVA_VERSION}</version>
                    </dependency>
                </dependencies>
            </plugin>
        </plugins>
    </build>
"#
    )
}

/// What the text edit changed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EditSummary {
    pub path: PathBuf,
    /// Tracked tag occurrences rewritten to the target release.
    pub versions_replaced: usize,
    /// Whether the release property had to be added.
    pub release_inserted: bool,
}

/// Result of the descriptor step.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DescriptorOutcome {
    /// No pom.xml at the workspace root; nothing was written.
    Missing,
    /// Descriptor rewritten.
    Updated {
        edit: EditSummary,
        /// Whether the Maven formatter ran successfully.
        formatted: bool,
    },
    /// Descriptor exists but could not be read or written.
    Failed { error: String },
}

/// Apply the text edits to the descriptor at `path` and save it.
pub fn edit_descriptor<D: BuildDescriptor>(path: &Path, release: &str) -> Result<EditSummary> {
    let mut descriptor = D::load(path)?;

    let mut versions_replaced = 0;
    for tag in TRACKED_VERSION_TAGS {
        versions_replaced += descriptor.set_version(tag, release)?;
    }
    let release_inserted = descriptor.ensure_property(RELEASE_TAG, release);
    descriptor.replace_build_block(&build_block(release))?;
    descriptor.save()?;

    Ok(EditSummary {
        path: path.to_path_buf(),
        versions_replaced,
        release_inserted,
    })
}

/// Retarget the workspace's pom.xml and reformat it through Maven.
///
/// Never fails: a missing descriptor is skipped, edit errors are reported in
/// the outcome, formatter errors are logged.
pub async fn modernize_descriptor(
    workspace_root: &Path,
    release: &str,
    maven: Option<&MavenConfig>,
) -> DescriptorOutcome {
    let path = workspace_root.join(DESCRIPTOR_FILE);
    if !path.exists() {
        info!(path = %path.display(), "pom.xml not found, skipping descriptor update");
        return DescriptorOutcome::Missing;
    }

    let edit = match edit_off_runtime(path.clone(), release.to_string()).await {
        Ok(edit) => edit,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to update pom.xml");
            return DescriptorOutcome::Failed {
                error: err.to_string(),
            };
        }
    };

    info!(
        path = %path.display(),
        release,
        versions_replaced = edit.versions_replaced,
        release_inserted = edit.release_inserted,
        "pom.xml retargeted"
    );

    let formatted = match maven {
        Some(maven) => format_descriptor(workspace_root, maven).await,
        None => false,
    };

    DescriptorOutcome::Updated { edit, formatted }
}

/// Runs the synchronous text edit on the blocking pool.
async fn edit_off_runtime(path: PathBuf, release: String) -> Result<EditSummary> {
    tokio::task::spawn_blocking(move || edit_descriptor::<PomDescriptor>(&path, &release)).await?
}

/// Best-effort pom.xml normalisation via OpenRewrite.
async fn format_descriptor(workspace_root: &Path, maven: &MavenConfig) -> bool {
    match ToolRunner::run_builtin_checked(BuiltinStage::NormalizePom, maven, workspace_root).await {
        Ok(_) => true,
        Err(err) => {
            warn!(error = %err, "pom.xml formatting failed, keeping unformatted descriptor");
            false
        }
    }
}
