//! pom.xml retargeting against real files.

use modernizer_core::{
    edit_descriptor, modernize_descriptor, DescriptorOutcome, PomDescriptor, DESCRIPTOR_FILE,
    TRACKED_VERSION_TAGS,
};
use modernizer_maven::MavenConfig;
use std::path::Path;

const LEGACY_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.legacy</groupId>
    <artifactId>legacy-app</artifactId>
    <version>1.0-SNAPSHOT</version>

    <properties>
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
        <maven.compiler.source>1.8</maven.compiler.source>
        <maven.compiler.target>1.8</maven.compiler.target>
        <java.version>1.8</java.version>
    </properties>

    <dependencies>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.13.2</version>
            <scope>test</scope>
        </dependency>
    </dependencies>
</project>
"#;

fn write_pom(root: &Path, content: &str) {
    std::fs::write(root.join(DESCRIPTOR_FILE), content).unwrap();
}

fn read_pom(root: &Path) -> String {
    std::fs::read_to_string(root.join(DESCRIPTOR_FILE)).unwrap()
}

fn assert_tracked_tags_at(content: &str, value: &str) {
    for tag in TRACKED_VERSION_TAGS {
        assert!(
            content.contains(&format!("<{tag}>{value}</{tag}>")),
            "{tag} should be {value}"
        );
        assert_eq!(content.matches(&format!("<{tag}>")).count(), 1, "{tag} duplicated");
    }
}

#[tokio::test]
async fn test_editing_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_pom(dir.path(), LEGACY_POM);

    let first = modernize_descriptor(dir.path(), "25", None).await;
    assert!(matches!(first, DescriptorOutcome::Updated { .. }));
    let after_first = read_pom(dir.path());

    modernize_descriptor(dir.path(), "25", None).await;
    let after_second = read_pom(dir.path());

    assert_eq!(after_first, after_second);
    assert_tracked_tags_at(&after_second, "25");
    assert_eq!(after_second.matches("<build>").count(), 1);
    assert_eq!(after_second.matches("</build>").count(), 1);
}

#[tokio::test]
async fn test_build_block_lands_before_closing_root_tag() {
    let dir = tempfile::tempdir().unwrap();
    write_pom(dir.path(), LEGACY_POM);

    modernize_descriptor(dir.path(), "25", None).await;
    let content = read_pom(dir.path());

    assert_eq!(content.matches("<build>").count(), 1);
    let build_end = content.find("</build>").unwrap() + "</build>".len();
    assert_eq!(content[build_end..].trim(), "</project>");
    assert!(content.find("</dependencies>").unwrap() < content.find("<build>").unwrap());
    assert!(content.contains("<artifactId>maven-compiler-plugin</artifactId>"));
    assert!(content.contains("<artifactId>rewrite-maven-plugin</artifactId>"));
}

#[tokio::test]
async fn test_existing_build_blocks_are_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let with_build = LEGACY_POM.replace(
        "</project>",
        "    <build>\n        <finalName>legacy</finalName>\n    </build>\n</project>",
    );
    write_pom(dir.path(), &with_build);

    modernize_descriptor(dir.path(), "25", None).await;
    let content = read_pom(dir.path());

    assert!(!content.contains("<finalName>legacy</finalName>"));
    assert_eq!(content.matches("<build>").count(), 1);
}

#[tokio::test]
async fn test_release_tag_inserted_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    write_pom(dir.path(), LEGACY_POM);

    let outcome = modernize_descriptor(dir.path(), "25", None).await;
    match outcome {
        DescriptorOutcome::Updated { edit, formatted } => {
            assert_eq!(edit.versions_replaced, 3);
            assert!(edit.release_inserted);
            assert!(!formatted);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let content = read_pom(dir.path());
    assert!(content.contains("<maven.compiler.release>25</maven.compiler.release>"));
    let release_at = content.find("<maven.compiler.release>").unwrap();
    assert!(release_at < content.find("</properties>").unwrap());
}

#[tokio::test]
async fn test_missing_descriptor_performs_no_write() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("build.gradle"), "plugins {}").unwrap();

    let outcome = modernize_descriptor(dir.path(), "25", Some(&MavenConfig::default())).await;

    assert_eq!(outcome, DescriptorOutcome::Missing);
    assert!(!dir.path().join(DESCRIPTOR_FILE).exists());
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_formatter_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_pom(dir.path(), LEGACY_POM);
    let maven = MavenConfig::with_binary("definitely-not-a-maven-binary-7f3a");

    let outcome = modernize_descriptor(dir.path(), "25", Some(&maven)).await;

    match outcome {
        DescriptorOutcome::Updated { formatted, .. } => assert!(!formatted),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(read_pom(dir.path()).contains("<maven.compiler.release>25</maven.compiler.release>"));
}

#[test]
fn test_descriptor_without_tag_syntax_only_gains_build_block() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DESCRIPTOR_FILE);
    let bare = "<project>\n    <modelVersion>4.0.0</modelVersion>\n</project>\n";
    std::fs::write(&path, bare).unwrap();

    let edit = edit_descriptor::<PomDescriptor>(&path, "25").unwrap();
    assert_eq!(edit.versions_replaced, 0);
    assert!(!edit.release_inserted);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!content.contains("<maven.compiler.release>"));
    assert_eq!(content.matches("<build>").count(), 1);
}
