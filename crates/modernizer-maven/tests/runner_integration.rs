//! Integration tests for subprocess stages against stand-in executables.

use modernizer_maven::{BuiltinStage, MavenConfig, StageConfig, ToolError, ToolRunner};
use std::path::Path;

/// `sh clean compile -q` executes a script named `clean` in the working
/// directory, which lets a test stand in for Maven without an executable file.
fn write_clean_script(dir: &Path, body: &str) {
    std::fs::write(dir.join("clean"), format!("{body}\n")).unwrap();
}

/// Test: the child runs with the configured working directory
#[tokio::test]
async fn test_stage_runs_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

    let config = StageConfig::custom(
        "ls_test".to_string(),
        vec!["ls".to_string()],
        dir.path(),
        60,
    );

    let result = ToolRunner::execute_stage(&config).await.expect("execute failed");
    assert!(result.passed());
    assert!(result.stdout.contains("pom.xml"));
}

/// Test: missing executable is a launch error, not a panic
#[tokio::test]
async fn test_missing_binary_is_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let maven = MavenConfig::with_binary("definitely-not-a-maven-binary-7f3a");

    let err = ToolRunner::run_builtin(BuiltinStage::CleanCompile, &maven, dir.path())
        .await
        .unwrap_err();

    match err {
        ToolError::Launch { stage, program, .. } => {
            assert_eq!(stage, "mvn_clean_compile");
            assert_eq!(program, "definitely-not-a-maven-binary-7f3a");
        }
        other => panic!("expected launch error, got {other}"),
    }
}

/// Test: a hanging child is cut off by the stage timeout
#[tokio::test]
async fn test_stage_timeout() {
    let config = StageConfig::custom(
        "sleep_test".to_string(),
        vec!["sleep".to_string(), "5".to_string()],
        Path::new("."),
        1,
    );

    let err = ToolRunner::execute_stage(&config).await.unwrap_err();
    assert!(matches!(
        err,
        ToolError::TimedOut {
            timeout_secs: 1,
            ..
        }
    ));
}

/// Test: builtin stages pass their fixed arguments to the Maven binary
#[tokio::test]
async fn test_builtin_stage_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let maven = MavenConfig::with_binary("echo");

    let result = ToolRunner::run_builtin(BuiltinStage::NormalizePom, &maven, dir.path())
        .await
        .expect("execute failed");

    assert!(result.passed());
    assert_eq!(
        result.stdout.trim(),
        "org.openrewrite.maven:rewrite-maven-plugin:run \
         -Drewrite.activeRecipes=org.openrewrite.xml.format.NormalizeFormat -q"
    );
}

/// Test: checked execution surfaces the failing tool's stderr
#[tokio::test]
async fn test_checked_failure_carries_stderr() {
    let dir = tempfile::tempdir().unwrap();
    write_clean_script(
        dir.path(),
        "echo '[ERROR] Point.java:[1,1] cannot find symbol' >&2\nexit 1",
    );
    let maven = MavenConfig::with_binary("sh");

    let err = ToolRunner::run_builtin_checked(BuiltinStage::CleanCompile, &maven, dir.path())
        .await
        .unwrap_err();

    match err {
        ToolError::InvocationFailed {
            stage,
            exit_code,
            stderr,
        } => {
            assert_eq!(stage, "mvn_clean_compile");
            assert_eq!(exit_code, 1);
            assert!(stderr.contains("cannot find symbol"));
        }
        other => panic!("expected invocation failure, got {other}"),
    }
}
