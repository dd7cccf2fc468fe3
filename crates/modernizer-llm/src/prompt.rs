//! Prompt construction.
//!
//! The system prompt is a closed rule set; the model is told to answer with
//! source only. Nothing downstream enforces that, the reply is written to
//! disk as-is. Both prompts name the Java release the pom.xml is retargeted
//! to, so the model never reaches for constructs the compiler will reject.

const RELEASE_PLACEHOLDER: &str = "{release}";

const SYSTEM_PROMPT_TEMPLATE: &str = "\
You are a Java {release} refactoring engine. Modernize legacy code under these strict rules:
1. CONVERSIONS: Turn plain data classes (POJOs) into records, use 'var' for local variables, \
and use switch expressions.
2. COMPLIANCE: Use standard Java {release} only. Every switch MUST be exhaustive \
(include 'default' or 'case null, default').
3. SCOPE: Refactor only. Do not add new methods, factory logic, or peer classes. \
Assume external dependencies exist.
4. ACCESSORS: When a class becomes a record, rewrite every getter call (e.g. getId()) \
to accessor style (e.g. id()).
5. IDEMPOTENCY: If the code is already modern, return it unchanged.
6. OUTPUT: Return ONLY raw source code. No markdown, no backticks, no explanations.
CRITICAL: Leave values declared as Object untouched. Output starts with 'package' and ends \
with '}', with no characters before or after. \
Use 'var' ONLY when the initializer names a concrete type \
(e.g. 'new ArrayList<>()' or a string literal).
";

/// System instruction sent with every file, targeting `java_release`.
pub fn system_prompt(java_release: &str) -> String {
    SYSTEM_PROMPT_TEMPLATE.replace(RELEASE_PLACEHOLDER, java_release)
}

/// User instruction naming the file and embedding its full source.
pub fn user_prompt(java_release: &str, file_name: &str, source: &str) -> String {
    format!(
        "Modernize this file with the latest JDK {java_release} features: {file_name}\n\n\
         Java Code:\n{source}"
    )
}
